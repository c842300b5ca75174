use std::fmt;
use std::io;
use std::path::PathBuf;

/// Structural failures that abort a reconciliation run.
///
/// Per-file conditions that are expected or recoverable never become a
/// `ReconcileError`; they are absorbed by the collection that hit them.
#[derive(Debug)]
pub enum ReconcileError {
    /// An ignore glob failed to compile
    InvalidPattern {
        /// The offending glob
        pattern: String,
        /// Parser message
        message: String,
    },
    /// The package database could not be enumerated
    PackageDatabase {
        /// Path that failed to load
        path: PathBuf,
        /// What went wrong
        message: String,
    },
    /// The mirror listing command failed or produced unusable output
    RepoListing(String),
    /// An unexpected I/O failure on a single file
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
}

impl ReconcileError {
    /// Builds an [`ReconcileError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Builds a [`ReconcileError::PackageDatabase`] for `path`.
    pub fn package_db(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::PackageDatabase {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Short description of the error category
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => "Invalid Ignore Pattern",
            Self::PackageDatabase { .. } => "Package Database Error",
            Self::RepoListing(_) => "Mirror Listing Error",
            Self::Io { .. } => "I/O Error",
        }
    }
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid ignore pattern '{pattern}': {message}")
            }
            Self::PackageDatabase { path, message } => {
                write!(f, "failed to load package database {}: {message}", path.display())
            }
            Self::RepoListing(msg) => write!(f, "failed to list mirror files: {msg}"),
            Self::Io { path, source } => write!(f, "I/O error at {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
