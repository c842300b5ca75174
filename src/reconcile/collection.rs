use std::fmt;

/// A file observed in some collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Root-relative, `/`-separated path without a leading slash
    pub name: String,
    /// Fingerprint, for collections that carry one (recorded backup hashes)
    pub hash: Option<String>,
}

impl FileRecord {
    /// A record without a hash.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash: None,
        }
    }

    /// A record carrying a fingerprint.
    pub fn with_hash(name: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash: Some(hash.into()),
        }
    }
}

/// Ordered file records. Source order is kept and duplicates are allowed.
pub type FileSet = Vec<FileRecord>;

/// Every collection the engine can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Collection {
    /// Modified backups and unpackaged files the mirror does not track
    MissingInRepo,
    /// Mirror files whose disk content differs from the mirror copy
    DifferentInRepo,
    /// Backup files with their recorded hashes
    PackageBackups,
    /// Every file on disk inside the scope
    All,
    /// Every path owned by an installed package
    Package,
    /// Backup files whose content no longer matches the recorded hash
    ModifiedBackups,
    /// Files on disk owned by no package
    Unpackaged,
    /// Files tracked by the mirror
    Repo,
    /// Package-owned files missing from disk
    Deleted,
}

impl Collection {
    /// Every collection, in listing order.
    pub const ALL: [Self; 9] = [
        Self::MissingInRepo,
        Self::DifferentInRepo,
        Self::PackageBackups,
        Self::All,
        Self::Package,
        Self::ModifiedBackups,
        Self::Unpackaged,
        Self::Repo,
        Self::Deleted,
    ];

    /// Name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MissingInRepo => "missing-in-repo",
            Self::DifferentInRepo => "different-in-repo",
            Self::PackageBackups => "package-backups",
            Self::All => "all",
            Self::Package => "package",
            Self::ModifiedBackups => "modified-backups",
            Self::Unpackaged => "unpackaged",
            Self::Repo => "repo",
            Self::Deleted => "deleted",
        }
    }

    /// One-line description for `archdiff collections`.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MissingInRepo => "modified backups and unpackaged files not tracked by the mirror",
            Self::DifferentInRepo => "mirror files whose content differs from disk",
            Self::PackageBackups => "backup files recorded by the package database",
            Self::All => "every file on disk inside the scope",
            Self::Package => "every path owned by an installed package",
            Self::ModifiedBackups => "backup files changed since install",
            Self::Unpackaged => "files on disk owned by no package",
            Self::Repo => "files tracked by the mirror",
            Self::Deleted => "package files missing from disk",
        }
    }

    /// Collections this one is derived from.
    #[must_use]
    pub const fn dependencies(self) -> &'static [Self] {
        match self {
            Self::PackageBackups | Self::Package | Self::All | Self::Repo => &[],
            Self::Unpackaged => &[Self::All, Self::Package],
            Self::ModifiedBackups => &[Self::PackageBackups],
            Self::DifferentInRepo => &[Self::Repo],
            Self::MissingInRepo => &[Self::ModifiedBackups, Self::Unpackaged, Self::Repo],
            Self::Deleted => &[Self::Package],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
