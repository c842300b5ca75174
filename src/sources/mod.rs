//! External data sources consumed by the reconciliation engine.
//!
//! Each source is a trait so the engine can be driven by the real system
//! (pacman database, directory walk, `git ls-files`) or by fixtures.

/// Package source backed by libalpm.
#[cfg(feature = "alpm")]
pub mod alpm;

/// Recursive directory walk backed by `walkdir`.
pub mod filesystem;

/// Tracked file listing of a git mirror.
pub mod git;

/// Pacman local database reader.
pub mod pacman;

#[cfg(feature = "alpm")]
pub use self::alpm::AlpmDb;
pub use filesystem::WalkdirSource;
pub use git::GitRepoSource;
pub use pacman::PacmanDb;

use anyhow::Result;
use std::io;
use std::path::Path;

/// A backup (configuration) file with the hash recorded at install time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    /// Root-relative path
    pub name: String,
    /// Recorded MD5, hex encoded
    pub hash: String,
}

/// One installed package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Package name
    pub name: String,
    /// Every owned path, root-relative; directories end with `/`
    pub files: Vec<String>,
    /// Owned paths the package manager expects to be edited locally
    pub backups: Vec<BackupEntry>,
}

/// Enumerates installed packages.
pub trait PackageSource {
    /// All installed packages in database order.
    ///
    /// # Errors
    ///
    /// Any error is fatal: nothing can be derived from a partial package list.
    fn packages(&self) -> Result<Vec<Package>>;
}

/// Lists the files tracked by the mirror.
pub trait RepoSource {
    /// Mirror-relative paths in the order the VCS reports them.
    ///
    /// # Errors
    ///
    /// Any error is fatal.
    fn tracked_files(&self) -> Result<Vec<String>>;
}

/// Instruction returned by a walk visitor for the entry just visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Keep going; directories are entered
    Descend,
    /// Done with this entry
    SkipEntry,
    /// Do not enter this directory
    SkipSubtree,
}

/// What the walk reports for one entry.
#[derive(Debug)]
pub enum Visit<'a> {
    /// A readable directory entry
    Entry {
        /// Full path of the entry
        path: &'a Path,
        /// True for directories (symlinks are never followed)
        is_dir: bool,
    },
    /// An entry that could not be read
    Unreadable {
        /// Path of the entry, when known
        path: Option<&'a Path>,
        /// What went wrong
        error: &'a io::Error,
    },
}

/// Recursive directory listing.
pub trait FilesystemSource {
    /// Walks `root` depth first, calling `visit` for each entry including `root` itself.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `visit`.
    fn walk(&self, root: &Path, visit: &mut dyn FnMut(Visit<'_>) -> Result<WalkAction>)
    -> Result<()>;
}
