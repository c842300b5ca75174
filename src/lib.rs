#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # Archdiff - Package, Disk and Mirror Reconciliation
//!
//! Archdiff compares three views of the same file hierarchy and reports
//! the files that need attention:
//!
//! - the files pacman claims to own, with the MD5 it recorded for each
//!   backup (configuration) file,
//! - the files that actually exist under the scope root,
//! - the files tracked by a git mirror meant to capture local edits.
//!
//! ## Architecture
//!
//! - [`hash`]: content fingerprints with a typed per-file outcome
//! - [`ignore`]: glob-based ignore filter
//! - [`sources`]: pacman database, directory walk and `git ls-files` adapters
//! - [`reconcile`]: the memoized collection engine
//! - [`commands`]: `ls` and `status` command implementations
//! - [`config`]: configuration file parsing and scope defaults
//! - [`output`]: listing output and verbosity
//!
//! ## Example Usage
//!
//! ```no_run
//! use archdiff::config::Config;
//! use archdiff::reconcile::{Collection, Reconciler};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let mut reconciler = Reconciler::new(&config)?;
//! for file in reconciler.collection(Collection::MissingInRepo)?.iter() {
//!     println!("{}", file.name);
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// `ls` and `status` command implementations.
pub mod commands;

/// Configuration parsing, validation and scope defaults.
pub mod config;

/// Structural error types shared by the engine and the sources.
pub mod errors;

/// Content fingerprints for files on disk.
pub mod hash;

/// Glob based ignore filter.
pub mod ignore;

/// Listing output and verbosity control.
pub mod output;

/// Path normalization between the scope root, the mirror and record names.
pub mod paths;

/// The reconciliation engine and its memoized collections.
pub mod reconcile;

/// External data sources: package database, filesystem and mirror.
pub mod sources;

/// Rayon thread pool configuration.
pub mod thread_pool;

/// Current version of the archdiff binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default installation root.
pub const DEFAULT_ROOT: &str = "/";

/// Default pacman database location.
pub const DEFAULT_DBPATH: &str = "/var/lib/pacman";

/// Default git mirror directory.
pub const DEFAULT_REPO: &str = "/usr/share/archdiff";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/archdiff/config.toml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV: &str = "ARCHDIFF_CONFIG";
