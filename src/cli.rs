//! Command-line interface definitions for archdiff.
//!
//! The definitions are shared between the main binary and the xtask man page
//! generator.
//!
//! Field-level documentation doubles as clap help text.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use crate::config::{Config, Scope};
use crate::reconcile::Collection;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for archdiff.
#[derive(Parser)]
#[command(
    name = "archdiff",
    version = crate::VERSION,
    about = "Reconcile pacman-owned files, files on disk and a git mirror",
    long_about = "Lists files that were changed since install or are owned by no package, \
                  and checks which of them a git mirror of local edits still misses"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Root of the file hierarchy to inspect
    #[arg(long, global = true, env = "ARCHDIFF_ROOT")]
    pub root: Option<PathBuf>,

    /// Pacman database directory
    #[arg(long, global = true, env = "ARCHDIFF_DBPATH")]
    pub dbpath: Option<PathBuf>,

    /// Git mirror working tree
    #[arg(long, global = true, env = "ARCHDIFF_REPO")]
    pub repo: Option<PathBuf>,

    /// Part of the hierarchy to inspect
    #[arg(long, global = true, value_enum)]
    pub scope: Option<Scope>,

    /// Directory of ignore pattern files (repeatable)
    #[arg(long = "ignore-dir", global = true)]
    pub ignore_dirs: Vec<PathBuf>,

    /// Configuration file
    #[arg(
        long,
        global = true,
        env = crate::CONFIG_ENV,
        default_value = crate::DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    /// Show per-collection timing and counts
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only report fatal errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.core.root.clone_from(root);
        }
        if let Some(dbpath) = &self.dbpath {
            config.core.dbpath.clone_from(dbpath);
        }
        if let Some(repo) = &self.repo {
            config.core.repo.clone_from(repo);
        }
        if let Some(scope) = self.scope {
            config.core.scope = scope;
        }
        config
            .ignore
            .dirs
            .extend(self.ignore_dirs.iter().cloned());
    }
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print one or more collections
    Ls {
        /// Collections to print, in order
        #[arg(value_enum, required = true)]
        names: Vec<Collection>,
    },

    /// Show what the mirror is missing or disagrees with
    Status {
        /// One line per file with a status code
        #[arg(short, long)]
        short: bool,
    },

    /// List the collection names accepted by `ls`
    Collections,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
