//! Output formatting and verbosity for the archdiff CLI.
//!
//! Collection listings go to stdout. Diagnostics go through `tracing` to
//! stderr; the verbosity chosen on the command line selects the default
//! filter level.

use crate::reconcile::FileRecord;
use colored::Colorize;
use std::io::{self, Write};

/// Verbosity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Only fatal errors.
    Quiet = 0,
    /// Warnings about skipped files and fatal errors.
    Normal = 1,
    /// Per-collection timing and counts as well.
    Verbose = 2,
}

impl Verbosity {
    /// Picks the level from the `--quiet` / `--verbose` flags.
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Default `tracing` filter directive for this level.
    #[must_use]
    pub const fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

/// Installs the stderr `tracing` subscriber.
///
/// `RUST_LOG` wins over the verbosity flags when it is set.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(level: Verbosity) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.filter_directive()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}

/// Writes a collection name followed by its entries, indented by two spaces.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_listing<W: Write>(out: &mut W, name: &str, files: &[FileRecord]) -> io::Result<()> {
    writeln!(out, "{}", name.bold())?;
    for file in files {
        writeln!(out, "  {}", file.name)?;
    }
    Ok(())
}

/// Writes one `<code> /<name>` line per entry.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_short_status<W: Write>(out: &mut W, entries: &[(char, String)]) -> io::Result<()> {
    for (code, name) in entries {
        let code = match *code {
            'R' => code.to_string().yellow(),
            'B' => code.to_string().blue(),
            'D' => code.to_string().red(),
            _ => code.to_string().normal(),
        };
        writeln!(out, "{} {}", code, crate::paths::system_path(name))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::Normal.filter_directive(), "warn");
    }

    #[test]
    fn test_write_listing() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let files = vec![FileRecord::new("etc/a"), FileRecord::new("etc/b")];
        write_listing(&mut out, "unpackaged", &files).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "unpackaged\n  etc/a\n  etc/b\n");
    }

    #[test]
    fn test_write_short_status() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let entries = vec![('?', "etc/new".to_string()), ('R', "etc/fstab".to_string())];
        write_short_status(&mut out, &entries).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "? /etc/new\nR /etc/fstab\n"
        );
    }
}
