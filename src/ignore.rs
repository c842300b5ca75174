use crate::errors::ReconcileError;
use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::path::Path;

/// `*` stops at `/`, so `/dev/*` matches `/dev/null` but not `/dev/pts/0`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Ordered list of compiled shell globs.
///
/// Paths are matched as they appear on the installed system (absolute,
/// starting with `/`), independent of any alternate root.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    /// Compiled patterns in configuration order
    patterns: Vec<Pattern>,
}

impl IgnoreFilter {
    /// Compiles every glob up front.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidPattern`] for the first glob that
    /// does not parse.
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Result<Self> {
        let patterns = globs
            .iter()
            .map(|glob| {
                let glob = glob.as_ref();
                Pattern::new(glob).map_err(|err| ReconcileError::InvalidPattern {
                    pattern: glob.to_string(),
                    message: err.to_string(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Reads extra globs from every file in `dir`, in file name order.
    ///
    /// One glob per line; blank lines and lines starting with `#` are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or one of its files can't be read.
    pub fn read_pattern_dir(dir: &Path) -> Result<Vec<String>> {
        let mut files = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read ignore directory: {}", dir.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("Failed to read ignore directory: {}", dir.display()))?;
        files.sort();

        let mut globs = Vec::new();
        for file in files.iter().filter(|p| p.is_file()) {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read ignore file: {}", file.display()))?;
            globs.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(str::to_string),
            );
        }

        Ok(globs)
    }

    /// True when `path` matches any pattern. Stops at the first match.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
    }

    /// Same as [`is_ignored`](Self::is_ignored) for a root-relative record name.
    #[must_use]
    pub fn is_ignored_name(&self, name: &str) -> bool {
        self.is_ignored(&crate::paths::system_path(name))
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no pattern is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
