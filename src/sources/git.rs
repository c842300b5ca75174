use super::RepoSource;
use crate::errors::ReconcileError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Lists the mirror's tracked files with `git ls-files`.
#[derive(Debug, Clone)]
pub struct GitRepoSource {
    /// Working tree of the mirror
    mirror_path: PathBuf,
}

impl GitRepoSource {
    /// Create a source for the mirror at `mirror_path`
    #[must_use]
    pub fn new(mirror_path: &Path) -> Self {
        Self {
            mirror_path: mirror_path.to_path_buf(),
        }
    }
}

/// Splits NUL-terminated `ls-files -z` output into record names.
///
/// # Errors
///
/// Returns an error if the output is not valid UTF-8
pub fn parse_listing(stdout: &[u8]) -> Result<Vec<String>> {
    let text = simdutf8::basic::from_utf8(stdout)
        .map_err(|e| ReconcileError::RepoListing(format!("output is not UTF-8: {e}")))?;

    Ok(text
        .split_terminator('\0')
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect())
}

impl RepoSource for GitRepoSource {
    fn tracked_files(&self) -> Result<Vec<String>> {
        let git = which::which("git")
            .map_err(|e| ReconcileError::RepoListing(format!("git not found: {e}")))?;

        let output = Command::new(git)
            // NUL-terminated, never C-quoted
            .args(["-c", "core.quotepath=off", "ls-files", "-z"])
            .current_dir(&self.mirror_path)
            .stdin(Stdio::null())
            .output()
            .with_context(|| {
                format!(
                    "Failed to run git ls-files in {}",
                    self.mirror_path.display()
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReconcileError::RepoListing(format!(
                "git ls-files failed in {}: {}",
                self.mirror_path.display(),
                stderr.trim()
            ))
            .into());
        }

        let files = parse_listing(&output.stdout)?;
        debug!(count = files.len(), "listed mirror files");
        Ok(files)
    }
}
