pub mod parser;
pub mod scope;
pub mod validator;

pub use scope::Scope;

use crate::ignore::IgnoreFilter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,

    #[serde(default)]
    pub ignore: IgnoreConfig,

    #[serde(default)]
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Installation root the package database describes
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Pacman database location (the directory holding `local/`)
    #[serde(default = "default_dbpath")]
    pub dbpath: PathBuf,
    /// Git working tree mirroring locally relevant files
    #[serde(default = "default_repo")]
    pub repo: PathBuf,
    #[serde(default)]
    pub scope: Scope,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreConfig {
    /// Start from the scope's built-in list
    #[serde(default = "default_true")]
    pub use_defaults: bool,
    /// Extra globs appended after the defaults
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Directories holding files of globs, one per line
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "crate::thread_pool::default_threads")]
    pub parallel_threads: usize,
}

fn default_root() -> PathBuf {
    PathBuf::from(crate::DEFAULT_ROOT)
}

fn default_dbpath() -> PathBuf {
    PathBuf::from(crate::DEFAULT_DBPATH)
}

fn default_repo() -> PathBuf {
    PathBuf::from(crate::DEFAULT_REPO)
}

const fn default_true() -> bool {
    true
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            dbpath: default_dbpath(),
            repo: default_repo(),
            scope: Scope::default(),
        }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            use_defaults: true,
            patterns: Vec::new(),
            dirs: Vec::new(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel_threads: crate::thread_pool::default_threads(),
        }
    }
}

impl Config {
    /// Load configuration from a file, falling back to defaults if it is absent
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML
    /// - Validation fails (see [`parser::validate_config`])
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        parser::parse_config_file(path)
    }

    /// The ordered glob list for this configuration: scope defaults (unless
    /// disabled), then `patterns`, then the contents of each ignore directory.
    ///
    /// # Errors
    ///
    /// Returns an error if an ignore directory cannot be read
    pub fn ignore_globs(&self) -> Result<Vec<String>> {
        let mut globs: Vec<String> = if self.ignore.use_defaults {
            self.core
                .scope
                .default_ignore_globs()
                .iter()
                .map(|g| (*g).to_string())
                .collect()
        } else {
            Vec::new()
        };

        globs.extend(self.ignore.patterns.iter().cloned());

        for dir in &self.ignore.dirs {
            globs.extend(IgnoreFilter::read_pattern_dir(dir)?);
        }

        Ok(globs)
    }

    /// Compiles [`ignore_globs`](Self::ignore_globs) into a filter.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory can't be read or a glob is malformed
    pub fn ignore_filter(&self) -> Result<IgnoreFilter> {
        IgnoreFilter::new(&self.ignore_globs()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");

        let config = Config::load(&path)?;
        assert_eq!(config.core.root, PathBuf::from("/"));
        assert_eq!(config.core.dbpath, PathBuf::from("/var/lib/pacman"));
        assert_eq!(config.core.scope, Scope::System);
        // never created on disk
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_ignore_globs_order() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("site"), "/srv/cache/*\n")?;

        let mut config = Config::default();
        config.core.scope = Scope::Etc;
        config.ignore.patterns = vec!["/etc/hostname".to_string()];
        config.ignore.dirs = vec![dir.path().to_path_buf()];

        let globs = config.ignore_globs()?;
        let defaults = Scope::Etc.default_ignore_globs();
        assert_eq!(globs.len(), defaults.len() + 2);
        assert_eq!(globs[0], defaults[0]);
        assert_eq!(globs[defaults.len()], "/etc/hostname");
        assert_eq!(globs[defaults.len() + 1], "/srv/cache/*");
        Ok(())
    }

    #[test]
    fn test_defaults_can_be_disabled() -> Result<()> {
        let mut config = Config::default();
        config.ignore.use_defaults = false;
        config.ignore.patterns = vec!["/tmp/*".to_string()];

        assert_eq!(config.ignore_globs()?, vec!["/tmp/*".to_string()]);
        Ok(())
    }

    #[test]
    fn test_bad_extra_pattern_fails_fast() {
        let mut config = Config::default();
        config.ignore.patterns = vec!["/etc/[".to_string()];
        assert!(config.ignore_filter().is_err());
    }
}
