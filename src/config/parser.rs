use super::Config;
use anyhow::{Context, Result};
use std::path::Path;

pub fn parse_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let content = simdutf8::basic::from_utf8(&content)
        .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in config file: {}", e))?;

    parse_config_str(content)
}

pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse TOML config")?;

    // Validate and return validation errors directly without wrapping
    validate_config(&config)?;
    Ok(config)
}

/// Rejects values the engine cannot run with.
///
/// # Errors
///
/// Returns an error if the thread count is zero or the root or mirror
/// path is relative
pub fn validate_config(config: &Config) -> Result<()> {
    if config.performance.parallel_threads == 0 {
        anyhow::bail!("Parallel threads must be at least 1");
    }

    if !config.core.root.is_absolute() {
        anyhow::bail!(
            "Root must be an absolute path: {}",
            config.core.root.display()
        );
    }

    // the walk prunes the mirror by comparing it with absolute entry paths
    if !config.core.repo.is_absolute() {
        anyhow::bail!(
            "Repo must be an absolute path: {}",
            config.core.repo.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scope;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_parse_valid_config() {
        let toml_content = r#"
[core]
root = "/mnt/sys"
dbpath = "/mnt/sys/var/lib/pacman"
repo = "/srv/etc-mirror"
scope = "etc"

[ignore]
use_defaults = false
patterns = ["/etc/hostname", "/etc/machine-id"]

[performance]
parallel_threads = 4
"#;

        let config = parse_config_str(toml_content).unwrap();
        assert_eq!(config.core.root, PathBuf::from("/mnt/sys"));
        assert_eq!(config.core.scope, Scope::Etc);
        assert!(!config.ignore.use_defaults);
        assert_eq!(config.ignore.patterns.len(), 2);
        assert_eq!(config.performance.parallel_threads, 4);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = parse_config_str("[core]\nrepo = \"/srv/mirror\"\n").unwrap();
        assert_eq!(config.core.repo, PathBuf::from("/srv/mirror"));
        assert_eq!(config.core.root, PathBuf::from("/"));
        assert!(config.ignore.use_defaults);
    }

    #[test]
    fn test_validate_zero_threads() {
        let mut config = Config::default();
        config.performance.parallel_threads = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_validate_relative_root() {
        let err = parse_config_str("[core]\nroot = \"relative/dir\"\n").unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn test_validate_relative_repo() {
        let err = parse_config_str("[core]\nrepo = \"mirror\"\n").unwrap_err();
        assert!(err.to_string().contains("Repo must be an absolute path"));

        let mut config = Config::default();
        config.core.repo = PathBuf::from("./srv/mirror");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_scope_rejected() {
        assert!(parse_config_str("[core]\nscope = \"usr\"\n").is_err());
    }

    #[test]
    fn test_parse_config_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[performance]\nparallel_threads = 2\n")?;

        let config = parse_config_file(&path)?;
        assert_eq!(config.performance.parallel_threads, 2);
        Ok(())
    }
}
