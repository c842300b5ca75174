use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Fields archdiff understands, keyed as `section.field`
const KNOWN_FIELDS: &[&str] = &[
    "core.root",
    "core.dbpath",
    "core.repo",
    "core.scope",
    "ignore.use_defaults",
    "ignore.patterns",
    "ignore.dirs",
    "performance.parallel_threads",
];

/// Flags configuration keys that would otherwise be silently ignored
pub struct ConfigValidator {
    /// Set of valid configuration fields
    known_fields: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        Self {
            known_fields: KNOWN_FIELDS.iter().copied().collect(),
        }
    }

    /// Returns the dotted keys in `content` that archdiff does not recognise
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML
    pub fn unknown_fields(&self, content: &str) -> Result<Vec<String>> {
        let parsed: toml::Value = toml::from_str(content)?;
        let mut unknown = Vec::new();
        self.check_table(&parsed, "", &mut unknown);
        Ok(unknown)
    }

    /// Validate a configuration file on disk and log a warning per unknown key
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn validate_config_file(&self, config_path: &Path) -> Result<()> {
        if !config_path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(config_path)?;
        for field in self.unknown_fields(&content)? {
            warn!(
                "Unknown configuration field '{}' in {}",
                field,
                config_path.display()
            );
        }

        Ok(())
    }

    /// Recursively checks a TOML table for unknown fields
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        let toml::Value::Table(map) = table else {
            return;
        };

        for (key, value) in map {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if self.known_fields.contains(full_key.as_str()) {
                continue;
            }

            if let toml::Value::Table(_) = value {
                self.check_table(value, &full_key, unknown);
            } else {
                unknown.push(full_key);
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
