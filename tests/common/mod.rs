#![allow(dead_code)]

use anyhow::Result;
use archdiff::config::Config;
use archdiff::hash::{Digest, hash_bytes};
use archdiff::reconcile::Reconciler;
use archdiff::sources::{PacmanDb, RepoSource, WalkdirSource};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Mirror listing fixed at construction.
pub struct StaticRepo(pub Vec<String>);

impl RepoSource for StaticRepo {
    fn tracked_files(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// A scope root, a pacman database and a mirror directory side by side in a
/// temporary directory.
pub struct Fixture {
    pub temp_dir: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join("root"))?;
        fs::create_dir_all(temp_dir.path().join("db/local"))?;
        fs::create_dir_all(temp_dir.path().join("mirror"))?;
        Ok(Self { temp_dir })
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("root")
    }

    pub fn dbpath(&self) -> PathBuf {
        self.temp_dir.path().join("db")
    }

    pub fn mirror(&self) -> PathBuf {
        self.temp_dir.path().join("mirror")
    }

    /// Writes `content` to the record `name` under the scope root.
    pub fn write_root(&self, name: &str, content: &str) -> Result<()> {
        write(&self.root().join(name), content)
    }

    /// Writes `content` to the record `name` in the mirror working tree.
    pub fn write_mirror(&self, name: &str, content: &str) -> Result<()> {
        write(&self.mirror().join(name), content)
    }

    pub fn remove_root(&self, name: &str) -> Result<()> {
        Ok(fs::remove_file(self.root().join(name))?)
    }

    /// Installs a package whose backups are recorded with the MD5 of the
    /// given original content.
    pub fn add_package(&self, name: &str, files: &[&str], backups: &[(&str, &str)]) -> Result<()> {
        let recorded: Vec<(&str, String)> = backups
            .iter()
            .map(|(file, original)| (*file, hash_bytes(original.as_bytes(), Digest::Md5)))
            .collect();

        let dir = self.dbpath().join("local").join(format!("{name}-1.0-1"));
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("desc"), format!("%NAME%\n{name}\n\n%VERSION%\n1.0-1\n\n"))?;

        let mut content = String::from("%FILES%\n");
        for file in files {
            content.push_str(file);
            content.push('\n');
        }
        content.push_str("\n%BACKUP%\n");
        for (file, hash) in &recorded {
            content.push_str(&format!("{file}\t{hash}\n"));
        }
        content.push('\n');
        fs::write(dir.join("files"), content)?;
        Ok(())
    }

    /// Configuration pointing at this fixture, without the built-in ignore lists.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.core.root = self.root();
        config.core.dbpath = self.dbpath();
        config.core.repo = self.mirror();
        config.ignore.use_defaults = false;
        config
    }

    /// A reconciler over this fixture whose mirror tracks `tracked`.
    pub fn reconciler(&self, tracked: &[&str]) -> Result<Reconciler> {
        self.reconciler_with(&self.config(), tracked)
    }

    pub fn reconciler_with(&self, config: &Config, tracked: &[&str]) -> Result<Reconciler> {
        Reconciler::with_sources(
            config,
            Box::new(PacmanDb::new(&config.core.dbpath)),
            Box::new(WalkdirSource),
            Box::new(StaticRepo(tracked.iter().map(|s| (*s).to_string()).collect())),
        )
    }
}

fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Record names of `set`, sorted.
pub fn names(set: &[archdiff::reconcile::FileRecord]) -> Vec<String> {
    let mut names: Vec<String> = set.iter().map(|r| r.name.clone()).collect();
    names.sort();
    names
}
