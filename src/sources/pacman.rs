//! Reader for pacman's local database.
//!
//! Layout under `<dbpath>/local/`:
//!
//! ```text
//! ALPM_DB_VERSION
//! openssh-9.6p1-1/
//!     desc     %NAME%, %VERSION%, ...
//!     files    %FILES% (owned paths) and %BACKUP% (path<TAB>md5)
//! ```

use super::{BackupEntry, Package, PackageSource};
use crate::errors::ReconcileError;
use crate::paths::normalize_name;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory under `dbpath` holding installed packages.
pub const LOCAL_DB_DIR: &str = "local";

/// Pacman's local package database.
#[derive(Debug, Clone)]
pub struct PacmanDb {
    /// `<dbpath>/local`
    local_dir: PathBuf,
}

impl PacmanDb {
    /// Points at `<dbpath>/local`. Nothing is read until [`PackageSource::packages`].
    #[must_use]
    pub fn new(dbpath: &Path) -> Self {
        Self {
            local_dir: dbpath.join(LOCAL_DB_DIR),
        }
    }

    fn load_package(dir: &Path) -> Result<Package> {
        let files_path = dir.join("files");
        let files = std::fs::read_to_string(&files_path)
            .map_err(|e| ReconcileError::package_db(&files_path, e.to_string()))?;

        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let name = match std::fs::read_to_string(dir.join("desc")) {
            Ok(desc) => section(&desc, "%NAME%")
                .next()
                .map_or_else(|| dir_name.clone(), str::to_string),
            Err(_) => dir_name.clone(),
        };

        let mut package = parse_files(&files);
        package.name = name;
        Ok(package)
    }
}

/// Parses the content of a package's `files` entry.
#[must_use]
pub fn parse_files(content: &str) -> Package {
    let files = section(content, "%FILES%")
        .map(|line| normalize_name(line).to_string())
        .collect();

    let backups = section(content, "%BACKUP%")
        .filter_map(|line| {
            let (name, hash) = line.split_once('\t')?;
            Some(BackupEntry {
                name: normalize_name(name).to_string(),
                hash: hash.trim().to_string(),
            })
        })
        .collect();

    Package {
        name: String::new(),
        files,
        backups,
    }
}

/// Non-empty lines following `header` up to the next blank line.
fn section<'a>(content: &'a str, header: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    content
        .lines()
        .skip_while(move |line| line.trim_end() != header)
        .skip(1)
        .take_while(|line| !line.trim().is_empty())
        .map(str::trim_end)
}

impl PackageSource for PacmanDb {
    fn packages(&self) -> Result<Vec<Package>> {
        let entries = std::fs::read_dir(&self.local_dir)
            .map_err(|e| ReconcileError::package_db(&self.local_dir, e.to_string()))?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| ReconcileError::package_db(&self.local_dir, e.to_string()))?;
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                dirs.push(entry.path());
            }
        }
        dirs.sort();

        let mut packages = Vec::with_capacity(dirs.len());
        for dir in &dirs {
            let package = Self::load_package(dir)?;
            debug!(
                package = %package.name,
                files = package.files.len(),
                backups = package.backups.len(),
                "loaded package"
            );
            packages.push(package);
        }

        info!(
            "Loaded {} packages from {}",
            packages.len(),
            self.local_dir.display()
        );
        Ok(packages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FILES: &str = "%FILES%\netc/\netc/ssh/\netc/ssh/sshd_config\nusr/bin/sshd\n\n%BACKUP%\netc/ssh/sshd_config\t0123456789abcdef0123456789abcdef\n\n";

    #[test]
    fn test_parse_files_sections() {
        let package = parse_files(FILES);
        assert_eq!(
            package.files,
            vec!["etc/", "etc/ssh/", "etc/ssh/sshd_config", "usr/bin/sshd"]
        );
        assert_eq!(
            package.backups,
            vec![BackupEntry {
                name: "etc/ssh/sshd_config".to_string(),
                hash: "0123456789abcdef0123456789abcdef".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_files_without_backup() {
        let package = parse_files("%FILES%\nusr/bin/ls\n");
        assert_eq!(package.files, vec!["usr/bin/ls"]);
        assert!(package.backups.is_empty());
    }

    #[test]
    fn test_packages_in_name_order() -> Result<()> {
        let temp = TempDir::new()?;
        let local = temp.path().join(LOCAL_DB_DIR);
        fs::create_dir_all(local.join("zsh-5.9-1"))?;
        fs::create_dir_all(local.join("openssh-9.6p1-1"))?;
        fs::write(local.join("ALPM_DB_VERSION"), "9\n")?;
        fs::write(local.join("zsh-5.9-1/files"), "%FILES%\nusr/bin/zsh\n")?;
        fs::write(local.join("zsh-5.9-1/desc"), "%NAME%\nzsh\n\n%VERSION%\n5.9-1\n")?;
        fs::write(local.join("openssh-9.6p1-1/files"), FILES)?;

        let packages = PacmanDb::new(temp.path()).packages()?;
        assert_eq!(packages.len(), 2);
        // no desc: falls back to directory name
        assert_eq!(packages[0].name, "openssh-9.6p1-1");
        assert_eq!(packages[1].name, "zsh");
        assert_eq!(packages[1].files, vec!["usr/bin/zsh"]);
        Ok(())
    }

    #[test]
    fn test_missing_database_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = PacmanDb::new(temp.path()).packages().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconcileError>(),
            Some(ReconcileError::PackageDatabase { .. })
        ));
    }

    #[test]
    fn test_package_without_files_is_fatal() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("local/broken-1.0-1")).unwrap();
        assert!(PacmanDb::new(temp.path()).packages().is_err());
    }
}
