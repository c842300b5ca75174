//! Package source backed by libalpm, enabled with the `alpm` feature.

use super::pacman::LOCAL_DB_DIR;
use super::{BackupEntry, Package, PackageSource};
use crate::errors::ReconcileError;
use crate::paths::normalize_name;
use anyhow::Result;
use std::borrow::Cow;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The installed packages as libalpm reports them.
#[derive(Debug, Clone)]
pub struct AlpmDb {
    root: PathBuf,
    dbpath: PathBuf,
}

impl AlpmDb {
    /// No handle is opened until [`PackageSource::packages`].
    #[must_use]
    pub fn new(root: &Path, dbpath: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            dbpath: dbpath.to_path_buf(),
        }
    }
}

fn lossy<T: AsRef<[u8]> + ?Sized>(name: &T) -> Cow<'_, str> {
    String::from_utf8_lossy(name.as_ref())
}

impl PackageSource for AlpmDb {
    fn packages(&self) -> Result<Vec<Package>> {
        // libalpm reports an absent database as an empty one
        let local_dir = self.dbpath.join(LOCAL_DB_DIR);
        if !local_dir.is_dir() {
            return Err(ReconcileError::package_db(local_dir, "no local database").into());
        }

        let handle = alpm::Alpm::new(
            self.root.as_os_str().as_bytes(),
            self.dbpath.as_os_str().as_bytes(),
        )
        .map_err(|e| ReconcileError::package_db(&self.dbpath, e.to_string()))?;

        let mut packages = Vec::new();
        for pkg in handle.localdb().pkgs() {
            let package = Package {
                name: pkg.name().to_string(),
                files: pkg
                    .files()
                    .files()
                    .iter()
                    .map(|f| normalize_name(&lossy(f.name())).to_string())
                    .collect(),
                backups: pkg
                    .backup()
                    .iter()
                    .map(|b| BackupEntry {
                        name: normalize_name(&lossy(b.name())).to_string(),
                        hash: lossy(b.hash()).into_owned(),
                    })
                    .collect(),
            };
            debug!(
                package = %package.name,
                files = package.files.len(),
                backups = package.backups.len(),
                "loaded package"
            );
            packages.push(package);
        }

        info!(
            "Loaded {} packages through libalpm from {}",
            packages.len(),
            self.dbpath.display()
        );
        Ok(packages)
    }
}
