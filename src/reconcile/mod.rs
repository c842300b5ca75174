//! # Reconciliation Engine
//!
//! A [`Reconciler`] owns the configuration, the three data sources and a
//! cache of computed collections. Collections are derived on first request
//! and never recomputed:
//!
//! ```text
//! PackageSource ──> package-backups ──> modified-backups ─┐
//!               └─> package ──┬──────> deleted            │
//!                             v                           v
//! FilesystemSource ─> all ──> unpackaged ────────> missing-in-repo
//!                                                         ^
//! RepoSource ───────> repo ──> different-in-repo          │
//!                       └─────────────────────────────────┘
//! ```
//!
//! Per-file permission problems are logged and the file is left out of the
//! collection being built. Unexpected I/O failures and source failures abort
//! the whole computation.

/// File records and collection names.
pub mod collection;

/// Verdicts for hashed candidates.
pub mod compare;

/// Name-based set operations.
pub mod set_ops;

pub use collection::{Collection, FileRecord, FileSet};

use crate::config::{Config, Scope};
use crate::errors::ReconcileError;
use crate::hash::{Digest, HashOutcome, hash_file};
use crate::ignore::IgnoreFilter;
use crate::paths::{join_name, normalize_name, record_name};
use crate::sources::{
    FilesystemSource, GitRepoSource, Package, PackageSource, RepoSource, Visit, WalkAction,
    WalkdirSource,
};
use crate::thread_pool;
use anyhow::Result;
use compare::{Verdict, backup_verdict, mirror_verdict};
use rayon::prelude::*;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Level, debug, span, warn};

/// State for one reconciliation run.
pub struct Reconciler {
    /// Installation root the package database describes
    root: PathBuf,
    /// Mirror working tree
    repo: PathBuf,
    /// Part of the root being reconciled
    scope: Scope,
    /// Compiled ignore globs
    ignore: IgnoreFilter,
    /// Installed packages
    package_source: Box<dyn PackageSource>,
    /// Directory walker
    filesystem: Box<dyn FilesystemSource>,
    /// Mirror listing
    repo_source: Box<dyn RepoSource>,
    /// Package list, read once and shared by both package collections
    installed: Option<Arc<Vec<Package>>>,
    /// Computed collections; written once per name
    cache: HashMap<Collection, Arc<FileSet>>,
}

impl Reconciler {
    /// Creates a reconciler over the real system described by `config`.
    ///
    /// The ignore globs are compiled here; no source is touched until a
    /// collection is requested.
    ///
    /// # Errors
    ///
    /// Returns an error if an ignore glob is malformed or an ignore
    /// directory cannot be read.
    pub fn new(config: &Config) -> Result<Self> {
        #[cfg(feature = "alpm")]
        let packages: Box<dyn PackageSource> = Box::new(crate::sources::AlpmDb::new(
            &config.core.root,
            &config.core.dbpath,
        ));
        #[cfg(not(feature = "alpm"))]
        let packages: Box<dyn PackageSource> =
            Box::new(crate::sources::PacmanDb::new(&config.core.dbpath));

        Self::with_sources(
            config,
            packages,
            Box::new(WalkdirSource),
            Box::new(GitRepoSource::new(&config.core.repo)),
        )
    }

    /// Creates a reconciler with explicit sources.
    ///
    /// # Errors
    ///
    /// Returns an error if an ignore glob is malformed or an ignore
    /// directory cannot be read.
    pub fn with_sources(
        config: &Config,
        package_source: Box<dyn PackageSource>,
        filesystem: Box<dyn FilesystemSource>,
        repo_source: Box<dyn RepoSource>,
    ) -> Result<Self> {
        Ok(Self {
            root: config.core.root.clone(),
            repo: config.core.repo.clone(),
            scope: config.core.scope,
            ignore: config.ignore_filter()?,
            package_source,
            filesystem,
            repo_source,
            installed: None,
            cache: HashMap::new(),
        })
    }

    /// True once `collection` has been computed.
    #[must_use]
    pub fn is_cached(&self, collection: Collection) -> bool {
        self.cache.contains_key(&collection)
    }

    /// Returns `collection`, computing it and its dependencies on first use.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error hit while computing.
    pub fn collection(&mut self, collection: Collection) -> Result<Arc<FileSet>> {
        if let Some(set) = self.cache.get(&collection) {
            return Ok(Arc::clone(set));
        }

        let inputs = collection
            .dependencies()
            .iter()
            .map(|&dep| self.collection(dep))
            .collect::<Result<Vec<_>>>()?;

        let _span = span!(Level::DEBUG, "collection", name = %collection).entered();
        let start = Instant::now();

        let set = Arc::new(match (collection, inputs.as_slice()) {
            (Collection::PackageBackups, []) => self.compute_package_backups()?,
            (Collection::Package, []) => self.compute_package_files()?,
            (Collection::All, []) => self.compute_files_on_disk()?,
            (Collection::Repo, []) => self.compute_repo_files()?,
            (Collection::Unpackaged, [on_disk, packaged]) => {
                set_ops::difference(on_disk, &set_ops::name_index(packaged))
            }
            (Collection::ModifiedBackups, [backups]) => self.compute_modified_backups(backups)?,
            (Collection::DifferentInRepo, [tracked]) => self.compute_different_in_repo(tracked)?,
            (Collection::MissingInRepo, [modified, unpackaged, tracked]) => {
                let index = set_ops::name_index(tracked);
                let mut missing = set_ops::difference(modified, &index);
                missing.extend(set_ops::difference(unpackaged, &index));
                missing
            }
            (Collection::Deleted, [packaged]) => self.compute_deleted(packaged)?,
            (collection, inputs) => anyhow::bail!(
                "{collection} was given {} inputs, expected {}",
                inputs.len(),
                collection.dependencies().len()
            ),
        });

        debug!(
            count = set.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "computed {}",
            collection
        );
        self.cache.insert(collection, Arc::clone(&set));
        Ok(set)
    }

    /// Backup files with their recorded hashes.
    ///
    /// # Errors
    ///
    /// Returns an error if the package database cannot be read.
    pub fn package_backup_files(&mut self) -> Result<Arc<FileSet>> {
        self.collection(Collection::PackageBackups)
    }

    /// Every path owned by an installed package.
    ///
    /// # Errors
    ///
    /// Returns an error if the package database cannot be read.
    pub fn all_package_files(&mut self) -> Result<Arc<FileSet>> {
        self.collection(Collection::Package)
    }

    /// Every file on disk inside the scope.
    ///
    /// # Errors
    ///
    /// Returns an error on an unexpected walk failure.
    pub fn all_files_on_disk(&mut self) -> Result<Arc<FileSet>> {
        self.collection(Collection::All)
    }

    /// Files on disk owned by no package.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of its dependencies.
    pub fn unpackaged_files(&mut self) -> Result<Arc<FileSet>> {
        self.collection(Collection::Unpackaged)
    }

    /// Backup files whose content changed since install.
    ///
    /// # Errors
    ///
    /// Returns an error on an unexpected read failure.
    pub fn modified_backup_files(&mut self) -> Result<Arc<FileSet>> {
        self.collection(Collection::ModifiedBackups)
    }

    /// Files tracked by the mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the mirror cannot be listed.
    pub fn repo_files(&mut self) -> Result<Arc<FileSet>> {
        self.collection(Collection::Repo)
    }

    /// Mirror files whose disk content differs from the mirror copy.
    ///
    /// # Errors
    ///
    /// Returns an error on an unexpected read failure.
    pub fn modified_repo_files(&mut self) -> Result<Arc<FileSet>> {
        self.collection(Collection::DifferentInRepo)
    }

    /// Modified backups and unpackaged files the mirror does not track.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of its dependencies.
    pub fn missing_in_repo(&mut self) -> Result<Arc<FileSet>> {
        self.collection(Collection::MissingInRepo)
    }

    /// Package-owned files missing from disk.
    ///
    /// # Errors
    ///
    /// Returns an error on an unexpected metadata failure.
    pub fn missing_from_disk(&mut self) -> Result<Arc<FileSet>> {
        self.collection(Collection::Deleted)
    }

    fn installed_packages(&mut self) -> Result<Arc<Vec<Package>>> {
        if let Some(packages) = &self.installed {
            return Ok(Arc::clone(packages));
        }
        let packages = Arc::new(self.package_source.packages()?);
        self.installed = Some(Arc::clone(&packages));
        Ok(packages)
    }

    fn compute_package_backups(&mut self) -> Result<FileSet> {
        let packages = self.installed_packages()?;
        Ok(packages
            .iter()
            .flat_map(|pkg| &pkg.backups)
            .map(|b| FileRecord::with_hash(normalize_name(&b.name), b.hash.clone()))
            .collect())
    }

    fn compute_package_files(&mut self) -> Result<FileSet> {
        let packages = self.installed_packages()?;
        Ok(packages
            .iter()
            .flat_map(|pkg| &pkg.files)
            .map(|f| FileRecord::new(normalize_name(f)))
            .collect())
    }

    fn compute_files_on_disk(&self) -> Result<FileSet> {
        let walk_root = self.scope.walk_root(&self.root);
        let mut files = FileSet::new();

        self.filesystem.walk(&walk_root, &mut |visit| match visit {
            Visit::Entry { path, is_dir } => {
                let Some(name) = record_name(path, &self.root) else {
                    return Ok(WalkAction::Descend);
                };
                if self.ignore.is_ignored_name(&name) {
                    return Ok(if is_dir {
                        WalkAction::SkipSubtree
                    } else {
                        WalkAction::SkipEntry
                    });
                }
                if is_dir {
                    if path == self.repo {
                        return Ok(WalkAction::SkipSubtree);
                    }
                    return Ok(WalkAction::Descend);
                }
                files.push(FileRecord::new(name));
                Ok(WalkAction::Descend)
            }
            Visit::Unreadable { path, error } => {
                let shown = path.map_or_else(|| walk_root.clone(), PathBuf::from);
                match error.kind() {
                    io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound => {
                        warn!("Skipping file: {}: {}", shown.display(), error);
                        Ok(WalkAction::SkipEntry)
                    }
                    kind => {
                        let error = io::Error::new(kind, error.to_string());
                        Err(ReconcileError::io(shown, error).into())
                    }
                }
            }
        })?;

        Ok(files)
    }

    fn compute_modified_backups(&self, backups: &[FileRecord]) -> Result<FileSet> {
        let candidates: Vec<&FileRecord> = backups
            .iter()
            .filter(|r| !self.ignore.is_ignored_name(&r.name))
            .collect();

        let root = &self.root;
        let outcomes: Vec<HashOutcome> = thread_pool::run_in_pool(|| {
            candidates
                .par_iter()
                .map(|r| hash_file(&join_name(root, &r.name), Digest::Md5))
                .collect()
        })?;

        let mut modified = FileSet::new();
        for (record, outcome) in candidates.into_iter().zip(outcomes) {
            let path = join_name(root, &record.name);
            if backup_verdict(&path, record.hash.as_deref(), outcome)? == Verdict::Differs {
                modified.push(record.clone());
            }
        }
        Ok(modified)
    }

    fn compute_repo_files(&self) -> Result<FileSet> {
        Ok(self
            .repo_source
            .tracked_files()?
            .iter()
            .map(|name| FileRecord::new(normalize_name(name)))
            .collect())
    }

    fn compute_different_in_repo(&self, tracked: &[FileRecord]) -> Result<FileSet> {
        let (root, repo) = (&self.root, &self.repo);
        let outcomes: Vec<(HashOutcome, HashOutcome)> = thread_pool::run_in_pool(|| {
            tracked
                .par_iter()
                .map(|r| {
                    (
                        hash_file(&join_name(root, &r.name), Digest::Xxh3),
                        hash_file(&join_name(repo, &r.name), Digest::Xxh3),
                    )
                })
                .collect()
        })?;

        let mut different = FileSet::new();
        for (record, (disk, mirror)) in tracked.iter().zip(outcomes) {
            let verdict = mirror_verdict(
                &join_name(root, &record.name),
                disk,
                &join_name(repo, &record.name),
                mirror,
            )?;
            if verdict == Verdict::Differs {
                different.push(record.clone());
            }
        }
        Ok(different)
    }

    fn compute_deleted(&self, packaged: &[FileRecord]) -> Result<FileSet> {
        let mut deleted = FileSet::new();
        for record in packaged.iter() {
            if record.name.ends_with('/')
                || !self.scope.contains(&record.name)
                || self.ignore.is_ignored_name(&record.name)
            {
                continue;
            }

            let path = join_name(&self.root, &record.name);
            match std::fs::symlink_metadata(&path) {
                Ok(_) => {}
                Err(err) => match HashOutcome::from_io_error(err) {
                    HashOutcome::NotFound => deleted.push(record.clone()),
                    HashOutcome::PermissionDenied(err) => {
                        warn!("Skipping file: {}: {}", path.display(), err);
                    }
                    HashOutcome::Failed(err) => return Err(ReconcileError::io(path, err).into()),
                    HashOutcome::Success(_) | HashOutcome::NotAFile => {}
                },
            }
        }
        Ok(deleted)
    }
}
