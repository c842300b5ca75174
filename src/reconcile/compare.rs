//! Turns per-file hash outcomes into membership decisions.
//!
//! Recoverable conditions are logged here and never leave the collection
//! being built. Anything else becomes a fatal [`ReconcileError::Io`].

use crate::errors::ReconcileError;
use crate::hash::HashOutcome;
use std::path::Path;
use tracing::{debug, warn};

/// What to do with one candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Content differs; the file belongs in the collection
    Differs,
    /// Content matches
    Same,
    /// Left out of the collection (absent, or unreadable and logged)
    Skipped,
}

/// Compares a backup file on disk against its recorded hash.
///
/// A backup missing from disk is skipped; it is reported by the `deleted`
/// collection instead.
///
/// # Errors
///
/// Returns [`ReconcileError::Io`] for an unexpected read failure.
pub fn backup_verdict(
    path: &Path,
    recorded: Option<&str>,
    outcome: HashOutcome,
) -> Result<Verdict, ReconcileError> {
    match outcome {
        HashOutcome::Success(actual) => {
            if recorded == Some(actual.as_str()) {
                Ok(Verdict::Same)
            } else {
                Ok(Verdict::Differs)
            }
        }
        HashOutcome::NotFound => {
            debug!("Backup file missing from disk: {}", path.display());
            Ok(Verdict::Skipped)
        }
        HashOutcome::NotAFile => {
            debug!("Backup path is no longer a regular file: {}", path.display());
            Ok(Verdict::Differs)
        }
        HashOutcome::PermissionDenied(err) => {
            warn!("Skipping file: {}: {}", path.display(), err);
            Ok(Verdict::Skipped)
        }
        HashOutcome::Failed(err) => Err(ReconcileError::io(path, err)),
    }
}

/// What one side of a mirror comparison holds.
#[derive(Debug)]
enum Side {
    /// Nothing at the path
    Absent,
    /// A directory or other non-regular file
    NotAFile,
    /// Regular file with this fingerprint
    Hashed(String),
}

/// Compares a mirror-tracked file on disk with its copy in the mirror.
///
/// Absent on one side only counts as a difference; absent on both sides is
/// skipped. A non-regular file on either side is a difference. The disk side
/// is examined before the mirror side.
///
/// # Errors
///
/// Returns [`ReconcileError::Io`] for an unexpected read failure on either side.
pub fn mirror_verdict(
    disk_path: &Path,
    disk: HashOutcome,
    mirror_path: &Path,
    mirror: HashOutcome,
) -> Result<Verdict, ReconcileError> {
    let disk = match disk {
        HashOutcome::PermissionDenied(err) => {
            warn!("Skipping file: {}: {}", disk_path.display(), err);
            return Ok(Verdict::Skipped);
        }
        HashOutcome::Failed(err) => return Err(ReconcileError::io(disk_path, err)),
        HashOutcome::Success(hash) => Side::Hashed(hash),
        HashOutcome::NotAFile => Side::NotAFile,
        HashOutcome::NotFound => Side::Absent,
    };

    let mirror = match mirror {
        HashOutcome::PermissionDenied(err) => {
            warn!("Skipping file: {}: {}", mirror_path.display(), err);
            return Ok(Verdict::Skipped);
        }
        HashOutcome::Failed(err) => return Err(ReconcileError::io(mirror_path, err)),
        HashOutcome::Success(hash) => Side::Hashed(hash),
        HashOutcome::NotAFile => Side::NotAFile,
        HashOutcome::NotFound => Side::Absent,
    };

    Ok(match (disk, mirror) {
        (Side::Absent, Side::Absent) => {
            debug!(
                "Tracked file absent from disk and mirror: {}",
                disk_path.display()
            );
            Verdict::Skipped
        }
        (Side::Hashed(a), Side::Hashed(b)) if a == b => Verdict::Same,
        _ => Verdict::Differs,
    })
}
