//! Content fingerprints for files on disk.
//!
//! Hashing never fails with a generic error. Every call produces a
//! [`HashOutcome`] whose variants encode how the caller must react:
//! use the fingerprint, treat the file as absent, skip it with a warning,
//! or abort the run.

use md5::{Digest as _, Md5};
use memmap2::MmapOptions;
use std::fs::{File, Metadata};
use std::io::{self, Read};
use std::path::Path;
use xxhash_rust::xxh3::xxh3_128;

/// Files at or above this size are memory mapped instead of read.
pub const MMAP_THRESHOLD: u64 = 1_048_576;

/// Fingerprint algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Digest {
    /// MD5, hex encoded. Matches the hashes pacman records for backup files.
    Md5,
    /// 128-bit xxHash3, hex encoded. Used when both sides are hashed locally.
    Xxh3,
}

/// Result of fingerprinting one file.
#[derive(Debug)]
pub enum HashOutcome {
    /// The file was read completely
    Success(String),
    /// Nothing exists at the path
    NotFound,
    /// Something other than a regular file (a directory, a socket) sits
    /// at the path
    NotAFile,
    /// The file exists but may not be read; skip it and keep going
    PermissionDenied(io::Error),
    /// Any other I/O failure; the environment can't be trusted
    Failed(io::Error),
}

impl HashOutcome {
    /// Sorts an I/O error into the outcome the caller has to act on.
    #[must_use]
    pub fn from_io_error(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::IsADirectory => Self::NotAFile,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(err),
            _ => Self::Failed(err),
        }
    }
}

/// Hashes a byte slice with `digest`.
#[must_use]
pub fn hash_bytes(data: &[u8], digest: Digest) -> String {
    match digest {
        Digest::Md5 => format!("{:x}", Md5::digest(data)),
        Digest::Xxh3 => format!("{:032x}", xxh3_128(data)),
    }
}

/// Fingerprints the file at `path`.
///
/// Symlinks are followed. Only regular files are read; anything else
/// yields [`HashOutcome::NotAFile`] without touching its content.
pub fn hash_file(path: &Path, digest: Digest) -> HashOutcome {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => return HashOutcome::from_io_error(err),
    };
    let metadata = match file.metadata() {
        Ok(metadata) => metadata,
        Err(err) => return HashOutcome::from_io_error(err),
    };
    if !metadata.is_file() {
        return HashOutcome::NotAFile;
    }

    match read_and_hash(file, &metadata, digest) {
        Ok(hash) => HashOutcome::Success(hash),
        Err(err) => HashOutcome::from_io_error(err),
    }
}

fn read_and_hash(mut file: File, metadata: &Metadata, digest: Digest) -> io::Result<String> {
    if metadata.len() == 0 {
        return Ok(hash_bytes(b"", digest));
    }

    if metadata.len() < MMAP_THRESHOLD {
        let mut content = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
        file.read_to_end(&mut content)?;
        Ok(hash_bytes(&content, digest))
    } else {
        // SAFETY: the map is read-only and dropped before returning
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        Ok(hash_bytes(&mmap, digest))
    }
}
