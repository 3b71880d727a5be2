//! Scanner module for directory traversal and content hashing.
//!
//! This module provides functionality for:
//! - Sorted directory walking using jwalk
//! - Grouping files by their cheap `(name, size)` signature
//! - Full-content hashing with BLAKE3
//!
//! # Architecture
//!
//! - [`walker`]: Directory traversal and entry classification
//! - [`collect`]: Signature grouping over one or more roots
//! - [`hasher`]: Streaming BLAKE3 file hashing
//!
//! # Example
//!
//! ```no_run
//! use dupepurge::scanner::{collect_signatures, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let roots = vec![PathBuf::from("/home/user/photos")];
//! let collection = collect_signatures(&roots, &WalkerConfig::default());
//! println!(
//!     "{} files in {} signature groups",
//!     collection.totals.files_scanned,
//!     collection.groups.len()
//! );
//! ```

pub mod collect;
pub mod hasher;
pub mod walker;

use std::ffi::OsString;
use std::path::PathBuf;

pub use collect::{collect_signatures, Collection, ScanTotals, Signature, SignatureGroup};
pub use hasher::{hash_to_hex, Hash, Hasher};
pub use walker::{WalkItem, Walker};

/// A regular, non-empty file discovered during traversal.
///
/// Immutable once created; carries everything the cheap-signature phase needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Path as produced by the walk (root joined with the relative path)
    pub path: PathBuf,
    /// Final path component
    pub name: OsString,
    /// File size in bytes, always > 0
    pub size: u64,
}

impl FileCandidate {
    /// Create a new candidate.
    ///
    /// The name is taken from the final component of `path`.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        let name = path.file_name().map(OsString::from).unwrap_or_default();
        Self { path, name, size }
    }

    /// The cheap signature used to bucket this candidate.
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature {
            name: self.name.clone(),
            size: self.size,
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Filename suffixes to exclude before signature grouping.
    pub ignore_suffixes: Vec<String>,
}

impl WalkerConfig {
    /// Create a configuration that excludes the given suffixes.
    ///
    /// Empty suffixes are dropped; they would otherwise match every file.
    #[must_use]
    pub fn new(ignore_suffixes: Vec<String>) -> Self {
        Self {
            ignore_suffixes: ignore_suffixes
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Whether a file name ends in one of the excluded suffixes.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
