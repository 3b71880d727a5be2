//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and classifying every entry for the cheap-signature phase. Children
//! of each directory are sorted by file name, so for a fixed tree the output
//! order is always the same.
//!
//! Classification rules:
//!
//! - Directories are yielded as [`WalkItem::Directory`] (the root included)
//! - Symlinks are skipped silently, never followed
//! - Empty files and files with an excluded suffix are skipped
//! - Everything else becomes a [`WalkItem::File`]
//!
//! Entries that cannot be inspected are yielded as [`ScanError`] values and
//! the walk continues.
//!
//! # Example
//!
//! ```no_run
//! use dupepurge::scanner::{WalkItem, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! for item in walker.walk() {
//!     match item {
//!         Ok(WalkItem::File(file)) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Ok(WalkItem::Directory(_)) => {}
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::{FileCandidate, ScanError, WalkerConfig};

/// A classified entry produced by [`Walker::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkItem {
    /// A directory that was entered.
    Directory(PathBuf),
    /// A regular, non-empty, non-excluded file.
    File(FileCandidate),
}

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Walk the directory tree, yielding classified entries.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkItem, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(false)
            .process_read_dir(|_depth, _path, _read_dir_state, children| {
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        walk_dir
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let path = entry.path();
                    let file_type = entry.file_type();

                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", path.display());
                        return None;
                    }

                    if file_type.is_dir() {
                        return Some(Ok(WalkItem::Directory(path)));
                    }

                    match std::fs::symlink_metadata(&path) {
                        Ok(metadata) => self.classify_file(path, &metadata),
                        Err(e) => Some(Err(self.handle_io_error(&path, e))),
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    Some(Err(self.handle_jwalk_error(path, e)))
                }
            })
    }

    /// Turn a non-directory entry into a candidate, or skip it.
    fn classify_file(
        &self,
        path: PathBuf,
        metadata: &Metadata,
    ) -> Option<Result<WalkItem, ScanError>> {
        // Sockets, fifos and device nodes are not content we can dedupe
        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", path.display());
            return None;
        }

        let size = metadata.len();
        if size == 0 {
            log::debug!("Skipping empty file: {}", path.display());
            return None;
        }

        let candidate = FileCandidate::new(path, size);
        if self.config.is_ignored(&candidate.name.to_string_lossy()) {
            log::trace!("Ignoring by suffix: {}", candidate.path.display());
            return None;
        }

        Some(Ok(WalkItem::File(candidate)))
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path.to_path_buf())
            }
            ErrorKind::NotFound => {
                log::warn!("File not found (may have been deleted): {}", path.display());
                ScanError::NotFound(path.to_path_buf())
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                ScanError::Io {
                    path: path.to_path_buf(),
                    source: error,
                }
            }
        }
    }

    /// Handle jwalk errors.
    fn handle_jwalk_error(&self, path: PathBuf, error: jwalk::Error) -> ScanError {
        log::warn!("Walker error for {}: {}", path.display(), error);
        ScanError::Io {
            path,
            source: std::io::Error::other(error.to_string()),
        }
    }
}
