//! Prefix-gated removal of redundant duplicate copies.
//!
//! # Overview
//!
//! Given a confirmed [`DuplicateSet`] and a path prefix, the purge policy:
//!
//! 1. Selects every path whose text starts with the prefix. An empty prefix
//!    selects nothing.
//! 2. Refuses the whole set if the selection covers every copy, so at least
//!    one copy of each distinct content always survives a run.
//! 3. Otherwise removes (or, in report-only mode, announces) each selected
//!    path, carrying on past individual failures.
//!
//! Removal itself goes through the [`Remover`] trait so callers pick between
//! unlinking, the system trash, or a test double.
//!
//! # Example
//!
//! ```no_run
//! use dupepurge::actions::{purge, PermanentRemover, PurgeMode};
//! use dupepurge::duplicates::DuplicateSet;
//! use std::path::PathBuf;
//!
//! let set = DuplicateSet::new(
//!     [0; 32],
//!     1024,
//!     vec![PathBuf::from("/keep/a.bin"), PathBuf::from("/trash/a.bin")],
//! )
//! .unwrap();
//!
//! let outcome = purge(&set, "/trash", PurgeMode::Execute, &mut PermanentRemover);
//! println!("{}", outcome.summary(set.size));
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::duplicates::DuplicateSet;

/// Error type for removal operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Capability that removes one file.
pub trait Remover {
    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError`] when the file could not be removed.
    fn remove(&mut self, path: &Path) -> Result<(), DeleteError>;
}

impl<F> Remover for F
where
    F: FnMut(&Path) -> Result<(), DeleteError>,
{
    fn remove(&mut self, path: &Path) -> Result<(), DeleteError> {
        self(path)
    }
}

/// Unlinks files with [`std::fs::remove_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PermanentRemover;

impl Remover for PermanentRemover {
    fn remove(&mut self, path: &Path) -> Result<(), DeleteError> {
        permanent_delete(path)
    }
}

/// Moves files to the platform trash.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrashRemover;

impl Remover for TrashRemover {
    fn remove(&mut self, path: &Path) -> Result<(), DeleteError> {
        delete_to_trash(path)
    }
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<(), DeleteError> {
    fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

    trash::delete(path).map_err(|e| DeleteError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Moved to trash: {}", path.display());
    Ok(())
}

/// Permanently delete a single file.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `Io` for any other failure
pub fn permanent_delete(path: &Path) -> Result<(), DeleteError> {
    fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;

    log::info!("Permanently deleted: {}", path.display());
    Ok(())
}

/// Whether the policy mutates the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PurgeMode {
    /// Announce what would be removed, touch nothing.
    #[default]
    ReportOnly,
    /// Invoke the remover for every selected path.
    Execute,
}

/// The prefix matched every copy of a duplicate set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("delete prefix matches all {} copies of a file; it needs to be more restrictive", .matched.len())]
pub struct SafetyRefusal {
    /// Every path the prefix matched
    pub matched: Vec<PathBuf>,
}

/// Paths of `paths` whose textual form starts with `prefix`.
///
/// An empty prefix never selects anything.
#[must_use]
pub fn select_candidates<'a>(paths: &'a [PathBuf], prefix: &str) -> Vec<&'a PathBuf> {
    if prefix.is_empty() {
        return Vec::new();
    }
    paths
        .iter()
        .filter(|p| p.to_string_lossy().starts_with(prefix))
        .collect()
}

/// Check that a selection leaves at least one copy of the set in place.
///
/// # Errors
///
/// Returns [`SafetyRefusal`] listing the selection when it covers every
/// path of the set.
pub fn check_preserves_copy(
    candidates: &[&PathBuf],
    set_len: usize,
) -> Result<(), SafetyRefusal> {
    if !candidates.is_empty() && candidates.len() >= set_len {
        return Err(SafetyRefusal {
            matched: candidates.iter().map(|p| (*p).clone()).collect(),
        });
    }
    Ok(())
}

/// What the policy did to one duplicate set.
#[derive(Debug, Default)]
pub struct PurgeOutcome {
    /// Paths removed, or that would be removed in report-only mode.
    pub removed: Vec<PathBuf>,
    /// Removal failures with their errors.
    pub failures: Vec<DeleteError>,
    /// Set when the safety check refused the set.
    pub refusal: Option<SafetyRefusal>,
    /// Mode the policy ran in.
    pub mode: PurgeMode,
}

impl PurgeOutcome {
    /// Number of removed (or would-be-removed) paths.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    /// Bytes freed given the set's per-file size.
    #[must_use]
    pub fn bytes_reclaimed(&self, size: u64) -> u64 {
        self.removed.len() as u64 * size
    }

    /// Whether every attempted removal succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether the safety check refused this set.
    #[must_use]
    pub fn is_refused(&self) -> bool {
        self.refusal.is_some()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self, size: u64) -> String {
        if let Some(refusal) = &self.refusal {
            return format!("Refused: {refusal}");
        }
        let verb = match self.mode {
            PurgeMode::ReportOnly => "Would remove",
            PurgeMode::Execute => "Removed",
        };
        if self.all_succeeded() {
            format!(
                "{verb} {} file(s), {} bytes",
                self.removed_count(),
                self.bytes_reclaimed(size)
            )
        } else {
            format!(
                "{verb} {} file(s), {} failed, {} bytes",
                self.removed_count(),
                self.failures.len(),
                self.bytes_reclaimed(size)
            )
        }
    }
}

/// Apply the prefix policy to one duplicate set.
///
/// The safety check always sees the complete selection before any path is
/// touched. A failing removal is recorded and the remaining candidates are
/// still processed.
pub fn purge<R: Remover + ?Sized>(
    set: &DuplicateSet,
    prefix: &str,
    mode: PurgeMode,
    remover: &mut R,
) -> PurgeOutcome {
    let mut outcome = PurgeOutcome {
        mode,
        ..PurgeOutcome::default()
    };

    let candidates = select_candidates(&set.paths, prefix);
    if candidates.is_empty() {
        return outcome;
    }

    if let Err(refusal) = check_preserves_copy(&candidates, set.len()) {
        log::warn!("{refusal}:");
        for path in &refusal.matched {
            log::warn!("\t{}", path.display());
        }
        outcome.refusal = Some(refusal);
        return outcome;
    }

    for path in candidates {
        match mode {
            PurgeMode::ReportOnly => {
                log::debug!("Would remove {}", path.display());
                outcome.removed.push(path.clone());
            }
            PurgeMode::Execute => match remover.remove(path) {
                Ok(()) => outcome.removed.push(path.clone()),
                Err(e) => {
                    log::warn!("Failed to delete {}: {}", path.display(), e);
                    outcome.failures.push(e);
                }
            },
        }
    }

    log::debug!("{}", outcome.summary(set.size));
    outcome
}
