//! Duplicate finder implementation with two-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the pipeline:
//! 1. **Signature phase**: walk the roots and bucket files by `(name, size)`
//!    (see [`crate::scanner::collect`])
//! 2. **Digest phase**: hash every file of each multi-member bucket and
//!    split the bucket by digest
//! 3. **Purge**: hand each confirmed set to the prefix policy
//!    (see [`crate::actions::purge`])
//!
//! A file whose signature is unique is never opened.
//!
//! # Example
//!
//! ```no_run
//! use dupepurge::duplicates::group_by_content;
//! use dupepurge::scanner::Hasher;
//! use std::path::PathBuf;
//!
//! let paths = vec![PathBuf::from("test/c"), PathBuf::from("test/d")];
//! let grouping = group_by_content(&paths, &Hasher::new());
//! for group in grouping.digests.iter() {
//!     println!("{} -> {} path(s)", dupepurge::scanner::hash_to_hex(&group.hash), group.paths.len());
//! }
//! ```

use std::io::Write;
use std::path::PathBuf;

use rayon::prelude::*;

use super::groups::{DigestGroups, DuplicateSet};
use crate::actions::{purge, DeleteError, PurgeMode, PurgeOutcome, Remover};
use crate::scanner::{
    collect_signatures, hash_to_hex, Hash, HashError, Hasher, SignatureGroup, WalkerConfig,
};
use crate::stats::RunStatistics;

/// Result of hashing a list of paths.
#[derive(Debug, Default)]
pub struct ContentGrouping {
    /// Digest to paths, in first-seen order
    pub digests: DigestGroups,
    /// Files that could not be hashed
    pub failures: Vec<HashError>,
}

/// Result of confirming one signature group.
#[derive(Debug, Default)]
pub struct Confirmation {
    /// Confirmed duplicate sets
    pub sets: Vec<DuplicateSet>,
    /// Paths whose digest matched no other path in the group
    pub mismatches: Vec<PathBuf>,
    /// Files dropped because hashing failed
    pub failures: Vec<HashError>,
}

/// Bucket hash results by digest, keeping input order.
fn bucket(results: Vec<(PathBuf, Result<Hash, HashError>)>) -> ContentGrouping {
    let mut grouping = ContentGrouping::default();
    for (path, result) in results {
        match result {
            Ok(hash) => grouping.digests.push(hash, path),
            Err(e) => {
                log::warn!("Failed to hash {}: {}", path.display(), e);
                grouping.failures.push(e);
            }
        }
    }
    grouping
}

/// Hash each path and group the paths by digest.
///
/// Files that fail to open or read are dropped and reported in
/// [`ContentGrouping::failures`]; the rest are still grouped.
#[must_use]
pub fn group_by_content(paths: &[PathBuf], hasher: &Hasher) -> ContentGrouping {
    bucket(
        paths
            .iter()
            .map(|p| (p.clone(), hasher.full_hash(p)))
            .collect(),
    )
}

/// Split a content grouping into sets and mismatches.
///
/// A lone digest only counts as a mismatch when at least two files of the
/// group were hashed; otherwise there was nothing to compare it with.
fn confirm_grouping(grouping: ContentGrouping, size: u64) -> Confirmation {
    let hashed: usize = grouping.digests.iter().map(|g| g.paths.len()).sum();
    let (sets, mut mismatches) = grouping.digests.into_sets(size);
    if hashed < 2 {
        for path in mismatches.drain(..) {
            log::debug!("No readable partner left for {}", path.display());
        }
    }
    for path in &mismatches {
        log::warn!(
            "Same name and size but different content: {}",
            path.display()
        );
    }
    for set in &sets {
        log::debug!(
            "Duplicate set {}: {} files, {} bytes each",
            set.hash_hex(),
            set.len(),
            set.size
        );
    }
    Confirmation {
        sets,
        mismatches,
        failures: grouping.failures,
    }
}

/// Hash a signature group sequentially and split it by digest.
///
/// Groups that do not need confirmation (fewer than two members, or empty
/// files) are returned as an empty confirmation without touching the disk.
#[must_use]
pub fn confirm_group(group: &SignatureGroup, hasher: &Hasher) -> Confirmation {
    if !group.needs_confirmation() {
        return Confirmation::default();
    }
    confirm_grouping(group_by_content(&group.paths, hasher), group.size())
}

// ============================================================================
// DuplicateFinder - Pipeline Orchestrator
// ============================================================================

/// Configuration for the duplicate finder.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Walker configuration (suffix exclusion)
    pub walker: WalkerConfig,
    /// Only paths starting with this text may be removed; empty disables removal
    pub delete_prefix: String,
    /// Report-only or execute
    pub mode: PurgeMode,
    /// Print every duplicate path and every announced removal
    pub list_duplicates: bool,
    /// Abort the run once a set records a removal failure
    pub strict_delete: bool,
    /// Hashing threads per signature group (1 = sequential)
    pub io_threads: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker: WalkerConfig::default(),
            delete_prefix: String::new(),
            mode: PurgeMode::ReportOnly,
            list_duplicates: false,
            strict_delete: false,
            io_threads: 1,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker = config;
        self
    }

    /// Set the delete prefix.
    #[must_use]
    pub fn with_delete_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.delete_prefix = prefix.into();
        self
    }

    /// Set the purge mode.
    #[must_use]
    pub fn with_mode(mut self, mode: PurgeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable the duplicate listing.
    #[must_use]
    pub fn with_list_duplicates(mut self, enabled: bool) -> Self {
        self.list_duplicates = enabled;
        self
    }

    /// Enable or disable strict removal.
    #[must_use]
    pub fn with_strict_delete(mut self, strict: bool) -> Self {
        self.strict_delete = strict;
        self
    }

    /// Set the number of hashing threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A removal failed while strict deletion was enabled.
    #[error("Deletion failed in strict mode: {0}")]
    DeletionFailed(#[source] DeleteError),

    /// Writing the duplicate listing failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// The hashing thread pool could not be created.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl FinderError {
    /// Whether this error means a root was unusable.
    #[must_use]
    pub fn is_invalid_root(&self) -> bool {
        matches!(self, Self::PathNotFound(_) | Self::NotADirectory(_))
    }
}

/// Check that every root exists and is a directory.
///
/// # Errors
///
/// Returns the first root that is missing or not a directory.
pub fn validate_roots(roots: &[PathBuf]) -> Result<(), FinderError> {
    for root in roots {
        if !root.exists() {
            return Err(FinderError::PathNotFound(root.clone()));
        }
        if !root.is_dir() {
            return Err(FinderError::NotADirectory(root.clone()));
        }
    }
    Ok(())
}

/// Duplicate finder that runs the whole pipeline.
///
/// # Example
///
/// ```no_run
/// use dupepurge::actions::{PermanentRemover, PurgeMode};
/// use dupepurge::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::PathBuf;
///
/// let config = FinderConfig::default()
///     .with_delete_prefix("/backup")
///     .with_mode(PurgeMode::Execute);
/// let finder = DuplicateFinder::new(config).unwrap();
///
/// let roots = vec![PathBuf::from("/home"), PathBuf::from("/backup")];
/// let stats = finder
///     .run(&roots, &mut PermanentRemover, &mut std::io::stdout())
///     .unwrap();
/// println!("{}", stats.report());
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
    pool: Option<rayon::ThreadPool>,
}

impl DuplicateFinder {
    /// Create a new duplicate finder.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::ThreadPool`] if `io_threads > 1` and the pool
    /// cannot be built.
    pub fn new(config: FinderConfig) -> Result<Self, FinderError> {
        let pool = if config.io_threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.io_threads)
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self {
            config,
            hasher: Hasher::new(),
            pool,
        })
    }

    /// Create a sequential report-only finder.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: FinderConfig::default(),
            hasher: Hasher::new(),
            pool: None,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Hash one signature group and split it by digest.
    ///
    /// With a thread pool the files of the group are hashed in parallel;
    /// results are collected in path order, so grouping matches the
    /// sequential result exactly.
    #[must_use]
    pub fn confirm(&self, group: &SignatureGroup) -> Confirmation {
        if !group.needs_confirmation() {
            return Confirmation::default();
        }
        let grouping = match &self.pool {
            Some(pool) => {
                let results = pool.install(|| {
                    group
                        .paths
                        .par_iter()
                        .map(|p| (p.clone(), self.hasher.full_hash(p)))
                        .collect()
                });
                bucket(results)
            }
            None => group_by_content(&group.paths, &self.hasher),
        };
        confirm_grouping(grouping, group.size())
    }

    /// Run the pipeline and return the final statistics.
    ///
    /// # Errors
    ///
    /// See [`DuplicateFinder::run_into`].
    pub fn run<R, W>(
        &self,
        roots: &[PathBuf],
        remover: &mut R,
        out: &mut W,
    ) -> Result<RunStatistics, FinderError>
    where
        R: Remover + ?Sized,
        W: Write + ?Sized,
    {
        let mut stats = RunStatistics::default();
        self.run_into(roots, remover, out, &mut stats)?;
        Ok(stats)
    }

    /// Run the pipeline, accumulating into `stats`.
    ///
    /// `stats` holds everything recorded up to the point of failure, so a
    /// caller can still report after an error.
    ///
    /// # Errors
    ///
    /// - `PathNotFound` / `NotADirectory` for a bad root, before scanning
    /// - `DeletionFailed` when strict deletion is on and a removal fails
    /// - `Output` when the listing cannot be written
    pub fn run_into<R, W>(
        &self,
        roots: &[PathBuf],
        remover: &mut R,
        out: &mut W,
        stats: &mut RunStatistics,
    ) -> Result<(), FinderError>
    where
        R: Remover + ?Sized,
        W: Write + ?Sized,
    {
        validate_roots(roots)?;

        let collection = collect_signatures(roots, &self.config.walker);
        stats.record_scan(&collection.totals);

        for group in collection.into_candidate_groups() {
            let mut group_stats = RunStatistics::default();
            let result = self.resolve_group(&group, remover, out, &mut group_stats);
            stats.merge(&group_stats);
            result?;
        }

        log::info!(
            "Done: {} duplicate sets, {} copies {}",
            stats.duplicate_sets,
            stats.duplicates_removed,
            match self.config.mode {
                PurgeMode::Execute => "removed",
                PurgeMode::ReportOnly => "would be removed",
            }
        );
        Ok(())
    }

    /// Confirm one signature group and resolve each of its sets.
    fn resolve_group<R, W>(
        &self,
        group: &SignatureGroup,
        remover: &mut R,
        out: &mut W,
        stats: &mut RunStatistics,
    ) -> Result<(), FinderError>
    where
        R: Remover + ?Sized,
        W: Write + ?Sized,
    {
        let confirmation = self.confirm(group);
        stats.record_confirmation(&confirmation);

        for set in &confirmation.sets {
            let outcome = self.resolve_set(set, remover, out)?;
            stats.record_set(&outcome, set.size);

            if self.config.strict_delete {
                if let Some(failure) = outcome.failures.into_iter().next() {
                    log::error!("Stopping: removal failed with strict deletion enabled");
                    return Err(FinderError::DeletionFailed(failure));
                }
            }
        }
        Ok(())
    }

    /// List one set, apply the purge policy, and announce the result.
    fn resolve_set<R, W>(
        &self,
        set: &DuplicateSet,
        remover: &mut R,
        out: &mut W,
    ) -> Result<PurgeOutcome, FinderError>
    where
        R: Remover + ?Sized,
        W: Write + ?Sized,
    {
        if self.config.list_duplicates {
            writeln!(
                out,
                "{} bytes, {}:",
                set.size,
                &hash_to_hex(&set.hash)[..16]
            )?;
            for (i, path) in set.paths.iter().enumerate() {
                writeln!(out, " duplicate {}: {}", i, path.display())?;
            }
        }

        let outcome = purge(set, &self.config.delete_prefix, self.config.mode, remover);

        if self.config.list_duplicates || self.config.mode == PurgeMode::ReportOnly {
            let verb = match self.config.mode {
                PurgeMode::ReportOnly => "would remove",
                PurgeMode::Execute => "removed",
            };
            for path in &outcome.removed {
                writeln!(out, " {}: {}", verb, path.display())?;
            }
        }
        Ok(outcome)
    }
}
