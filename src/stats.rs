//! Run-wide statistics.
//!
//! [`RunStatistics`] is a plain value threaded through the pipeline. The
//! traversal totals are applied once, and each duplicate set is applied only
//! after the purge policy has finished with it, so the counters never show a
//! half-processed set.

use std::fmt::Write as _;

use bytesize::ByteSize;

use crate::actions::PurgeOutcome;
use crate::duplicates::Confirmation;
use crate::scanner::ScanTotals;

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Candidate files scanned
    pub files_scanned: u64,
    /// Bytes held by scanned files
    pub bytes_scanned: u64,
    /// Directories visited, roots included
    pub directories_visited: u64,
    /// Confirmed copies beyond the first of each set
    pub duplicate_copies: u64,
    /// Bytes held by those extra copies
    pub bytes_wasted: u64,
    /// Duplicate copies removed (or that would be removed)
    pub duplicates_removed: u64,
    /// Bytes reclaimed by those removals
    pub bytes_reclaimed: u64,
    /// Confirmed duplicate sets
    pub duplicate_sets: u64,
    /// Files that shared name and size with another file but not content
    pub content_mismatches: u64,
    /// Files dropped because they could not be hashed
    pub hash_failures: u64,
    /// Removals that failed
    pub removal_failures: u64,
    /// Sets left untouched because the prefix matched every copy
    pub refused_sets: u64,
    /// Entries skipped during traversal
    pub scan_errors: u64,
}

impl RunStatistics {
    /// Apply traversal counters.
    pub fn record_scan(&mut self, totals: &ScanTotals) {
        self.files_scanned += totals.files_scanned;
        self.bytes_scanned += totals.bytes_scanned;
        self.directories_visited += totals.directories_visited;
        self.scan_errors += totals.scan_errors;
    }

    /// Apply the result of hashing one signature group.
    pub fn record_confirmation(&mut self, confirmation: &Confirmation) {
        self.duplicate_sets += confirmation.sets.len() as u64;
        for set in &confirmation.sets {
            self.duplicate_copies += set.len() as u64 - 1;
            self.bytes_wasted += set.wasted_space();
        }
        self.content_mismatches += confirmation.mismatches.len() as u64;
        self.hash_failures += confirmation.failures.len() as u64;
    }

    /// Apply a fully resolved duplicate set.
    pub fn record_set(&mut self, outcome: &PurgeOutcome, size: u64) {
        self.duplicates_removed += outcome.removed_count() as u64;
        self.bytes_reclaimed += outcome.bytes_reclaimed(size);
        self.removal_failures += outcome.failures.len() as u64;
        if outcome.is_refused() {
            self.refused_sets += 1;
        }
    }

    /// Combine two aggregates.
    pub fn merge(&mut self, other: &Self) {
        self.files_scanned += other.files_scanned;
        self.bytes_scanned += other.bytes_scanned;
        self.directories_visited += other.directories_visited;
        self.duplicate_copies += other.duplicate_copies;
        self.bytes_wasted += other.bytes_wasted;
        self.duplicates_removed += other.duplicates_removed;
        self.bytes_reclaimed += other.bytes_reclaimed;
        self.duplicate_sets += other.duplicate_sets;
        self.content_mismatches += other.content_mismatches;
        self.hash_failures += other.hash_failures;
        self.removal_failures += other.removal_failures;
        self.refused_sets += other.refused_sets;
        self.scan_errors += other.scan_errors;
    }

    /// Render the final report.
    ///
    /// The diagnostic counters are only listed when non-zero.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Duplicate copies found:   {}", self.duplicate_copies);
        let _ = writeln!(
            out,
            "Bytes wasted:             {} ({})",
            self.bytes_wasted,
            ByteSize::b(self.bytes_wasted)
        );
        let _ = writeln!(
            out,
            "Duplicate copies removed: {}",
            self.duplicates_removed
        );
        let _ = writeln!(
            out,
            "Bytes reclaimed:          {} ({})",
            self.bytes_reclaimed,
            ByteSize::b(self.bytes_reclaimed)
        );
        let _ = writeln!(out, "Files scanned:            {}", self.files_scanned);
        let _ = writeln!(
            out,
            "Bytes scanned:            {} ({})",
            self.bytes_scanned,
            ByteSize::b(self.bytes_scanned)
        );
        let _ = write!(
            out,
            "Directories visited:      {}",
            self.directories_visited
        );

        for (label, value) in [
            ("Duplicate sets", self.duplicate_sets),
            ("Content mismatches", self.content_mismatches),
            ("Hash failures", self.hash_failures),
            ("Removal failures", self.removal_failures),
            ("Refused sets", self.refused_sets),
            ("Scan errors", self.scan_errors),
        ] {
            if value > 0 {
                let _ = write!(out, "\n{:<26}{}", format!("{label}:"), value);
            }
        }
        out
    }
}
