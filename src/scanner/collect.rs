//! Signature grouping over one or more roots.
//!
//! # Overview
//!
//! This is the cheap phase of duplicate detection. Every candidate file is
//! bucketed by its `(name, size)` signature; only buckets with two or more
//! members ever reach the content-hashing phase.
//!
//! Groups live in a [`BTreeMap`] so iteration order depends only on the
//! signatures, and paths inside a group keep walk order.
//!
//! # Example
//!
//! ```no_run
//! use dupepurge::scanner::{collect_signatures, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let roots = vec![PathBuf::from("/a"), PathBuf::from("/b")];
//! let collection = collect_signatures(&roots, &WalkerConfig::default());
//!
//! for group in collection.candidate_groups() {
//!     println!("{:?}: {} copies", group.signature.name, group.len());
//! }
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

use super::walker::{WalkItem, Walker};
use super::{FileCandidate, WalkerConfig};

/// The cheap identity approximation: file name plus size.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature {
    /// Final path component
    pub name: OsString,
    /// File size in bytes
    pub size: u64,
}

/// Paths sharing one [`Signature`], in walk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureGroup {
    /// Signature shared by every path in this group
    pub signature: Signature,
    /// Paths with this signature
    pub paths: Vec<PathBuf>,
}

impl SignatureGroup {
    /// Create an empty group for a signature.
    #[must_use]
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            paths: Vec::new(),
        }
    }

    /// Append a candidate to this group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if the candidate's signature differs.
    pub fn add(&mut self, candidate: FileCandidate) {
        debug_assert_eq!(
            candidate.signature(),
            self.signature,
            "Candidate {} does not match group signature",
            candidate.path.display()
        );
        self.paths.push(candidate.path);
    }

    /// Shared file size.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.signature.size
    }

    /// Number of paths in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether this group is worth hashing: two or more non-empty files.
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        self.signature.size > 0 && self.paths.len() > 1
    }
}

/// Counters produced by traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanTotals {
    /// Candidate files counted
    pub files_scanned: u64,
    /// Sum of candidate file sizes
    pub bytes_scanned: u64,
    /// Directories entered, roots included
    pub directories_visited: u64,
    /// Entries that could not be inspected
    pub scan_errors: u64,
}

/// Output of the traversal phase.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Signature groups, ordered by signature
    pub groups: BTreeMap<Signature, SignatureGroup>,
    /// Traversal counters
    pub totals: ScanTotals,
}

impl Collection {
    /// Record one walk item.
    pub fn insert(&mut self, item: WalkItem) {
        match item {
            WalkItem::Directory(_) => self.totals.directories_visited += 1,
            WalkItem::File(candidate) => {
                self.totals.files_scanned += 1;
                self.totals.bytes_scanned += candidate.size;
                let signature = candidate.signature();
                self.groups
                    .entry(signature.clone())
                    .or_insert_with(|| SignatureGroup::new(signature))
                    .add(candidate);
            }
        }
    }

    /// Groups with at least two members, in signature order.
    pub fn candidate_groups(&self) -> impl Iterator<Item = &SignatureGroup> {
        self.groups.values().filter(|g| g.needs_confirmation())
    }

    /// Consume the collection, keeping only groups that need hashing.
    #[must_use]
    pub fn into_candidate_groups(self) -> Vec<SignatureGroup> {
        self.groups
            .into_values()
            .filter(SignatureGroup::needs_confirmation)
            .collect()
    }
}

/// Walk every root in order and group candidates by signature.
///
/// Bad entries are logged by the walker, counted, and skipped.
#[must_use]
pub fn collect_signatures(roots: &[PathBuf], config: &WalkerConfig) -> Collection {
    let mut collection = Collection::default();

    for root in roots {
        log::debug!("Scanning {}", root.display());
        let walker = Walker::new(root, config.clone());
        for item in walker.walk() {
            match item {
                Ok(item) => collection.insert(item),
                Err(_) => collection.totals.scan_errors += 1,
            }
        }
    }

    log::info!(
        "Scanned {} files ({} bytes) in {} directories, {} of {} signature groups need hashing",
        collection.totals.files_scanned,
        collection.totals.bytes_scanned,
        collection.totals.directories_visited,
        collection.candidate_groups().count(),
        collection.groups.len()
    );

    collection
}
