//! Content-digest grouping and confirmed duplicate sets.
//!
//! # Overview
//!
//! After the cheap `(name, size)` phase, every surviving group is hashed and
//! split by digest. A digest shared by two or more paths becomes a
//! [`DuplicateSet`]; a digest held by a single path is a content mismatch,
//! meaning two files agreed on name and size but not on bytes.
//!
//! # Example
//!
//! ```
//! use dupepurge::duplicates::{DigestGroups, DuplicateSet};
//! use std::path::PathBuf;
//!
//! let mut digests = DigestGroups::default();
//! digests.push([1; 32], PathBuf::from("/a/x"));
//! digests.push([2; 32], PathBuf::from("/b/x"));
//! digests.push([1; 32], PathBuf::from("/c/x"));
//!
//! assert_eq!(digests.len(), 2);
//! let sets: Vec<DuplicateSet> = digests.into_sets(16).0;
//! assert_eq!(sets.len(), 1);
//! assert_eq!(sets[0].paths, vec![PathBuf::from("/a/x"), PathBuf::from("/c/x")]);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::Hash;

/// Paths that produced one digest, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestGroup {
    /// BLAKE3 digest of the content
    pub hash: Hash,
    /// Paths with this digest
    pub paths: Vec<PathBuf>,
}

/// Order-preserving mapping from digest to paths.
///
/// Digests appear in the order they were first seen, so results do not
/// depend on hash-map iteration order.
#[derive(Debug, Clone, Default)]
pub struct DigestGroups {
    groups: Vec<DigestGroup>,
    index: HashMap<Hash, usize>,
}

impl DigestGroups {
    /// Record `path` under `hash`.
    pub fn push(&mut self, hash: Hash, path: PathBuf) {
        match self.index.get(&hash) {
            Some(&i) => self.groups[i].paths.push(path),
            None => {
                self.index.insert(hash, self.groups.len());
                self.groups.push(DigestGroup {
                    hash,
                    paths: vec![path],
                });
            }
        }
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no digest has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over digest groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &DigestGroup> {
        self.groups.iter()
    }

    /// Split into confirmed sets and single-path mismatches.
    ///
    /// `size` is the shared size of the signature group that was hashed.
    #[must_use]
    pub fn into_sets(self, size: u64) -> (Vec<DuplicateSet>, Vec<PathBuf>) {
        let mut sets = Vec::new();
        let mut mismatches = Vec::new();
        for group in self.groups {
            if group.paths.len() < 2 {
                mismatches.extend(group.paths);
            } else {
                sets.push(DuplicateSet {
                    hash: group.hash,
                    size,
                    paths: group.paths,
                });
            }
        }
        (sets, mismatches)
    }
}

/// Paths proven byte-identical by digest.
///
/// Always holds at least two paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSet {
    /// BLAKE3 hash of the shared content
    pub hash: Hash,
    /// File size in bytes, shared by every path
    pub size: u64,
    /// Paths in discovery order
    pub paths: Vec<PathBuf>,
}

impl DuplicateSet {
    /// Create a duplicate set.
    ///
    /// Returns `None` when fewer than two paths are given, since a lone
    /// path is not a duplicate of anything.
    #[must_use]
    pub fn new(hash: Hash, size: u64, paths: Vec<PathBuf>) -> Option<Self> {
        if paths.len() < 2 {
            return None;
        }
        Some(Self { hash, size, paths })
    }

    /// Number of copies in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Space held by every copy but one.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * (self.paths.len() as u64 - 1)
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        crate::scanner::hash_to_hex(&self.hash)
    }
}
