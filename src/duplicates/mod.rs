//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Content confirmation of `(name, size)` groups by BLAKE3 digest
//! - Duplicate set management
//! - The end-to-end pipeline ([`DuplicateFinder`])

pub mod finder;
pub mod groups;

pub use finder::{
    confirm_group, group_by_content, validate_roots, Confirmation, ContentGrouping,
    DuplicateFinder, FinderConfig, FinderError,
};
pub use groups::{DigestGroup, DigestGroups, DuplicateSet};
