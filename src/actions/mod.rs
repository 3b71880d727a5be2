//! File actions module.
//!
//! This module provides the deletion side of the pipeline:
//! - Prefix selection of removable copies
//! - The keep-at-least-one-copy safety check
//! - Removal through a pluggable [`Remover`] (unlink or system trash)
//!
//! ```no_run
//! use dupepurge::actions::{select_candidates, check_preserves_copy};
//! use std::path::PathBuf;
//!
//! let paths = vec![PathBuf::from("/keep/a"), PathBuf::from("/dup/a")];
//! let selected = select_candidates(&paths, "/dup");
//! assert!(check_preserves_copy(&selected, paths.len()).is_ok());
//! ```

pub mod purge;

// Re-export commonly used types
pub use purge::{
    check_preserves_copy, delete_to_trash, permanent_delete, purge, select_candidates,
    DeleteError, PermanentRemover, PurgeMode, PurgeOutcome, Remover, SafetyRefusal,
    TrashRemover,
};
