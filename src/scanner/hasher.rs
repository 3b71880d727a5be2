//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] streams a file's complete content through BLAKE3 with a fixed
//! read buffer, so memory use does not depend on file size. The file handle
//! lives only for the duration of one [`Hasher::full_hash`] call.

use std::fs::File;
use std::path::Path;

use super::HashError;

/// A 256-bit BLAKE3 content digest.
pub type Hash = [u8; 32];

/// Streaming content hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher;

impl Hasher {
    /// Create a hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash the entire content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// part way through. No partial digest is ever returned.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut hasher = blake3::Hasher::new();
        hasher
            .update_reader(&mut file)
            .map_err(|e| HashError::from_io(path, e))?;

        log::trace!("Hashed {}", path.display());
        Ok(*hasher.finalize().as_bytes())
    }
}

/// Render a digest as lowercase hex.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}
