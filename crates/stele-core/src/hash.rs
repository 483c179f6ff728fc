//! SHA-256 content addressing.
//!
//! Hashing here is pure and synchronous. Block and transaction identities,
//! derived authority addresses, and contract addresses all funnel through
//! this module so the algorithm is declared in exactly one place.
//!
//! Current algorithm: **SHA-256** (256-bit / 32-byte output).

use sha2::{Digest, Sha256};

/// Hash arbitrary bytes to a 32-byte digest.
pub fn hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Incremental hasher for multi-part content.
///
/// Used when an identity is derived from several fields: callers feed a
/// domain tag first, then each field in declaration order.
#[derive(Debug, Default)]
pub struct Hasher(Sha256);

impl Hasher {
    /// Create an empty hasher.
    pub fn new() -> Self {
        Self(Sha256::new())
    }

    /// Update the hasher with more data.
    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    /// Finalize and return the 32-byte digest.
    pub fn finalize(self) -> [u8; 32] {
        let mut output = [0u8; 32];
        output.copy_from_slice(&self.0.finalize());
        output
    }
}
