//! Round-robin authority rotation.

use crate::error::{LedgerError, Result};
use stele_core::Address;

/// The fixed, ordered validator set and the cursor selecting whose turn
/// it is to produce.
///
/// The cursor advances exactly once per locally produced block. Remote
/// blocks never move it: every node tracks its own expectation of the
/// rotation independently of what it observes from peers. The cursor is
/// not persisted and restarts at the first authority each run.
#[derive(Debug, Clone)]
pub struct AuthorityRegistry {
    authorities: Vec<Address>,
    cursor: usize,
}

impl AuthorityRegistry {
    /// Build a registry from the configured, network-wide ordered set.
    pub fn new(authorities: Vec<Address>) -> Result<Self> {
        if authorities.is_empty() {
            return Err(LedgerError::EmptyAuthoritySet);
        }
        Ok(Self {
            authorities,
            cursor: 0,
        })
    }

    /// The authority whose turn it is, advancing the cursor.
    ///
    /// Round-robin with wrap-around; no skipping, no weighting.
    pub fn next_authority(&mut self) -> Address {
        let authority = self.authorities[self.cursor];
        self.cursor = (self.cursor + 1) % self.authorities.len();
        authority
    }

    /// Membership test used when validating received blocks.
    pub fn is_authority(&self, address: &Address) -> bool {
        self.authorities.contains(address)
    }

    /// The ordered authority set.
    pub fn authorities(&self) -> &[Address] {
        &self.authorities
    }

    /// Size of the authority set.
    pub fn len(&self) -> usize {
        self.authorities.len()
    }

    /// Registries are never empty; this exists for clippy symmetry.
    pub fn is_empty(&self) -> bool {
        self.authorities.is_empty()
    }
}
