//! Pending transaction pool.

use std::collections::HashSet;
use stele_core::{Transaction, TxHash};
use tracing::debug;

/// Transactions submitted locally or received from peers, not yet
/// included in a block.
///
/// Insertion order is preserved because it is the application order when
/// a block is produced. Entries leave the pool only through
/// [`TxPool::remove_included`], driven by the ledger's block-application
/// side effect, so a transaction is never simultaneously "pending" and
/// "included".
#[derive(Debug, Default)]
pub struct TxPool {
    pending: Vec<Transaction>,
    known: HashSet<TxHash>,
}

impl TxPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a transaction unless its hash is already pending.
    ///
    /// Returns whether the entry is new, so callers can skip
    /// re-broadcasting duplicates.
    pub fn submit(&mut self, tx: Transaction) -> bool {
        if !self.known.insert(tx.hash) {
            return false;
        }
        debug!(hash = %tx.hash.short(), from = %tx.from, "transaction pooled");
        self.pending.push(tx);
        true
    }

    /// Snapshot all pending transactions in insertion order.
    ///
    /// Does not remove them; removal happens only when a block containing
    /// them is applied.
    pub fn pending(&self) -> Vec<Transaction> {
        self.pending.clone()
    }

    /// Drop the given hashes from the pool.
    pub fn remove_included(&mut self, hashes: &[TxHash]) {
        if hashes.is_empty() {
            return;
        }
        let included: HashSet<&TxHash> = hashes.iter().collect();
        self.pending.retain(|tx| !included.contains(&tx.hash));
        for hash in hashes {
            self.known.remove(hash);
        }
    }

    /// Look up a pending transaction.
    pub fn get(&self, hash: &TxHash) -> Option<&Transaction> {
        self.pending.iter().find(|tx| tx.hash == *hash)
    }

    /// Whether a hash is pending.
    pub fn contains(&self, hash: &TxHash) -> bool {
        self.known.contains(hash)
    }

    /// Number of pending transactions.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the pool holds nothing, in which case production skips.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stele_core::Address;

    fn tx(tag: u8) -> Transaction {
        Transaction::new(
            Address::derive(b"sender"),
            Some(Address::derive(b"recipient")),
            tag as u128,
            21_000,
            1,
            Vec::new(),
            0,
        )
    }

    #[test]
    fn duplicate_submission_keeps_one_entry() {
        let mut pool = TxPool::new();
        let t = tx(1);
        assert!(pool.submit(t.clone()));
        assert!(!pool.submit(t));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn pending_preserves_insertion_order() {
        let mut pool = TxPool::new();
        let first = tx(1);
        let second = tx(2);
        pool.submit(first.clone());
        pool.submit(second.clone());
        let snapshot = pool.pending();
        assert_eq!(snapshot, vec![first, second]);
        // Snapshot does not drain.
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn remove_included_purges_and_allows_lookup_miss() {
        let mut pool = TxPool::new();
        let keep = tx(1);
        let gone = tx(2);
        pool.submit(keep.clone());
        pool.submit(gone.clone());

        pool.remove_included(&[gone.hash]);
        assert_eq!(pool.len(), 1);
        assert!(pool.contains(&keep.hash));
        assert!(!pool.contains(&gone.hash));
        assert!(pool.get(&gone.hash).is_none());
    }
}
