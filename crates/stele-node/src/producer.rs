//! Block production and validation paths.
//!
//! Both paths converge on [`LedgerState::apply_block`], so chain
//! extension has single-writer semantics regardless of whether a block
//! was produced here or received from a peer. Only local production
//! advances the rotation cursor: each node tracks its own expectation of
//! whose turn it is, with no coordination protocol. Two nodes can
//! therefore legitimately seal the same height before either hears the
//! other; the first block applied locally wins and the other is dropped.

use crate::context::NodeContext;
use std::time::{SystemTime, UNIX_EPOCH};
use stele_core::Block;
use tracing::{debug, error, info, warn};

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Seal all pending transactions into the next block.
///
/// An empty pool is a silent no-op and leaves the rotation cursor
/// untouched. Otherwise the block is attributed to the authority whose
/// turn it is, applied, and returned for broadcast.
pub fn produce(ctx: &mut NodeContext) -> Option<Block> {
    if ctx.pool.is_empty() {
        return None;
    }
    let (head_number, head_hash) = match ctx.ledger.head() {
        Some(head) => (head.number, head.hash),
        None => return None,
    };
    let miner = ctx.registry.next_authority();
    let transactions = ctx.pool.pending();
    let block = Block::seal(head_number + 1, head_hash, unix_now(), miner, transactions);
    match ctx.ledger.apply_block(block.clone()) {
        Ok(included) => {
            ctx.pool.remove_included(&included);
            info!(
                number = block.number,
                hash = %block.hash.short(),
                miner = %miner,
                transactions = included.len(),
                "block produced"
            );
            Some(block)
        }
        Err(err) => {
            // Cannot happen for a block built against our own head.
            error!(number = block.number, %err, "produced block failed to apply");
            None
        }
    }
}

/// Outcome of validating a peer's block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The block extended our chain
    Applied,
    /// We already hold this block; redelivery ignored
    AlreadyKnown,
    /// The block failed a linkage or authority check and was dropped
    Rejected,
}

/// Validate a gossiped block and apply it if it extends our chain.
///
/// Rejected blocks are dropped with a log line: no retry, no
/// parent-request, no notification back to the sender.
pub fn validate_and_apply(ctx: &mut NodeContext, block: Block) -> ValidationOutcome {
    if ctx.ledger.contains_block(&block.hash) {
        debug!(number = block.number, hash = %block.hash.short(), "block redelivered, ignoring");
        return ValidationOutcome::AlreadyKnown;
    }
    if !ctx.registry.is_authority(&block.miner) {
        warn!(
            number = block.number,
            miner = %block.miner,
            "rejecting block from unknown authority"
        );
        return ValidationOutcome::Rejected;
    }
    let number = block.number;
    let hash = block.hash;
    match ctx.ledger.apply_block(block) {
        Ok(included) => {
            ctx.pool.remove_included(&included);
            info!(
                number,
                hash = %hash.short(),
                transactions = included.len(),
                "peer block accepted"
            );
            ValidationOutcome::Applied
        }
        Err(err) => {
            warn!(number, %err, "rejecting peer block");
            ValidationOutcome::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stele_core::{Address, NodeConfig, Transaction};

    fn context(authority_count: usize) -> NodeContext {
        let authorities = (0..authority_count)
            .map(|i| Address::derive(format!("authority-{i}").as_bytes()))
            .collect();
        NodeContext::new(NodeConfig {
            authorities,
            block_interval_secs: 0,
            ..NodeConfig::default()
        })
        .unwrap()
    }

    fn pooled_tx(ctx: &mut NodeContext, tag: u8) -> Transaction {
        let tx = Transaction::new(
            Address::derive(b"sender"),
            Some(Address::derive(b"recipient")),
            tag as u128,
            21_000,
            1,
            Vec::new(),
            0,
        );
        ctx.pool.submit(tx.clone());
        tx
    }

    #[test]
    fn empty_pool_is_a_silent_no_op() {
        let mut ctx = context(2);
        let first_turn = ctx.registry.authorities()[0];
        assert!(produce(&mut ctx).is_none());
        assert_eq!(ctx.ledger.len(), 1);
        // Skipped production must not advance the rotation.
        assert_eq!(ctx.registry.next_authority(), first_turn);
    }

    #[test]
    fn production_rotates_miners_in_order() {
        let mut ctx = context(2);
        let expected: Vec<Address> = ctx.registry.authorities().to_vec();

        pooled_tx(&mut ctx, 1);
        let first = produce(&mut ctx).unwrap();
        pooled_tx(&mut ctx, 2);
        let second = produce(&mut ctx).unwrap();
        pooled_tx(&mut ctx, 3);
        let third = produce(&mut ctx).unwrap();

        assert_eq!(first.miner, expected[0]);
        assert_eq!(second.miner, expected[1]);
        assert_eq!(third.miner, expected[0]);
    }

    #[test]
    fn produced_transactions_leave_the_pool() {
        let mut ctx = context(1);
        let tx = pooled_tx(&mut ctx, 1);
        let block = produce(&mut ctx).unwrap();
        assert_eq!(block.transactions.len(), 1);
        assert!(ctx.pool.is_empty());
        assert!(ctx.ledger.transaction(&tx.hash).is_some());
    }

    #[test]
    fn peer_block_applies_without_moving_the_cursor() {
        let mut producer_ctx = context(2);
        let mut observer_ctx = context(2);

        pooled_tx(&mut producer_ctx, 1);
        let block = produce(&mut producer_ctx).unwrap();

        assert_eq!(
            validate_and_apply(&mut observer_ctx, block),
            ValidationOutcome::Applied
        );
        // The observer's own rotation still starts at the first authority.
        let first = observer_ctx.registry.authorities()[0];
        assert_eq!(observer_ctx.registry.next_authority(), first);
    }

    #[test]
    fn redelivered_block_is_ignored_idempotently() {
        let mut producer_ctx = context(1);
        let mut observer_ctx = context(1);

        let tx = pooled_tx(&mut producer_ctx, 1);
        let block = produce(&mut producer_ctx).unwrap();

        assert_eq!(
            validate_and_apply(&mut observer_ctx, block.clone()),
            ValidationOutcome::Applied
        );
        let nonce_after_first = observer_ctx
            .ledger
            .account(&tx.from)
            .unwrap()
            .nonce;
        assert_eq!(
            validate_and_apply(&mut observer_ctx, block),
            ValidationOutcome::AlreadyKnown
        );
        assert_eq!(observer_ctx.ledger.len(), 2);
        assert_eq!(
            observer_ctx.ledger.account(&tx.from).unwrap().nonce,
            nonce_after_first
        );
    }

    #[test]
    fn foreign_miner_is_rejected() {
        let mut ctx = context(1);
        let head = ctx.ledger.head().unwrap().clone();
        let block = Block::seal(
            head.number + 1,
            head.hash,
            head.timestamp + 1,
            Address::derive(b"intruder"),
            vec![Transaction::new(
                Address::derive(b"a"),
                None,
                0,
                0,
                0,
                Vec::new(),
                0,
            )],
        );
        assert_eq!(
            validate_and_apply(&mut ctx, block),
            ValidationOutcome::Rejected
        );
        assert_eq!(ctx.ledger.len(), 1);
    }

    #[test]
    fn unlinked_peer_block_is_rejected() {
        let mut ctx = context(1);
        let authority = ctx.registry.authorities()[0];
        let block = Block::seal(5, stele_core::BlockHash::new([7; 32]), 1, authority, vec![]);
        assert_eq!(
            validate_and_apply(&mut ctx, block),
            ValidationOutcome::Rejected
        );
        assert_eq!(ctx.ledger.len(), 1);
    }
}
