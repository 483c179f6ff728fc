//! Chain, account, and contract state.

use crate::error::{LedgerError, Result};
use std::collections::{HashMap, HashSet};
use stele_core::{
    contract_address, Account, Address, Block, BlockHash, ContractRecord, Receipt, Transaction,
    TransactionView, TxHash,
};
use tracing::debug;

/// Where an included transaction lives.
#[derive(Debug, Clone, Copy)]
struct TxLocation {
    block_number: u64,
    index: u64,
}

/// The append-only chain and every index derived from it.
///
/// Owned by exactly one event loop; no interior mutability, no locks.
/// [`LedgerState::apply_block`] is the only mutator, so every invariant
/// (height contiguity, parent linkage, single inclusion per transaction,
/// monotonic nonces) is enforced in one place.
#[derive(Debug, Default)]
pub struct LedgerState {
    blocks: Vec<Block>,
    blocks_by_hash: HashMap<BlockHash, u64>,
    transactions: HashMap<TxHash, TxLocation>,
    accounts: HashMap<Address, Account>,
    contracts: HashMap<Address, ContractRecord>,
}

impl LedgerState {
    /// Create an empty ledger. The first applied block must be genesis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block and apply its transactions.
    ///
    /// Succeeds iff the block extends the chain: its number equals the
    /// next position, its parent hash matches the head (genesis excepted),
    /// and none of its transactions were included before. On success the
    /// included hashes are returned so the caller can purge its pool; on
    /// failure nothing is mutated. A block whose hash is already in the
    /// chain is reported as [`LedgerError::KnownBlock`] so redelivery can
    /// be treated as a no-op.
    ///
    /// Value transfer debits the sender saturating at zero: with no
    /// signature or sufficiency checks anywhere in the system, block
    /// application must never fail on account state.
    pub fn apply_block(&mut self, block: Block) -> Result<Vec<TxHash>> {
        if self.blocks_by_hash.contains_key(&block.hash) {
            return Err(LedgerError::KnownBlock { hash: block.hash });
        }
        let expected = self.blocks.len() as u64;
        if block.number != expected {
            return Err(LedgerError::HeightMismatch {
                number: block.number,
                height: expected,
            });
        }
        if let Some(head) = self.blocks.last() {
            if block.parent_hash != head.hash {
                return Err(LedgerError::ParentMismatch {
                    number: block.number,
                });
            }
        }
        // Reject before mutating: transaction application itself cannot
        // fail, so this pre-pass keeps rejection free of side effects.
        let mut seen = HashSet::new();
        for tx in &block.transactions {
            if self.transactions.contains_key(&tx.hash) || !seen.insert(tx.hash) {
                return Err(LedgerError::DuplicateTransaction { hash: tx.hash });
            }
        }

        let mut included = Vec::with_capacity(block.transactions.len());
        for (index, tx) in block.transactions.iter().enumerate() {
            self.apply_transaction(tx);
            self.transactions.insert(
                tx.hash,
                TxLocation {
                    block_number: block.number,
                    index: index as u64,
                },
            );
            included.push(tx.hash);
        }
        debug!(
            number = block.number,
            hash = %block.hash.short(),
            transactions = included.len(),
            "block applied"
        );
        self.blocks_by_hash.insert(block.hash, block.number);
        self.blocks.push(block);
        Ok(included)
    }

    fn apply_transaction(&mut self, tx: &Transaction) {
        let recipient = tx
            .to
            .unwrap_or_else(|| contract_address(&tx.hash, tx.nonce));
        if tx.value > 0 {
            let sender = self.accounts.entry(tx.from).or_default();
            sender.balance = sender.balance.saturating_sub(tx.value);
            let credit = self.accounts.entry(recipient).or_default();
            credit.balance = credit.balance.saturating_add(tx.value);
        }
        self.accounts.entry(tx.from).or_default().nonce += 1;
        if tx.creates_contract() {
            self.contracts
                .insert(recipient, ContractRecord::new(tx.input.clone(), tx.from));
        }
    }

    /// The newest block, if any.
    pub fn head(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Number of blocks in the chain.
    pub fn len(&self) -> u64 {
        self.blocks.len() as u64
    }

    /// Whether the chain holds no blocks yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block at a position.
    pub fn block_by_number(&self, number: u64) -> Option<&Block> {
        self.blocks.get(number as usize)
    }

    /// Block with a given hash.
    pub fn block_by_hash(&self, hash: &BlockHash) -> Option<&Block> {
        self.blocks_by_hash
            .get(hash)
            .and_then(|number| self.blocks.get(*number as usize))
    }

    /// Whether a block hash is already in the chain.
    pub fn contains_block(&self, hash: &BlockHash) -> bool {
        self.blocks_by_hash.contains_key(hash)
    }

    /// Included transaction with its inclusion metadata.
    pub fn transaction(&self, hash: &TxHash) -> Option<TransactionView> {
        let location = self.transactions.get(hash)?;
        let block = self.blocks.get(location.block_number as usize)?;
        let tx = block.transactions.get(location.index as usize)?;
        Some(TransactionView::included(
            tx.clone(),
            block.number,
            block.hash,
            location.index,
        ))
    }

    /// Receipt of an included transaction.
    pub fn receipt(&self, hash: &TxHash) -> Option<Receipt> {
        let location = self.transactions.get(hash)?;
        let block = self.blocks.get(location.block_number as usize)?;
        let tx = block.transactions.get(location.index as usize)?;
        let contract = tx
            .creates_contract()
            .then(|| contract_address(&tx.hash, tx.nonce));
        Some(Receipt {
            transaction_hash: tx.hash,
            transaction_index: location.index,
            block_number: block.number,
            block_hash: block.hash,
            from: tx.from,
            to: tx.to,
            contract_address: contract,
            gas_used: tx.gas,
            status: 1,
        })
    }

    /// Account state, if the address has ever been touched.
    pub fn account(&self, address: &Address) -> Option<Account> {
        self.accounts.get(address).copied()
    }

    /// Contract record, if the address holds one.
    pub fn contract(&self, address: &Address) -> Option<&ContractRecord> {
        self.contracts.get(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority() -> Address {
        Address::derive(b"authority-0")
    }

    fn genesis() -> Block {
        Block::genesis(authority(), 1_700_000_000)
    }

    fn transfer(from: &[u8], to: &[u8], value: u128, nonce: u64) -> Transaction {
        Transaction::new(
            Address::derive(from),
            Some(Address::derive(to)),
            value,
            21_000,
            1,
            Vec::new(),
            nonce,
        )
    }

    fn extend(ledger: &LedgerState, transactions: Vec<Transaction>) -> Block {
        let head = ledger.head().unwrap();
        Block::seal(
            head.number + 1,
            head.hash,
            head.timestamp + 5,
            authority(),
            transactions,
        )
    }

    #[test]
    fn genesis_then_child_extends_chain() {
        let mut ledger = LedgerState::new();
        ledger.apply_block(genesis()).unwrap();
        assert_eq!(ledger.head().unwrap().number, 0);

        let block = extend(&ledger, vec![transfer(b"a", b"b", 0, 0)]);
        ledger.apply_block(block).unwrap();
        assert_eq!(ledger.head().unwrap().number, 1);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn height_gap_is_rejected_without_mutation() {
        let mut ledger = LedgerState::new();
        ledger.apply_block(genesis()).unwrap();
        let head_hash = ledger.head().unwrap().hash;

        let skipping = Block::seal(5, head_hash, 10, authority(), Vec::new());
        let err = ledger.apply_block(skipping).unwrap_err();
        assert_eq!(
            err,
            LedgerError::HeightMismatch {
                number: 5,
                height: 1
            }
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn parent_mismatch_is_rejected() {
        let mut ledger = LedgerState::new();
        ledger.apply_block(genesis()).unwrap();

        let unlinked = Block::seal(1, BlockHash::new([9; 32]), 10, authority(), Vec::new());
        assert_eq!(
            ledger.apply_block(unlinked).unwrap_err(),
            LedgerError::ParentMismatch { number: 1 }
        );
    }

    #[test]
    fn known_block_is_reported_distinctly() {
        let mut ledger = LedgerState::new();
        ledger.apply_block(genesis()).unwrap();
        assert_eq!(
            ledger.apply_block(genesis()).unwrap_err(),
            LedgerError::KnownBlock {
                hash: genesis().hash
            }
        );
    }

    #[test]
    fn value_moves_and_accounts_materialize() {
        let mut ledger = LedgerState::new();
        ledger.apply_block(genesis()).unwrap();

        // Fund a, then spend from it.
        let fund = transfer(b"faucet", b"a", 100, 0);
        let block = extend(&ledger, vec![fund]);
        ledger.apply_block(block).unwrap();
        assert_eq!(ledger.account(&Address::derive(b"a")).unwrap().balance, 100);

        let spend = transfer(b"a", b"b", 30, 0);
        let block = extend(&ledger, vec![spend]);
        ledger.apply_block(block).unwrap();
        assert_eq!(ledger.account(&Address::derive(b"a")).unwrap().balance, 70);
        assert_eq!(ledger.account(&Address::derive(b"b")).unwrap().balance, 30);
    }

    #[test]
    fn debit_saturates_at_zero() {
        let mut ledger = LedgerState::new();
        ledger.apply_block(genesis()).unwrap();
        let block = extend(&ledger, vec![transfer(b"poor", b"b", 50, 0)]);
        ledger.apply_block(block).unwrap();
        assert_eq!(
            ledger.account(&Address::derive(b"poor")).unwrap().balance,
            0
        );
        assert_eq!(ledger.account(&Address::derive(b"b")).unwrap().balance, 50);
    }

    #[test]
    fn sender_nonce_increments_per_transaction() {
        let mut ledger = LedgerState::new();
        ledger.apply_block(genesis()).unwrap();
        let block = extend(
            &ledger,
            vec![transfer(b"a", b"b", 0, 0), transfer(b"a", b"c", 0, 1)],
        );
        ledger.apply_block(block).unwrap();
        assert_eq!(ledger.account(&Address::derive(b"a")).unwrap().nonce, 2);
    }

    #[test]
    fn contract_creation_stores_bytecode() {
        let mut ledger = LedgerState::new();
        ledger.apply_block(genesis()).unwrap();

        let create = Transaction::new(
            Address::derive(b"deployer"),
            None,
            0,
            100_000,
            1,
            vec![0x60, 0x60, 0x60],
            0,
        );
        let expected = contract_address(&create.hash, create.nonce);
        let block = extend(&ledger, vec![create]);
        ledger.apply_block(block).unwrap();

        let record = ledger.contract(&expected).unwrap();
        assert_eq!(record.bytecode, vec![0x60, 0x60, 0x60]);
        assert_eq!(record.creator, Address::derive(b"deployer"));
    }

    #[test]
    fn included_transaction_is_queryable_with_location() {
        let mut ledger = LedgerState::new();
        ledger.apply_block(genesis()).unwrap();
        let tx = transfer(b"a", b"b", 1, 0);
        let hash = tx.hash;
        let block = extend(&ledger, vec![tx]);
        let block_hash = block.hash;
        ledger.apply_block(block).unwrap();

        let view = ledger.transaction(&hash).unwrap();
        assert_eq!(view.block_number, Some(1));
        assert_eq!(view.block_hash, Some(block_hash));
        assert_eq!(view.transaction_index, Some(0));

        let receipt = ledger.receipt(&hash).unwrap();
        assert_eq!(receipt.status, 1);
        assert_eq!(receipt.block_number, 1);
    }

    #[test]
    fn reincluded_transaction_is_rejected_without_mutation() {
        let mut ledger = LedgerState::new();
        ledger.apply_block(genesis()).unwrap();
        let tx = transfer(b"a", b"b", 10, 0);
        let block = extend(&ledger, vec![tx.clone()]);
        ledger.apply_block(block).unwrap();
        let balance = ledger.account(&Address::derive(b"b")).unwrap().balance;

        let again = extend(&ledger, vec![tx.clone()]);
        assert_eq!(
            ledger.apply_block(again).unwrap_err(),
            LedgerError::DuplicateTransaction { hash: tx.hash }
        );
        assert_eq!(
            ledger.account(&Address::derive(b"b")).unwrap().balance,
            balance
        );
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn lookups_return_none_for_unknown_keys() {
        let ledger = LedgerState::new();
        assert!(ledger.block_by_number(0).is_none());
        assert!(ledger.block_by_hash(&BlockHash::new([1; 32])).is_none());
        assert!(ledger.transaction(&TxHash::new([1; 32])).is_none());
        assert!(ledger.receipt(&TxHash::new([1; 32])).is_none());
        assert!(ledger.account(&Address::derive(b"nobody")).is_none());
        assert!(ledger.contract(&Address::derive(b"nothing")).is_none());
    }
}
