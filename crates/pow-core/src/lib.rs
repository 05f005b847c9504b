use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;

pub mod chain;
pub mod constants;
pub mod error;
pub mod pow;
pub mod txgen;

pub use error::{ChainError, Result};

/// Lowercase hex encoding of a SHA-256 digest (64 chars).
pub type Hash = String;

/// A block that has not been mined yet.
///
/// Only `transactions`, `previous_hash` and `nonce` feed the hash; `index` is
/// informational.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub transactions: Vec<String>,
    pub previous_hash: Hash,
    pub nonce: u64,
}

impl Block {
    pub fn new(index: u64, transactions: Vec<String>, previous_hash: impl Into<Hash>) -> Self {
        Self {
            index,
            transactions,
            previous_hash: previous_hash.into(),
            nonce: 0,
        }
    }

    /// Block 0, linked to the sentinel previous hash.
    pub fn genesis(transactions: Vec<String>) -> Self {
        Self::new(0, transactions, constants::GENESIS_PREVIOUS_HASH)
    }

    /// Transactions in order, then the previous hash, then the decimal nonce.
    /// No separators anywhere.
    pub fn hash_input(&self) -> String {
        let mut input = self.hash_prefix();
        input.push_str(&self.nonce.to_string());
        input
    }

    /// The nonce-independent part of [`Block::hash_input`].
    pub fn hash_prefix(&self) -> String {
        let len = self.transactions.iter().map(String::len).sum::<usize>() + self.previous_hash.len();
        let mut prefix = String::with_capacity(len + 20);
        for tx in &self.transactions {
            prefix.push_str(tx);
        }
        prefix.push_str(&self.previous_hash);
        prefix
    }

    pub fn hash(&self) -> Hash {
        sha256_hex(self.hash_input().as_bytes())
    }
}

/// A block together with the proof-of-work result that sealed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinedBlock {
    /// The block at its winning nonce.
    pub block: Block,
    pub hash: Hash,
    /// Local wall-clock time at which the search started.
    pub timestamp: DateTime<Local>,
    pub difficulty: usize,
    pub mining_time: Duration,
    /// Hash computations performed, winning attempt included.
    pub attempts: u64,
}

impl MinedBlock {
    pub fn index(&self) -> u64 {
        self.block.index
    }

    pub fn nonce(&self) -> u64 {
        self.block.nonce
    }

    pub fn previous_hash(&self) -> &str {
        &self.block.previous_hash
    }

    pub fn transactions(&self) -> &[String] {
        &self.block.transactions
    }

    pub fn tx_count(&self) -> usize {
        self.block.transactions.len()
    }

    /// Recomputes the hash from the block's current fields, so any edit made
    /// after mining shows up here.
    pub fn is_valid(&self, difficulty: usize) -> bool {
        pow::validate_block(self, difficulty)
    }
}

pub fn sha256_hex(data: &[u8]) -> Hash {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block {
            index: 1,
            transactions: vec!["a".to_string(), "b".to_string()],
            previous_hash: "c".to_string(),
            nonce: 42,
        }
    }

    #[test]
    fn empty_genesis_hash_example() {
        let block = Block::genesis(vec![]);
        assert_eq!(block.hash_input(), "00");
        assert_eq!(
            block.hash(),
            "f1534392279bddbf9d43dde8701cb5be14b82f76ec6607bf8d6ad557f60f304e"
        );
    }

    #[test]
    fn block_hash_example() {
        let block = sample_block();
        assert_eq!(block.hash_input(), "abc42");
        assert_eq!(
            block.hash(),
            "8216ac77f5c9ed66907b03f1d78b795e7cdd315cecd13df42cd7245d45e16b06"
        );
    }

    #[test]
    fn block_hash_consistency() {
        let block = sample_block();
        let hash1 = block.hash();
        let hash2 = block.hash();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), constants::HASH_HEX_SIZE);
        assert!(hash1.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn block_hash_changes_with_nonce() {
        let mut block = sample_block();
        let hash1 = block.hash();
        block.nonce += 1;
        let hash2 = block.hash();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn block_hash_depends_on_transaction_order() {
        let block = sample_block();
        let mut swapped = block.clone();
        swapped.transactions.reverse();
        assert_ne!(block.hash(), swapped.hash());
    }

    #[test]
    fn block_hash_ignores_index() {
        let block = sample_block();
        let mut moved = block.clone();
        moved.index = 99;
        assert_eq!(block.hash(), moved.hash());
    }

    #[test]
    fn block_new_example() {
        let block = Block::new(3, vec!["tx".to_string()], "abcd");
        assert_eq!(block.index, 3);
        assert_eq!(block.nonce, 0);
        assert_eq!(block.previous_hash, "abcd");
        assert_eq!(block.transactions, vec!["tx".to_string()]);
    }

    #[test]
    fn genesis_block_example() {
        let genesis = Block::genesis(vec!["t0".to_string()]);
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, constants::GENESIS_PREVIOUS_HASH);
        assert_eq!(genesis.nonce, 0);
    }

    #[test]
    fn hash_prefix_excludes_nonce() {
        let block = sample_block();
        assert_eq!(block.hash_prefix(), "abc");
    }

    #[test]
    fn block_serialization_example() {
        let block = sample_block();
        let json = serde_json::to_string(&block).unwrap();
        let expected_json = r#"{"index":1,"transactions":["a","b"],"previous_hash":"c","nonce":42}"#;
        assert_eq!(json, expected_json);
        let deserialized: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(block, deserialized);
    }
}
