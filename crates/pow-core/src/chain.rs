use crate::{
    constants::GENESIS_PREVIOUS_HASH, pow, txgen::TransactionSource, Block, ChainError,
    MinedBlock, Result,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Receiver for mined blocks and end-of-run statistics.
/// This lives in `pow-core` so reporting crates can implement it without a
/// circular dependency.
pub trait BlockSink {
    fn record_block(&mut self, block: &MinedBlock) -> anyhow::Result<()>;
    fn record_summary(&mut self, summary: &ChainSummary) -> anyhow::Result<()>;
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl BlockSink for Discard {
    fn record_block(&mut self, _block: &MinedBlock) -> anyhow::Result<()> {
        Ok(())
    }

    fn record_summary(&mut self, _summary: &ChainSummary) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Statistics for a chain build.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSummary {
    pub blocks: u64,
    pub difficulty: usize,
    pub total_time: Duration,
    pub average_time: Duration,
    pub total_attempts: u64,
    /// Sink writes that failed. Logging is not on the integrity path, so these
    /// never stop a build.
    pub log_failures: u64,
}

/// Sequential, hash-linked chain of mined blocks.
///
/// Every block is validated before it is linked; a block that fails
/// validation is never appended and nothing is linked on top of it.
#[derive(Debug)]
pub struct Chain<S: BlockSink> {
    sink: S,
    difficulty: usize,
    blocks: Vec<MinedBlock>,
    log_failures: u64,
}

impl<S: BlockSink> Chain<S> {
    pub fn new(sink: S, difficulty: usize) -> Self {
        Self {
            sink,
            difficulty,
            blocks: Vec::new(),
            log_failures: 0,
        }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn blocks(&self) -> &[MinedBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn tip(&self) -> Option<&MinedBlock> {
        self.blocks.last()
    }

    /// Hash the next block must link to: the sentinel while the chain is empty.
    pub fn tip_hash(&self) -> &str {
        self.tip()
            .map_or(GENESIS_PREVIOUS_HASH, |block| block.hash.as_str())
    }

    /// Unmined skeleton for the next height, linked to the current tip.
    pub fn next_block(&self, transactions: Vec<String>) -> Block {
        Block::new(self.blocks.len() as u64, transactions, self.tip_hash())
    }

    pub fn mine_next(&mut self, transactions: Vec<String>) -> Result<&MinedBlock> {
        self.mine_next_observed(transactions, |_, _| {})
    }

    /// Mines, validates and links the next block, reporting every attempt to
    /// `on_attempt`.
    pub fn mine_next_observed<F>(
        &mut self,
        transactions: Vec<String>,
        on_attempt: F,
    ) -> Result<&MinedBlock>
    where
        F: FnMut(u64, &str),
    {
        let block = self.next_block(transactions);
        debug!(
            index = block.index,
            previous_hash = %block.previous_hash,
            txs = block.transactions.len(),
            "mining block"
        );
        let mined = pow::mine_block_observed(block, self.difficulty, on_attempt)?;
        self.append(mined)
    }

    /// Validates `block` against the chain difficulty and the current tip and
    /// links it. The block is handed to the sink after linking; a sink failure
    /// is counted and logged but does not undo the append.
    pub fn append(&mut self, block: MinedBlock) -> Result<&MinedBlock> {
        if !block.is_valid(self.difficulty) {
            return Err(ChainError::InvalidBlock {
                index: block.index(),
                difficulty: self.difficulty,
                hash: block.hash,
            });
        }
        if block.previous_hash() != self.tip_hash() {
            return Err(ChainError::BrokenLink {
                index: block.index(),
                expected: self.tip_hash().to_string(),
                found: block.previous_hash().to_string(),
            });
        }

        if let Err(err) = self.sink.record_block(&block) {
            self.log_failures += 1;
            warn!("failed to record block {}: {err:#}", block.index());
        }

        let position = self.blocks.len();
        self.blocks.push(block);
        Ok(&self.blocks[position])
    }

    /// Mines `count` more blocks with transactions drawn from `source`, then
    /// reports the summary to the sink.
    pub fn build<T>(&mut self, count: u64, source: &mut T) -> Result<ChainSummary>
    where
        T: TransactionSource + ?Sized,
    {
        for _ in 0..count {
            let transactions = source.transactions_for(self.blocks.len() as u64);
            self.mine_next(transactions)?;
        }
        Ok(self.finish())
    }

    pub fn verify(&self) -> Result<()> {
        verify_chain(&self.blocks, self.difficulty)
    }

    pub fn summary(&self) -> ChainSummary {
        let blocks = self.blocks.len() as u64;
        let total_time: Duration = self.blocks.iter().map(|b| b.mining_time).sum();
        let average_time = if blocks == 0 {
            Duration::ZERO
        } else {
            total_time.div_f64(blocks as f64)
        };
        ChainSummary {
            blocks,
            difficulty: self.difficulty,
            total_time,
            average_time,
            total_attempts: self.blocks.iter().map(|b| b.attempts).sum(),
            log_failures: self.log_failures,
        }
    }

    /// Computes the summary and hands it to the sink.
    pub fn finish(&mut self) -> ChainSummary {
        let mut summary = self.summary();
        if let Err(err) = self.sink.record_summary(&summary) {
            self.log_failures += 1;
            summary.log_failures = self.log_failures;
            warn!("failed to record chain summary: {err:#}");
        }
        info!(
            "Chain complete: {} blocks at difficulty {} in {:?}",
            summary.blocks, summary.difficulty, summary.total_time
        );
        summary
    }
}

/// Checks that every block is valid at `difficulty` and that block `i` links
/// to block `i - 1` (block 0 to the genesis sentinel).
pub fn verify_chain(blocks: &[MinedBlock], difficulty: usize) -> Result<()> {
    let mut expected: &str = GENESIS_PREVIOUS_HASH;
    for block in blocks {
        if block.previous_hash() != expected {
            return Err(ChainError::BrokenLink {
                index: block.index(),
                expected: expected.to_string(),
                found: block.previous_hash().to_string(),
            });
        }
        if !block.is_valid(difficulty) {
            return Err(ChainError::InvalidBlock {
                index: block.index(),
                difficulty,
                hash: block.hash.clone(),
            });
        }
        expected = block.hash.as_str();
    }
    Ok(())
}
