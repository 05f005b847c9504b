use crate::{constants::HASH_HEX_SIZE, Block, ChainError, MinedBlock, Result};
use chrono::Local;
use sha2::{Digest, Sha256};
use std::time::Instant;
use tracing::{info, trace};

/// Number of consecutive `'0'` characters at the start of a hex hash.
pub fn leading_zero_chars(hash: &str) -> usize {
    hash.bytes().take_while(|b| *b == b'0').count()
}

/// True iff the first `difficulty` characters of `hash` exist and are all `'0'`.
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    leading_zero_chars(hash) >= difficulty
}

/// Mines the block by incrementing the nonce, starting from its current value,
/// until the block hash has at least `difficulty` leading zero hex characters.
pub fn mine_block(block: Block, difficulty: usize) -> Result<MinedBlock> {
    mine_block_observed(block, difficulty, |_, _| {})
}

/// Same as [`mine_block`], calling `on_attempt(nonce, hash)` for every attempt,
/// the winning one included.
pub fn mine_block_observed<F>(mut block: Block, difficulty: usize, mut on_attempt: F) -> Result<MinedBlock>
where
    F: FnMut(u64, &str),
{
    if difficulty > HASH_HEX_SIZE {
        return Err(ChainError::DifficultyOutOfRange {
            difficulty,
            max: HASH_HEX_SIZE,
        });
    }

    let timestamp = Local::now();
    let start = Instant::now();

    // Transactions and previous hash are fixed for the whole search; only the
    // nonce suffix is hashed per attempt.
    let mut base = Sha256::new();
    base.update(block.hash_prefix().as_bytes());

    let mut attempts = 0u64;
    loop {
        let mut hasher = base.clone();
        hasher.update(block.nonce.to_string().as_bytes());
        let hash = hex::encode(hasher.finalize());
        attempts = attempts.saturating_add(1);
        on_attempt(block.nonce, &hash);

        if meets_difficulty(&hash, difficulty) {
            let mining_time = start.elapsed();
            info!(
                "Mined block {} with nonce {} and hash {} ({} attempts, {:?})",
                block.index, block.nonce, hash, attempts, mining_time
            );
            return Ok(MinedBlock {
                block,
                hash,
                timestamp,
                difficulty,
                mining_time,
                attempts,
            });
        }

        trace!(nonce = block.nonce, %hash, "attempt rejected");
        block.nonce = block
            .nonce
            .checked_add(1)
            .ok_or(ChainError::NonceSpaceExhausted { index: block.index })?;
    }
}

/// A block is valid at `difficulty` when its stored hash has the required zero
/// prefix and recomputing the hash from its current fields reproduces it.
pub fn validate_block(block: &MinedBlock, difficulty: usize) -> bool {
    meets_difficulty(&block.hash, difficulty) && block.block.hash() == block.hash
}
