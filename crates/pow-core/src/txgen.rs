//! Synthetic transaction identifiers for demo chains.

use crate::{
    constants::{MAX_TXS_PER_BLOCK, MIN_TXS_PER_BLOCK},
    sha256_hex,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Supplies the ordered transaction identifiers for each block of a chain.
pub trait TransactionSource {
    fn transactions_for(&mut self, index: u64) -> Vec<String>;
}

impl<F> TransactionSource for F
where
    F: FnMut(u64) -> Vec<String>,
{
    fn transactions_for(&mut self, index: u64) -> Vec<String> {
        self(index)
    }
}

/// Identifier of a transaction: the SHA-256 hex digest of its description.
pub fn transaction_id(description: &str) -> String {
    sha256_hex(description.as_bytes())
}

/// Random transfers, contract calls, stakes, rewards and fees, hashed into
/// opaque identifiers.
#[derive(Debug, Clone)]
pub struct RandomTransactions<R: Rng> {
    rng: R,
}

impl RandomTransactions<StdRng> {
    /// Reproducible stream: the same seed always yields the same transactions.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomTransactions<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Human-readable description of the `i`th transaction of block `index`.
    pub fn describe(&mut self, index: u64, i: usize) -> String {
        let rng = &mut self.rng;
        match rng.gen_range(0..5) {
            0 => format!("Transfer_{index}_{i}_Amount_{:.2}", rng.gen::<f64>() * 1000.0),
            1 => format!("Contract_{index}_{i}_Gas_{}", rng.gen_range(0..100_000u32)),
            2 => format!("Stake_{index}_{i}_Value_{:.2}", rng.gen::<f64>() * 500.0),
            3 => format!("Reward_{index}_{i}_Mining_{:.2}", rng.gen::<f64>() * 50.0),
            _ => format!("Fee_{index}_{i}_Network_{:.4}", rng.gen::<f64>() * 10.0),
        }
    }
}

impl<R: Rng> TransactionSource for RandomTransactions<R> {
    fn transactions_for(&mut self, index: u64) -> Vec<String> {
        let count = self.rng.gen_range(MIN_TXS_PER_BLOCK..=MAX_TXS_PER_BLOCK);
        (0..count)
            .map(|i| transaction_id(&self.describe(index, i)))
            .collect()
    }
}
