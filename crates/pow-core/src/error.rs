use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChainError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("difficulty {difficulty} exceeds the {max} hex characters of a block hash")]
    DifficultyOutOfRange { difficulty: usize, max: usize },

    #[error("nonce space exhausted while mining block {index}")]
    NonceSpaceExhausted { index: u64 },

    #[error("block {index} failed validation at difficulty {difficulty} (hash {hash})")]
    InvalidBlock {
        index: u64,
        difficulty: usize,
        hash: String,
    },

    #[error("block {index} links to {found}, expected {expected}")]
    BrokenLink {
        index: u64,
        expected: String,
        found: String,
    },
}
