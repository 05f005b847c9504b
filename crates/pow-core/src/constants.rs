pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const GENESIS_PREVIOUS_HASH: &str = "0";
pub const DEFAULT_DIFFICULTY: usize = 1;
pub const DEFAULT_BLOCK_COUNT: u64 = 10;
pub const DEFAULT_LOG_FILE: &str = "mining_log.txt";
pub const MIN_TXS_PER_BLOCK: usize = 1;
pub const MAX_TXS_PER_BLOCK: usize = 10;
