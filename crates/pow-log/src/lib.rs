//! Append-only mining log for chains built with `pow-core`.
pub mod file_log;

pub use file_log::{FileLog, LogFormat};

use chrono::{DateTime, Local};
use pow_core::{chain::ChainSummary, MinedBlock};

pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const RULE_WIDTH: usize = 100;

pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Title, column names and a rule.
pub fn text_header(created_at: &DateTime<Local>) -> String {
    format!(
        "=== MINING LOG - {} ===\nTimestamp | Block | Difficulty | Nonce | Time (s) | Hash | Transactions\n{}\n",
        format_timestamp(created_at),
        rule()
    )
}

/// One line per block, columns as in [`text_header`] followed by the
/// transaction list.
pub fn text_block_line(block: &MinedBlock) -> String {
    format!(
        "{} | {} | {} | {} | {:.2} | {} | {} | [{}]\n",
        format_timestamp(&block.timestamp),
        block.index(),
        block.difficulty,
        block.nonce(),
        block.mining_time.as_secs_f64(),
        block.hash,
        block.tx_count(),
        block.transactions().join(", ")
    )
}

pub fn text_footer(summary: &ChainSummary, finished_at: &DateTime<Local>) -> String {
    format!(
        "\n{rule}\nFINAL STATISTICS:\n\
         Total blocks mined: {}\n\
         Total mining time: {:.2} seconds\n\
         Average time per block: {:.2} seconds\n\
         Difficulty: {}\n\
         Total hash attempts: {}\n\
         Finished at: {}\n{rule}\n",
        summary.blocks,
        summary.total_time.as_secs_f64(),
        summary.average_time.as_secs_f64(),
        summary.difficulty,
        summary.total_attempts,
        format_timestamp(finished_at),
        rule = rule()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pow_core::Block;
    use std::time::Duration;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn sample_block() -> MinedBlock {
        MinedBlock {
            block: Block {
                index: 4,
                transactions: vec!["aa".to_string(), "bb".to_string()],
                previous_hash: "0".to_string(),
                nonce: 17,
            },
            hash: "0abc".to_string(),
            timestamp: fixed_time(),
            difficulty: 1,
            mining_time: Duration::from_millis(1250),
            attempts: 18,
        }
    }

    #[test]
    fn timestamp_format_example() {
        assert_eq!(format_timestamp(&fixed_time()), "02/01/2024 03:04:05");
    }

    #[test]
    fn header_example() {
        let header = text_header(&fixed_time());
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=== MINING LOG - 02/01/2024 03:04:05 ===");
        assert!(lines[1].starts_with("Timestamp | Block | Difficulty"));
        assert_eq!(lines[2], "=".repeat(RULE_WIDTH));
    }

    #[test]
    fn block_line_example() {
        assert_eq!(
            text_block_line(&sample_block()),
            "02/01/2024 03:04:05 | 4 | 1 | 17 | 1.25 | 0abc | 2 | [aa, bb]\n"
        );
    }

    #[test]
    fn footer_example() {
        let summary = ChainSummary {
            blocks: 4,
            difficulty: 2,
            total_time: Duration::from_secs(10),
            average_time: Duration::from_millis(2500),
            total_attempts: 1000,
            log_failures: 0,
        };
        let footer = text_footer(&summary, &fixed_time());
        assert!(footer.contains("FINAL STATISTICS:"));
        assert!(footer.contains("Total blocks mined: 4\n"));
        assert!(footer.contains("Total mining time: 10.00 seconds\n"));
        assert!(footer.contains("Average time per block: 2.50 seconds\n"));
        assert!(footer.contains("Difficulty: 2\n"));
        assert!(footer.contains("Total hash attempts: 1000\n"));
        assert!(footer.ends_with(&format!("Finished at: 02/01/2024 03:04:05\n{}\n", rule())));
    }
}
