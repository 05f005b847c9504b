use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pow_core::{
    chain::Chain,
    constants::{DEFAULT_BLOCK_COUNT, DEFAULT_DIFFICULTY, DEFAULT_LOG_FILE},
    txgen::{RandomTransactions, TransactionSource},
    ChainError,
};
use pow_log::{FileLog, LogFormat};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pow-chain")]
#[command(about = "Mine a hash-linked chain of proof-of-work blocks and log the statistics")]
struct Cli {
    /// Leading zero hex characters required in every block hash
    #[arg(long, short, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: usize,

    /// Number of blocks to mine, genesis included
    #[arg(long, short, default_value_t = DEFAULT_BLOCK_COUNT, value_parser = clap::value_parser!(u64).range(1..))]
    blocks: u64,

    /// Mining log path; truncated at startup
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Mining log format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Seed for the transaction generator (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Print every nonce attempt
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for LogFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => LogFormat::Text,
            Format::Json => LogFormat::Json,
        }
    }
}

fn block_title(index: u64) -> String {
    if index == 0 {
        "Genesis Block".to_string()
    } else {
        format!("Block {index}")
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(?cli, "starting chain build");

    println!("Creating mining log...");
    let log = FileLog::create(&cli.log_file, cli.format.into())?;
    println!("Mining log created: {}", log.path().display());

    let mut source = match cli.seed {
        Some(seed) => RandomTransactions::seeded(seed),
        None => RandomTransactions::from_entropy(),
    };
    let mut chain = Chain::new(log, cli.difficulty);
    let verbose = cli.verbose;

    for index in 0..cli.blocks {
        let title = block_title(index);
        let transactions = source.transactions_for(index);

        println!("\n=== Mining {title} ===");
        println!("Previous hash: {}", chain.tip_hash());
        println!("Transactions: [{}]", transactions.join(", "));

        let mined = match chain.mine_next_observed(transactions, |nonce, hash| {
            if verbose {
                println!("Nonce: {nonce}, Hash: {hash}");
            }
        }) {
            Ok(block) => block,
            Err(err @ ChainError::InvalidBlock { .. }) => {
                println!("{title} is invalid!");
                return Err(err).context("chain build stopped");
            }
            Err(err) => return Err(err.into()),
        };

        println!("{title} mined!");
        println!("Hash: {}", mined.hash);
        println!("Nonce: {}", mined.nonce());
        println!(
            "Time spent mining: {:.2} seconds",
            mined.mining_time.as_secs_f64()
        );
        println!("{title} is valid!");
    }

    let summary = chain.finish();
    println!("\n=== MINING COMPLETE ===");
    println!("Total blocks mined: {}", summary.blocks);
    println!("Total time: {:.2} seconds", summary.total_time.as_secs_f64());
    println!(
        "Average time per block: {:.2} seconds",
        summary.average_time.as_secs_f64()
    );
    println!("Difficulty: {}", summary.difficulty);
    println!("Total hash attempts: {}", summary.total_attempts);

    if summary.log_failures > 0 {
        println!(
            "\n{} mining log writes failed (set RUST_LOG=warn for details)",
            summary.log_failures
        );
    } else {
        println!("\nStatistics saved to {}", chain.sink().path().display());
    }
    Ok(())
}
