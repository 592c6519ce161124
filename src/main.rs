//! Rental Ledger CLI
//!
//! Replays a log of ledger calls and prints the final account table.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --owner 0xf39F... calls.csv > accounts.csv
//! cargo run -- --strategy sync --owner 0xf39F... calls.csv > accounts.csv
//! cargo run -- --owner 0xf39F... --rate 0.002 --interval-secs 60 calls.csv
//! cargo run -- --owner 0xf39F... --batch-size 2000 --workers 8 --verbose calls.csv
//! ```
//!
//! Logs go to stderr and honour `RUST_LOG`; without it only rejected calls
//! and malformed rows are shown (`--verbose` adds committed events).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use rental_ledger::cli;
use rental_ledger::strategy;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let args = cli::parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_level()));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let strategy = {
        let batch = matches!(args.strategy, cli::StrategyType::Async).then(|| args.to_batch_config());
        strategy::create_strategy(args.strategy.clone(), args.to_replay_config(), batch)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
