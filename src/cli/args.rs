use crate::core::LedgerConfig;
use crate::strategy::{BatchConfig, ReplayConfig};
use crate::types::AccountId;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Replay a rental ledger call log and print the resulting accounts
#[derive(Parser, Debug)]
#[command(name = "rental-ledger")]
#[command(about = "Replay a car-rental ledger call log and print account states", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing ledger calls
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Identity allowed to register renters and manage holds
    #[arg(long = "owner", value_name = "ID")]
    pub owner: String,

    /// Minimum balance required to pick up a car
    #[arg(long = "min-deposit", value_name = "AMOUNT")]
    pub min_deposit: Option<Decimal>,

    /// Charge per started billing interval
    #[arg(long = "rate", value_name = "AMOUNT")]
    pub rate: Option<Decimal>,

    /// Billing interval length in seconds
    #[arg(long = "interval-secs", value_name = "SECS")]
    pub interval_secs: Option<u64>,

    /// Number of calls per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of calls per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Runtime worker threads (async mode only)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Runtime worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Log committed events as well as rejected calls
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Build the ledger configuration, defaulting any value not given
    pub fn to_ledger_config(&self) -> LedgerConfig {
        let default = LedgerConfig::default();
        LedgerConfig::new(
            self.min_deposit.unwrap_or(default.min_deposit),
            self.rate.unwrap_or(default.rate_per_interval),
            self.interval_secs.unwrap_or(default.interval_secs),
        )
    }

    pub fn to_replay_config(&self) -> ReplayConfig {
        ReplayConfig::new(AccountId::new(self.owner.clone()), self.to_ledger_config())
    }

    /// Create a BatchConfig from CLI arguments
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.workers.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.workers.unwrap_or(default.worker_threads),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
