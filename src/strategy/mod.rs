//! Processing strategy module for call replay
//!
//! A strategy is a complete replay pipeline: read the call log, execute
//! every call against a fresh ledger in file order, and write the final
//! account table. Implementations (synchronous, asynchronous batch) are
//! selected at runtime.

use crate::cli::StrategyType;
use crate::core::LedgerConfig;
use crate::types::{AccountId, ReplayError};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod replay;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use replay::Replay;
pub use sync::SyncProcessingStrategy;

/// Ledger setup for a replay run
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Administrator identity of the replayed ledger
    pub owner: AccountId,
    pub ledger: LedgerConfig,
}

impl ReplayConfig {
    pub fn new(owner: AccountId, ledger: LedgerConfig) -> Self {
        Self { owner, ledger }
    }
}

/// Processing strategy trait for complete replay pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Replay the calls in `input_path` and write the resulting accounts
    ///
    /// # Errors
    ///
    /// Only fatal problems are returned: the input cannot be opened, the
    /// runtime fails, or output cannot be written. Malformed rows and
    /// rejected calls are logged and skipped.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), ReplayError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: ReplayConfig,
    batch: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(config)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config, batch.unwrap_or_default())),
    }
}
