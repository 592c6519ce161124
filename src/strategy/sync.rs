//! Synchronous processing strategy
//!
//! Single-threaded replay: `SyncReader` streams rows one at a time into a
//! [`Replay`], so memory stays proportional to the number of accounts, not
//! the length of the log.

use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, Replay, ReplayConfig};
use crate::types::ReplayError;
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// ```no_run
/// use rental_ledger::core::LedgerConfig;
/// use rental_ledger::strategy::{ProcessingStrategy, ReplayConfig, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let config = ReplayConfig::new("owner".into(), LedgerConfig::default());
/// let strategy = SyncProcessingStrategy::new(config);
/// strategy
///     .process(Path::new("calls.csv"), &mut std::io::stdout())
///     .expect("Replay failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    config: ReplayConfig,
}

impl SyncProcessingStrategy {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), ReplayError> {
        let reader = SyncReader::new(input_path)?;
        let mut replay = Replay::new(&self.config);

        for result in reader {
            match result {
                Ok(call) => replay.apply(call),
                Err(e) => replay.skip(&e),
            }
        }

        replay.finish(output)
    }
}
