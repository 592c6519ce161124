//! Asynchronous batch processing strategy
//!
//! ```text
//! AsyncReader (csv-async) ──batches──▶ mpsc ──▶ apply task (owns Replay)
//! ```
//!
//! Reading and applying overlap: the runtime keeps parsing the next batch
//! while the apply task works through the previous one. There is exactly
//! one writer, and batches arrive in file order, so the result is the same
//! as a synchronous replay.

use crate::io::async_reader::AsyncReader;
use crate::strategy::{ProcessingStrategy, Replay, ReplayConfig};
use crate::types::{LedgerCall, ReplayError};
use std::io::Write;
use std::path::Path;
use tokio::sync::mpsc;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, warn};

/// Batches parsed ahead of the apply task
const MAX_PENDING_BATCHES: usize = 4;

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of calls per batch
    pub batch_size: usize,
    /// Runtime worker threads
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig; zero values fall back to the defaults
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                worker_threads,
                default = default.worker_threads,
                "invalid worker_threads, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: ReplayConfig,
    batch: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: ReplayConfig, batch: BatchConfig) -> Self {
        Self { config, batch }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), ReplayError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.batch.worker_threads)
            .build()
            .map_err(|e| ReplayError::Runtime {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let replay = runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => ReplayError::FileNotFound {
                        path: input_path.display().to_string(),
                    },
                    _ => ReplayError::from(e),
                })?;
            let mut reader = AsyncReader::new(file.compat());

            let (sender, mut receiver) = mpsc::channel::<Vec<LedgerCall>>(MAX_PENDING_BATCHES);
            let config = self.config.clone();
            let applier = tokio::spawn(async move {
                let mut replay = Replay::new(&config);
                while let Some(batch) = receiver.recv().await {
                    debug!(calls = batch.len(), "applying batch");
                    for call in batch {
                        replay.apply(call);
                    }
                }
                replay
            });

            while let Some(batch) = reader.read_batch(self.batch.batch_size).await {
                if sender.send(batch).await.is_err() {
                    break;
                }
            }
            drop(sender);

            let mut replay = applier.await.map_err(|e| ReplayError::Runtime {
                message: format!("Apply task failed: {}", e),
            })?;
            replay.add_skipped(reader.skipped());

            Ok::<_, ReplayError>(replay)
        })?;

        replay.finish(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LedgerConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn strategy(batch: BatchConfig) -> AsyncProcessingStrategy {
        AsyncProcessingStrategy::new(
            ReplayConfig::new("owner".into(), LedgerConfig::default()),
            batch,
        )
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);

        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.worker_threads, num_cpus::get());
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let mut output = Vec::new();

        let result = strategy(BatchConfig::default()).process(Path::new("nonexistent.csv"), &mut output);

        assert!(matches!(result, Err(ReplayError::FileNotFound { .. })));
    }

    #[test]
    fn test_async_strategy_keeps_order_across_batches() {
        // Each step depends on the previous one, so any reordering shows up
        let file = create_temp_csv(
            "op,caller,account,amount,first_name,last_name,at\n\
             register,owner,alice,,John,Doe,0\n\
             register,owner,bob,,Jane,Roe,0\n\
             deposit,alice,alice,0.01,,,10\n\
             pickup,alice,alice,,,,100\n\
             deposit,bob,bob,0.002,,,110\n\
             dropoff,alice,alice,,,,400\n\
             paydues,alice,alice,,,,410\n\
             pickup,bob,bob,,,,500\n",
        );
        let mut output = Vec::new();

        strategy(BatchConfig::new(2, 2))
            .process(file.path(), &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,first_name,last_name,balance,due,can_rent,active,total_minutes\n\
             alice,John,Doe,0.007,0,true,false,5\n\
             bob,Jane,Roe,0.002,0,false,true,0\n"
        );
    }

    #[test]
    fn test_async_strategy_survives_malformed_batch() {
        let file = create_temp_csv(
            "op,caller,account,amount,first_name,last_name,at\n\
             register,owner,alice,,John,Doe,0\n\
             rent,alice,alice,,,,1\n\
             deposit,alice,alice,,,,2\n\
             deposit,alice,alice,0.25,,,3\n",
        );
        let mut output = Vec::new();

        strategy(BatchConfig::new(1, 1))
            .process(file.path(), &mut output)
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("alice,John,Doe,0.25,0,true,false,0"));
    }
}
