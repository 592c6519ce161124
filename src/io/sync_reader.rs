//! Synchronous CSV reader with iterator interface
//!
//! Streams ledger calls out of a CSV file one row at a time, delegating
//! format concerns to the csv_format module.
//!
//! ```no_run
//! use rental_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("calls.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(call) => println!("{} on {}", call.operation, call.account),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `new()`
//! - Row errors are yielded as Err variants with the line number attached

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerCall, ReplayError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SyncReader {
    /// Open a call log for streaming
    ///
    /// Fields are trimmed and rows may omit trailing optional columns.
    pub fn new(path: &Path) -> Result<Self, ReplayError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReplayError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ReplayError::from(e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<LedgerCall, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;

        // +1 for the header row
        let line = self.line_num + 1;
        Some(match row {
            Ok(csv_record) => {
                convert_csv_record(csv_record).map_err(|e| format!("Line {}: {}", line, e))
            }
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}
