//! Asynchronous CSV reader with batch interface
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerCalls
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```
//!
//! Malformed rows are logged and counted, never returned.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerCall;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: usize,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 0,
            skipped: 0,
        }
    }

    /// Number of malformed rows skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Read up to `batch_size` rows
    ///
    /// Returns `None` once the input is exhausted. A batch may be empty if
    /// every row in it was malformed.
    pub async fn read_batch(&mut self, batch_size: usize) -> Option<Vec<LedgerCall>> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = 0;
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while rows < batch_size {
            let Some(row) = records.next().await else {
                break;
            };
            rows += 1;
            self.line_num += 1;

            // +1 for the header row
            let line = self.line_num + 1;
            match row.map_err(|e| format!("CSV parse error: {}", e)).and_then(convert_csv_record) {
                Ok(call) => batch.push(call),
                Err(error) => {
                    warn!(line, %error, "skipping malformed row");
                    self.skipped += 1;
                }
            }
        }

        (rows > 0).then_some(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Operation;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    const HEADER: &str = "op,caller,account,amount,first_name,last_name,at\n";

    fn reader(rows: &str) -> AsyncReader<Cursor<Vec<u8>>> {
        AsyncReader::new(Cursor::new(format!("{}{}", HEADER, rows).into_bytes()))
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let mut reader = reader(
            "register,owner,alice,,John,Doe,1\n\
             deposit,alice,alice,0.01,,,2\n\
             pickup,alice,alice,,,,3\n",
        );

        let batch = reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].operation, Operation::Register);
        assert_eq!(batch[1].amount, Some(Decimal::new(1, 2)));

        let batch = reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].at, Some(3));

        assert!(reader.read_batch(2).await.is_none());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut reader = reader("");

        assert!(reader.read_batch(10).await.is_none());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_rows() {
        let mut reader = reader(
            "rent,alice,alice,,,,1\n\
             deposit,alice,alice,lots,,,2\n\
             deposit,alice,alice,0.5,,,3\n",
        );

        let batch = reader.read_batch(10).await.unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].at, Some(3));
        assert_eq!(reader.skipped(), 2);
    }

    #[tokio::test]
    async fn test_async_reader_all_malformed_batch_is_not_eof() {
        let mut reader = reader(
            "rent,alice,alice,,,,1\n\
             pickup,alice,alice,,,,2\n",
        );

        let first = reader.read_batch(1).await.unwrap();
        assert!(first.is_empty());

        let second = reader.read_batch(1).await.unwrap();
        assert_eq!(second[0].operation, Operation::PickUp);
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_handling() {
        let mut reader = reader("  deposit , alice , alice , 0.5 ,,, 9 \n");

        let batch = reader.read_batch(10).await.unwrap();

        assert_eq!(batch[0].account.as_str(), "alice");
        assert_eq!(batch[0].at, Some(9));
    }
}
