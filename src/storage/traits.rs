//! Sink trait and error types
//!
//! This module defines the interface every record destination implements
//! and the errors a destination can raise.

use crate::model::ItemRecord;
use thiserror::Error;

/// Errors that can occur while delivering records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for the records of a finished run
///
/// The pipeline calls `accept` exactly once, after every stage succeeded,
/// with the records in harvest order.
pub trait RecordSink {
    /// Persists or forwards the records of one run
    fn accept(&mut self, records: &[ItemRecord]) -> SinkResult<()>;

    /// Short label used in logs
    fn describe(&self) -> String;
}

/// Fans the records out to every sink in order, stopping at the first error
impl RecordSink for Vec<Box<dyn RecordSink>> {
    fn accept(&mut self, records: &[ItemRecord]) -> SinkResult<()> {
        for sink in self.iter_mut() {
            sink.accept(records)?;
            tracing::info!("Wrote {} records to {}", records.len(), sink.describe());
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let labels: Vec<String> = self.iter().map(|sink| sink.describe()).collect();
        labels.join(", ")
    }
}
