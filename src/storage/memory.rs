//! In-process sink

use crate::model::ItemRecord;
use crate::storage::traits::{RecordSink, SinkResult};

/// Keeps every accepted record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<ItemRecord>,
    accept_calls: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records accepted so far, in delivery order
    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    /// Number of times `accept` was called
    pub fn accept_calls(&self) -> usize {
        self.accept_calls
    }

    pub fn into_records(self) -> Vec<ItemRecord> {
        self.records
    }
}

impl RecordSink for MemorySink {
    fn accept(&mut self, records: &[ItemRecord]) -> SinkResult<()> {
        self.accept_calls += 1;
        self.records.extend_from_slice(records);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
