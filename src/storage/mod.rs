//! Storage module for delivering harvested records
//!
//! This module handles every destination a run can write to:
//! - SQLite database with run tracking
//! - Pretty-printed JSON file
//! - In-memory collection for embedding and tests

mod json;
mod memory;
mod schema;
mod sqlite;
mod traits;

pub use json::JsonSink;
pub use memory::MemorySink;
pub use sqlite::SqliteSink;
pub use traits::{RecordSink, SinkError, SinkResult};

use crate::config::OutputConfig;
use std::path::Path;

/// Opens every sink named in the output configuration
///
/// The database sink comes first when both are configured.
///
/// # Arguments
///
/// * `output` - The output section of the configuration
/// * `config_hash` - Hash recorded with each database run
///
/// # Returns
///
/// * `Ok(Vec<Box<dyn RecordSink>>)` - Sinks ready to accept records
/// * `Err(SinkError)` - The database could not be opened
pub fn open_sinks(output: &OutputConfig, config_hash: &str) -> SinkResult<Vec<Box<dyn RecordSink>>> {
    let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();

    if let Some(path) = &output.database_path {
        sinks.push(Box::new(SqliteSink::new(Path::new(path), config_hash)?));
    }
    if let Some(path) = &output.json_path {
        sinks.push(Box::new(JsonSink::new(Path::new(path))));
    }

    Ok(sinks)
}

/// Represents a stored crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: String,
    pub config_hash: String,
    pub record_count: i64,
}

impl RunRecord {
    /// Wall-clock duration of the run in seconds, if both timestamps parse
    pub fn duration_seconds(&self) -> Option<u64> {
        let started = self.started_at.parse::<chrono::DateTime<chrono::Utc>>().ok()?;
        let finished = self.finished_at.parse::<chrono::DateTime<chrono::Utc>>().ok()?;
        Some((finished - started).num_seconds().max(0) as u64)
    }
}
