//! SQLite record sink
//!
//! Each accepted batch becomes one `runs` row plus one `items` row per
//! record, written inside a single transaction.

use crate::model::ItemRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordSink, SinkError, SinkResult};
use crate::storage::RunRecord;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// SQLite sink backend
pub struct SqliteSink {
    conn: Connection,
    path: Option<PathBuf>,
    config_hash: String,
    started_at: DateTime<Utc>,
}

impl SqliteSink {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `config_hash` - Hash of the configuration recorded with each run
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Successfully opened/created database
    /// * `Err(SinkError)` - Failed to open database
    pub fn new(path: &Path, config_hash: &str) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            config_hash: config_hash.to_string(),
            started_at: Utc::now(),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory(config_hash: &str) -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            path: None,
            config_hash: config_hash.to_string(),
            started_at: Utc::now(),
        })
    }

    /// Total number of stored records across all runs
    pub fn count_records(&self) -> SinkResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// The most recently stored run, if any
    pub fn latest_run(&self) -> SinkResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, record_count
                 FROM runs ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok(RunRecord {
                        id: row.get(0)?,
                        started_at: row.get(1)?,
                        finished_at: row.get(2)?,
                        config_hash: row.get(3)?,
                        record_count: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(run)
    }

    /// Loads the records of one run in harvest order
    pub fn load_records(&self, run_id: i64) -> SinkResult<Vec<ItemRecord>> {
        let exists: Option<i64> = self
            .conn
            .query_row("SELECT id FROM runs WHERE id = ?1", params![run_id], |row| {
                row.get(0)
            })
            .optional()?;
        if exists.is_none() {
            return Err(SinkError::RunNotFound(run_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT title, price, description, upc, availability, picture_url, source_url, category
             FROM items WHERE run_id = ?1 ORDER BY position",
        )?;

        let records = stmt
            .query_map(params![run_id], |row| {
                Ok(ItemRecord {
                    title: row.get(0)?,
                    price: row.get(1)?,
                    description: row.get(2)?,
                    upc: row.get(3)?,
                    availability: row.get(4)?,
                    picture_url: row.get(5)?,
                    source_url: row.get(6)?,
                    category: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

impl RecordSink for SqliteSink {
    fn accept(&mut self, records: &[ItemRecord]) -> SinkResult<()> {
        let finished_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO runs (started_at, finished_at, config_hash, record_count)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                self.started_at.to_rfc3339(),
                finished_at,
                self.config_hash,
                records.len() as i64
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO items (run_id, position, title, price, description, upc,
                 availability, picture_url, source_url, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for (position, record) in records.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    position as i64,
                    record.title,
                    record.price,
                    record.description,
                    record.upc,
                    record.availability,
                    record.picture_url,
                    record.source_url,
                    record.category,
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!("Stored run {} with {} records", run_id, records.len());
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite:{}", path.display()),
            None => "sqlite::memory:".to_string(),
        }
    }
}
