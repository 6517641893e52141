use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::NamedTempFile;
use tracing::info;

use crate::constants;
use crate::error::{Error, Result};

/// A batched-write capability against one storage target.
///
/// Opening yields a session; the caller appends rows and closes. Durable
/// commit happens only on close.
pub trait BulkLoader {
    /// Open a write session for the given table.
    fn open(&self, table: &str) -> Result<Box<dyn BulkSession>>;
}

/// An open batched-write session.
pub trait BulkSession {
    /// Stage one row of ordered text fields. Nothing is durable yet.
    fn append(&mut self, fields: &[String]) -> Result<()>;
    /// Flush all staged rows into the target table.
    /// Returns the number of rows committed.
    fn close(self: Box<Self>) -> Result<u64>;
}

/// Bulk loader that stages rows in a tab-delimited temporary file and
/// replays them into the database in one transaction on close.
///
/// The loader opens its own connection at flush time, so it must point at
/// the same database file as the store it feeds.
pub struct TsvLoader {
    db_path: PathBuf,
}

impl TsvLoader {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        TsvLoader { db_path: db_path.as_ref().to_path_buf() }
    }
}

impl BulkLoader for TsvLoader {
    fn open(&self, table: &str) -> Result<Box<dyn BulkSession>> {
        let staging = NamedTempFile::new()?;
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(staging);

        Ok(Box::new(TsvSession {
            db_path: self.db_path.clone(),
            table: table.to_owned(),
            writer,
        }))
    }
}

struct TsvSession {
    db_path: PathBuf,
    table: String,
    writer: csv::Writer<NamedTempFile>,
}

impl BulkSession for TsvSession {
    fn append(&mut self, fields: &[String]) -> Result<()> {
        self.writer.write_record(fields)?;
        Ok(())
    }

    /// Replay the staged file into the target table with a single prepared
    /// insert inside one transaction. The staging file is removed on return.
    fn close(self: Box<Self>) -> Result<u64> {
        let session = *self;
        let staging = session
            .writer
            .into_inner()
            .map_err(|err| Error::Io(err.into_error()))?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(staging.path())?;

        let mut conn = Connection::open(&session.db_path)?;
        let tx = conn.transaction()?;
        let mut inserted: u64 = 0;
        {
            let sql = format!(
                "INSERT INTO {} VALUES ({})",
                session.table,
                vec!["?"; constants::N_BULK_FIELDS].join(","),
            );
            let mut stmt = tx.prepare(&sql)?;
            for row in reader.records() {
                let row = row?;
                stmt.execute(rusqlite::params_from_iter(row.iter()))?;
                inserted += 1;
            }
        }
        tx.commit()?;
        info!(table = %session.table, rows = inserted, "bulk load committed");

        Ok(inserted)
    }
}
