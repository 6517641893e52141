use std::collections::HashSet;
use std::path::Path;

use multimap::MultiMap;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::constants;
use crate::error::{Error, Result};
use crate::io::bulk::BulkSession;
use crate::lookup::KeywordLookup;
use crate::record::CosmicRecord;

pub use crate::constants::COSMIC_TABLE;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cosmic_mutation (
    COSMIC_MUTATION_ID TEXT NOT NULL,
    CHR TEXT NOT NULL,
    START_POSITION INTEGER NOT NULL,
    REFERENCE_ALLELE TEXT NOT NULL,
    TUMOR_SEQ_ALLELE TEXT NOT NULL,
    STRAND TEXT NOT NULL,
    CDS TEXT NOT NULL,
    ENTREZ_GENE_ID INTEGER NOT NULL,
    PROTEIN_CHANGE TEXT NOT NULL,
    COUNT INTEGER NOT NULL,
    KEYWORD TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_cosmic_mutation_keyword
    ON cosmic_mutation (KEYWORD);
";

/// Durable store of COSMIC mutation-frequency annotations.
///
/// Writes go through an externally opened bulk session installed with
/// `begin_bulk`; at most one session is active at a time. Reads are
/// keyword-indexed bulk lookups.
pub struct CosmicStore {
    conn: Connection,
    bulk: Option<Box<dyn BulkSession>>,
}

impl CosmicStore {
    /// Open a store at the given database path, creating the annotation
    /// table if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Open a transient in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(CosmicStore { conn, bulk: None })
    }

    /// Install an externally opened bulk-write session.
    /// Fails if a session is already active.
    pub fn begin_bulk(&mut self, session: Box<dyn BulkSession>) -> Result<()> {
        if self.bulk.is_some() {
            return Err(Error::Config("a bulk session is already active".to_owned()));
        }
        self.bulk = Some(session);
        Ok(())
    }

    /// Close the active bulk session, flushing all staged records.
    /// Returns the number of rows the sink committed.
    pub fn end_bulk(&mut self) -> Result<u64> {
        match self.bulk.take() {
            None => Err(Error::Config("no bulk session is active".to_owned())),
            Some(session) => {
                let rows = session.close()?;
                info!(rows, "bulk session flushed");
                Ok(rows)
            }
        }
    }

    /// Stage one record for insertion through the active bulk session.
    ///
    /// Nothing is durably written here; the session commits on `end_bulk`.
    /// Returns 1 as the enqueue acknowledgement.
    pub fn add_record(&mut self, record: &CosmicRecord) -> Result<u32> {
        match self.bulk {
            None => Err(Error::Config(
                "a bulk session must be active in order to insert mutations".to_owned(),
            )),
            Some(ref mut session) => {
                session.append(&record.bulk_fields())?;
                Ok(1)
            }
        }
    }

    /// Fetch all records whose keyword is in the given set, grouped by
    /// keyword in storage scan order.
    ///
    /// Issues a single query with one bound parameter per keyword regardless
    /// of set size. Only the annotation columns are materialized; the
    /// remaining genomic fields of each record are left at their defaults.
    /// An empty set returns an empty grouping without touching storage.
    pub fn records_by_keywords(
        &self,
        keywords: &HashSet<String>,
    ) -> Result<MultiMap<String, CosmicRecord>> {
        let mut grouped = MultiMap::new();
        if keywords.is_empty() {
            return Ok(grouped);
        }
        debug!(keywords = keywords.len(), "keyword lookup");

        let sql = format!(
            "SELECT {} FROM {} WHERE KEYWORD IN ({})",
            constants::ANNOTATION_COLUMNS.join(","),
            COSMIC_TABLE,
            vec!["?"; keywords.len()].join(","),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(keywords.iter()), |row| {
            Ok(CosmicRecord {
                id: row.get(0)?,
                entrez_gene_id: row.get(1)?,
                amino_acid_change: row.get(2)?,
                keyword: row.get(3)?,
                frequency: row.get(4)?,
                ..Default::default()
            })
        })?;

        for row in rows {
            let record = row?;
            grouped.insert(record.keyword.clone(), record);
        }
        Ok(grouped)
    }

    /// Irreversibly delete every stored record.
    pub fn clear(&self) -> Result<()> {
        let rows = self
            .conn
            .execute(&format!("DELETE FROM {}", COSMIC_TABLE), [])?;
        info!(rows, "annotation table cleared");
        Ok(())
    }
}

impl KeywordLookup for CosmicStore {
    fn records_by_keywords(
        &self,
        keywords: &HashSet<String>,
    ) -> Result<MultiMap<String, CosmicRecord>> {
        CosmicStore::records_by_keywords(self, keywords)
    }
}
