//! SQLite store behind the durable population.

pub use crate::errors::DatabaseError;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;

const PRAGMAS: &str = "PRAGMA synchronous = NORMAL;
PRAGMA journal_mode = WAL;
PRAGMA temp_store = MEMORY;
PRAGMA cache_size = -64000;";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS organisms (
    key INTEGER PRIMARY KEY,
    data BLOB NOT NULL
);";

/// Tables a population store must contain.
pub const TABLES: [&str; 2] = ["metadata", "organisms"];

/// A SQLite file holding one population: a key/value `metadata` table and
/// one bincode blob per organism in `organisms`.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    db_path: String,
}

impl Database {
    /// Open (or create) a store, applying the WAL pragmas and the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let db_path = path.as_ref().to_string_lossy().into_owned();
        let conn =
            Connection::open(&db_path).map_err(|e| DatabaseError::Connection(e.to_string()))?;
        conn.execute_batch(PRAGMAS)
            .and_then(|()| conn.execute_batch(SCHEMA))
            .map_err(|e| DatabaseError::Initialization(e.to_string()))?;

        log::debug!("Opened store {db_path}");
        Ok(Self { conn, db_path })
    }

    pub fn transaction(&mut self) -> Result<Transaction<'_>, DatabaseError> {
        self.conn
            .transaction()
            .map_err(|e| DatabaseError::Transaction(e.to_string()))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.db_path
    }

    pub fn metadata(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        self.conn
            .query_row(
                "SELECT value FROM metadata WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Insert or overwrite a metadata value.
    pub fn set_metadata(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO metadata (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map(drop)
            .map_err(|e| DatabaseError::Insert(e.to_string()))
    }

    /// Row count of one of [`TABLES`].
    pub fn count(&self, table: &str) -> Result<usize, DatabaseError> {
        if !TABLES.contains(&table) {
            return Err(DatabaseError::Query(format!("no such table: {table}")));
        }
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n as usize)
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }

    /// Rewrite the file, reclaiming pages freed by deleted organisms.
    pub fn vacuum(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch("VACUUM;")
            .map_err(|e| DatabaseError::Vacuum(e.to_string()))
    }

    pub fn stats(&self) -> Result<DatabaseStats, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        Ok(DatabaseStats {
            organism_records: self.count("organisms")?,
            metadata_records: self.count("metadata")?,
            tables,
        })
    }

    /// Compact, leave WAL mode and close, deleting the `-wal`/`-shm` side
    /// files.
    pub fn close(self) -> Result<(), DatabaseError> {
        self.vacuum()?;
        if let Err(e) = self
            .conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE); PRAGMA journal_mode = DELETE;")
        {
            log::warn!("Could not checkpoint {}: {e}", self.db_path);
        }

        let Self { conn, db_path } = self;
        conn.close()
            .map_err(|(_, e)| DatabaseError::Close(e.to_string()))?;

        for suffix in ["-wal", "-shm"] {
            let side_file = format!("{db_path}{suffix}");
            match std::fs::remove_file(&side_file) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    log::warn!("Could not remove {side_file}: {e}");
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub organism_records: usize,
    pub metadata_records: usize,
    pub tables: Vec<String>,
}
