//! SQLite-backed media catalog.
//!
//! `SqliteMediaStore` owns a single connection behind a per-instance mutex;
//! every public operation holds the lock for its full statement or
//! transaction, which is what makes concurrent callers (UI thread, scan
//! thread) safe against each other. SQLite is never touched by two calls at
//! once through the same store.

use super::dedup::dedup_by_path;
use super::models::{MatchMode, MediaField, MediaRecord};
use super::query::SearchQuery;
use super::schema;
use super::trait_def::MediaStore;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};

/// Failures surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be opened or its schema created. Fatal at
    /// startup; the process cannot continue without a catalog.
    #[error("media store unavailable: {0}")]
    Unavailable(String),

    /// A batch transaction could not begin or commit. The caller sees zero
    /// rows written for the round; nothing is retried automatically.
    #[error("catalog transaction failed: {0}")]
    Transaction(#[source] rusqlite::Error),

    /// A query legitimately matched nothing. Not an alarming condition;
    /// distinguishable from `Transaction` so callers can show an empty view
    /// without warning the user.
    #[error("no catalog rows matched")]
    EmptyResult,

    /// Any other statement failure.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

const SELECT_COLUMNS: &str = "id, title, track, artist, album, band, genre, path, mimetype";

/// Insert-or-replace keyed by path. The id subselect carries the existing
/// surrogate id forward so re-upserting a known path keeps its row identity.
const UPSERT_SQL: &str = "
    INSERT OR REPLACE INTO media_items
        (id, title, track, artist, album, band, genre, path, mimetype)
    VALUES
        ((SELECT id FROM media_items WHERE path = ?7), ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// SQLite-backed implementation of [`MediaStore`].
#[derive(Clone)]
pub struct SqliteMediaStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMediaStore {
    /// Open the catalog at `db_path`, creating the file and schema if
    /// missing.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let path = db_path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StoreError::Unavailable(format!("failed to open {}: {e}", path.display()))
        })?;
        let store = Self::with_connection(conn)?;

        let count: i64 = {
            let conn = store.conn.lock().unwrap();
            conn.query_row("SELECT COUNT(*) FROM media_items", [], |r| r.get(0))
                .unwrap_or(0)
        };
        info!("Opened media catalog at {:?} ({} items)", path, count);

        Ok(store)
    }

    /// In-memory catalog, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Unavailable(format!("failed to open in-memory db: {e}")))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        schema::create(&conn)
            .map_err(|e| StoreError::Unavailable(format!("failed to create catalog schema: {e}")))?;
        schema::validate(&conn).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(SqliteMediaStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<MediaRecord> {
        // Optional fields may be NULL in the table; they surface as empty
        // strings so callers never see a separate absence marker.
        Ok(MediaRecord {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            track_number: row.get(2)?,
            artist: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            album: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            band: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            genre: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            path: row.get(7)?,
            mime_type: row.get(8)?,
        })
    }

    /// Collect mapped rows, logging and skipping any that fail to decode.
    fn collect_rows(
        rows: impl Iterator<Item = rusqlite::Result<MediaRecord>>,
    ) -> Vec<MediaRecord> {
        let mut records = Vec::new();
        for row in rows {
            match row {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping undecodable catalog row: {}", e),
            }
        }
        records
    }
}

impl MediaStore for SqliteMediaStore {
    fn upsert_batch(&self, records: &[MediaRecord]) -> Result<usize, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(StoreError::Transaction)?;

        let mut written = 0usize;
        {
            let mut stmt = tx.prepare(UPSERT_SQL).map_err(StoreError::Transaction)?;
            for record in records {
                let result = stmt.execute(params![
                    record.title,
                    record.track_number,
                    record.artist,
                    record.album,
                    record.band,
                    record.genre,
                    record.path,
                    record.mime_type,
                ]);
                match result {
                    Ok(_) => written += 1,
                    // Best-effort batches: one bad row must not cost a whole
                    // scan's worth of results, so the batch commits anyway.
                    Err(e) => warn!("Skipping catalog row for {}: {}", record.path, e),
                }
            }
        }

        tx.commit().map_err(StoreError::Transaction)?;
        info!("Wrote {} of {} records to the catalog", written, records.len());
        Ok(written)
    }

    fn get_by_path(&self, path: &str) -> Result<Option<MediaRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {SELECT_COLUMNS} FROM media_items WHERE path = ?1"
        ))?;
        match stmt.query_row(params![path], Self::row_to_record) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn all_media(&self) -> Result<Vec<MediaRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {SELECT_COLUMNS} FROM media_items ORDER BY track ASC, id ASC"
        ))?;
        let rows = stmt.query_map([], Self::row_to_record)?;
        Ok(Self::collect_rows(rows))
    }

    fn distinct_values(&self, field: MediaField) -> Result<Vec<String>, StoreError> {
        let column = field.column();
        // Grouping keyed on the first underlying row keeps distinct values
        // in `track ASC, id ASC` order of the rows that introduced them.
        let sql = format!(
            "SELECT {column} FROM media_items \
             WHERE {column} IS NOT NULL AND {column} <> '' \
             GROUP BY {column} ORDER BY MIN(track) ASC, MIN(id) ASC"
        );

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut values = Vec::new();
        for row in rows {
            match row {
                Ok(value) => values.push(value),
                Err(e) => warn!("Skipping undecodable {} value: {}", column, e),
            }
        }

        if values.is_empty() {
            return Err(StoreError::EmptyResult);
        }
        Ok(values)
    }

    fn search(
        &self,
        field: MediaField,
        mode: MatchMode,
        term: &str,
        limit: Option<usize>,
    ) -> Result<Vec<MediaRecord>, StoreError> {
        let query = SearchQuery::new(field, mode, term, limit);
        let sql = query.sql();
        let term_value = query.bound_term();

        let records = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(&sql)?;
            let rows = match query.limit() {
                Some(limit) => stmt.query_map(params![term_value, limit as i64], Self::row_to_record)?,
                None => stmt.query_map(params![term_value], Self::row_to_record)?,
            };
            Self::collect_rows(rows)
        };

        let records = dedup_by_path(records);
        if records.is_empty() {
            return Err(StoreError::EmptyResult);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_then_point_lookup() {
        let store = SqliteMediaStore::open_in_memory().unwrap();
        let record = MediaRecord {
            artist: "The Beatles".into(),
            album: "Revolver".into(),
            ..MediaRecord::new("Taxman", 1, "/m/taxman.mp3", "audio/mpeg")
        };

        assert_eq!(store.upsert_batch(&[record.clone()]).unwrap(), 1);

        let found = store.get_by_path("/m/taxman.mp3").unwrap().unwrap();
        assert!(found.id.is_some());
        assert_eq!(found.title, record.title);
        assert_eq!(found.album, "Revolver");
        assert_eq!(found.band, "");
    }

    #[test]
    fn missing_path_is_none_not_error() {
        let store = SqliteMediaStore::open_in_memory().unwrap();
        assert!(store.get_by_path("/nowhere.mp3").unwrap().is_none());
    }

    #[test]
    fn empty_store_distinct_is_empty_result() {
        let store = SqliteMediaStore::open_in_memory().unwrap();
        assert!(matches!(
            store.distinct_values(MediaField::Album),
            Err(StoreError::EmptyResult)
        ));
    }

    #[test]
    fn empty_store_enumerates_nothing() {
        let store = SqliteMediaStore::open_in_memory().unwrap();
        assert!(store.all_media().unwrap().is_empty());
    }
}
