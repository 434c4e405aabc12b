//! SQLite schema for the media catalog.
//!
//! One table, created on open if missing. There is deliberately no migration
//! machinery here; an incompatible legacy store file is removed wholesale at
//! startup (see `crate::config`) before the store is ever opened.

use anyhow::{bail, Result};
use rusqlite::Connection;

/// Name of the single catalog table.
pub const MEDIA_TABLE: &str = "media_items";

/// Columns in declaration order. `path` is the natural key.
pub const MEDIA_COLUMNS: &[&str] = &[
    "id", "title", "track", "artist", "album", "band", "genre", "path", "mimetype",
];

const CREATE_MEDIA_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS media_items (
        id INTEGER PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        track INTEGER NOT NULL,
        artist TEXT,
        album TEXT,
        band TEXT,
        genre TEXT,
        path TEXT NOT NULL UNIQUE,
        mimetype TEXT NOT NULL
    )";

/// Create the catalog table if it does not exist yet.
pub fn create(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(CREATE_MEDIA_TABLE, [])?;
    Ok(())
}

/// Check that an opened database carries the expected table shape.
pub fn validate(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({MEDIA_TABLE})"))?;
    let found = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    for expected in MEDIA_COLUMNS {
        if !found.iter().any(|c| c == expected) {
            bail!("catalog table {MEDIA_TABLE} is missing column {expected}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn create_and_validate() {
        let conn = Connection::open_in_memory().unwrap();
        create(&conn).unwrap();
        validate(&conn).unwrap();
    }

    #[test]
    fn create_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create(&conn).unwrap();
        create(&conn).unwrap();
        validate(&conn).unwrap();
    }

    #[test]
    fn path_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        create(&conn).unwrap();

        conn.execute(
            "INSERT INTO media_items (title, track, path, mimetype)
             VALUES ('a', 1, '/m/a.mp3', 'audio/mpeg')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO media_items (title, track, path, mimetype)
             VALUES ('b', 2, '/m/a.mp3', 'audio/mpeg')",
            [],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn validate_rejects_foreign_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE media_items (id INTEGER PRIMARY KEY, name TEXT)", [])
            .unwrap();
        assert!(validate(&conn).is_err());
    }
}
