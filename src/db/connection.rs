use std::fs;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::config::{StoreConfig, StoreLocation};
use crate::error::StoreError;

use super::store::Collection;

/// Open the configured database, create the schema if needed, and return a
/// live connection. Parent directories of a file-backed store are created on
/// first use.
pub fn open_store(config: &StoreConfig) -> Result<Connection, StoreError> {
    let conn = match &config.location {
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
            debug!(path = %path.display(), "opening record store");
            Connection::open(path).map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?
        }
        StoreLocation::InMemory => Connection::open_in_memory().map_err(|source| {
            StoreError::Open {
                path: ":memory:".into(),
                source,
            }
        })?,
    };

    conn.busy_timeout(config.busy_timeout)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the `collections` table and seed an empty row for every known
/// collection. Existing rows are left alone.
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS collections (
            name TEXT PRIMARY KEY,
            next_id INTEGER NOT NULL DEFAULT 1,
            records TEXT NOT NULL DEFAULT '[]'
        )",
        [],
    )?;

    for collection in Collection::ALL {
        conn.execute(
            "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
            params![collection.name()],
        )?;
    }

    Ok(())
}
