//! Generic collection persistence. Each collection is one row of the
//! `collections` table holding the whole ordered sequence as a JSON array,
//! next to the counter used to hand out record ids. Reads always go back to
//! the database; nothing is cached.

use std::fmt;

use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::StoreError;

/// The named collections the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Books,
    Members,
    Borrows,
    Reservations,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Books,
        Collection::Members,
        Collection::Borrows,
        Collection::Reservations,
    ];

    /// Key of the collection's row in the `collections` table.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::Members => "members",
            Collection::Borrows => "borrows",
            Collection::Reservations => "reservations",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read a whole collection in stored order. A collection that has never been
/// written is created empty instead of failing.
pub fn load_collection<T: DeserializeOwned>(
    conn: &Connection,
    collection: Collection,
) -> Result<Vec<T>, StoreError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT records FROM collections WHERE name = ?1",
            params![collection.name()],
            |row| row.get(0),
        )
        .optional()?;

    let Some(raw) = raw else {
        conn.execute(
            "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
            params![collection.name()],
        )?;
        return Ok(Vec::new());
    };

    let records: Vec<T> = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
        collection: collection.name(),
        source,
    })?;
    debug!(%collection, len = records.len(), "loaded collection");
    Ok(records)
}

/// Replace the stored sequence with `records`. The id counter is untouched.
pub fn save_collection<T: Serialize>(
    conn: &Connection,
    collection: Collection,
    records: &[T],
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(records).map_err(|source| StoreError::Encode {
        collection: collection.name(),
        source,
    })?;

    conn.execute(
        "INSERT INTO collections (name, records) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET records = excluded.records",
        params![collection.name(), raw],
    )?;
    debug!(%collection, len = records.len(), "saved collection");
    Ok(())
}

/// Hand out the next id for `collection` and persist the advanced counter.
/// Ids are never reused, even after the record that held one is deleted.
pub fn allocate_id(conn: &Connection, collection: Collection) -> Result<i64, StoreError> {
    atomically(conn, |conn| {
        conn.execute(
            "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
            params![collection.name()],
        )?;
        let id: i64 = conn.query_row(
            "SELECT next_id FROM collections WHERE name = ?1",
            params![collection.name()],
            |row| row.get(0),
        )?;
        conn.execute(
            "UPDATE collections SET next_id = ?1 WHERE name = ?2",
            params![id + 1, collection.name()],
        )?;
        Ok(id)
    })
}

/// Run `op` inside one IMMEDIATE transaction so its writes land together or
/// not at all. The write lock is taken up front, which serializes concurrent
/// writers. When a transaction is already open, `op` joins it.
pub fn atomically<T, E, F>(conn: &Connection, op: F) -> Result<T, E>
where
    F: FnOnce(&Connection) -> Result<T, E>,
    E: From<rusqlite::Error>,
{
    if !conn.is_autocommit() {
        return op(conn);
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let value = op(&tx)?;
    tx.commit()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::db::open_store;
    use crate::models::{Book, Reservation};

    fn store() -> Connection {
        open_store(&StoreConfig::in_memory()).expect("in-memory store should open")
    }

    fn book(id: i64, title: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: "Anon".to_string(),
            available: id % 2 == 0,
        }
    }

    #[test]
    fn save_then_load_preserves_order_and_values() {
        let conn = store();
        let books = vec![book(3, "C"), book(1, "A"), book(2, "B")];

        save_collection(&conn, Collection::Books, &books).expect("save");
        let loaded: Vec<Book> = load_collection(&conn, Collection::Books).expect("load");

        assert_eq!(loaded, books);
    }

    #[test]
    fn missing_collection_loads_empty_and_is_created() {
        let conn = store();
        conn.execute("DELETE FROM collections WHERE name = 'reservations'", [])
            .expect("drop row");

        let loaded: Vec<Reservation> =
            load_collection(&conn, Collection::Reservations).expect("load");
        assert!(loaded.is_empty());

        let exists: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM collections WHERE name = 'reservations'",
                [],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(exists, 1);
    }

    #[test]
    fn corrupt_collection_is_reported() {
        let conn = store();
        conn.execute(
            "UPDATE collections SET records = '{not json' WHERE name = 'members'",
            [],
        )
        .expect("corrupt row");

        let result: Result<Vec<crate::models::Member>, _> =
            load_collection(&conn, Collection::Members);
        match result {
            Err(StoreError::Corrupt { collection, .. }) => assert_eq!(collection, "members"),
            other => panic!("expected corrupt collection error, got {other:?}"),
        }
    }

    #[test]
    fn allocate_id_is_monotonic_per_collection() {
        let conn = store();
        assert_eq!(allocate_id(&conn, Collection::Books).expect("id"), 1);
        assert_eq!(allocate_id(&conn, Collection::Books).expect("id"), 2);
        assert_eq!(allocate_id(&conn, Collection::Members).expect("id"), 1);
        assert_eq!(allocate_id(&conn, Collection::Books).expect("id"), 3);
    }

    #[test]
    fn failed_operation_rolls_back_every_write() {
        let conn = store();
        save_collection(&conn, Collection::Books, &[book(1, "Kept")]).expect("seed");

        let result: Result<(), StoreError> = atomically(&conn, |conn| {
            save_collection(conn, Collection::Books, &[book(2, "Lost")])?;
            allocate_id(conn, Collection::Books)?;
            Err(StoreError::NoHomeDir)
        });
        assert!(result.is_err());

        let loaded: Vec<Book> = load_collection(&conn, Collection::Books).expect("load");
        assert_eq!(loaded, vec![book(1, "Kept")]);
        assert_eq!(allocate_id(&conn, Collection::Books).expect("id"), 1);
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!(
            "library-records-store-{}-{}.sqlite",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos()
        ));
        let config = StoreConfig::file(&path);

        {
            let conn = open_store(&config).expect("open file store");
            save_collection(&conn, Collection::Books, &[book(1, "Persisted")]).expect("save");
        }

        let conn = open_store(&config).expect("reopen file store");
        let loaded: Vec<Book> = load_collection(&conn, Collection::Books).expect("load");
        assert_eq!(loaded, vec![book(1, "Persisted")]);

        drop(conn);
        let _ = std::fs::remove_file(path);
    }
}
