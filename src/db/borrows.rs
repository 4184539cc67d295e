use rusqlite::Connection;
use tracing::info;

use crate::error::Result;
use crate::models::Borrow;

use super::store::{atomically, load_collection, save_collection, Collection};

/// Active borrows in the order they were recorded.
pub fn fetch_borrows(conn: &Connection) -> Result<Vec<Borrow>> {
    Ok(load_collection(conn, Collection::Borrows)?)
}

pub fn fetch_borrows_for_member(conn: &Connection, member_id: i64) -> Result<Vec<Borrow>> {
    Ok(fetch_borrows(conn)?
        .into_iter()
        .filter(|borrow| borrow.member_id == member_id)
        .collect())
}

/// Append a borrow record. Callers are responsible for flipping the book's
/// availability in the same transaction.
pub(crate) fn add_borrow(conn: &Connection, borrow: Borrow) -> Result<()> {
    atomically(conn, |conn| {
        let mut borrows = fetch_borrows(conn)?;
        borrows.push(borrow);
        save_collection(conn, Collection::Borrows, &borrows)?;
        info!(book_id = borrow.book_id, member_id = borrow.member_id, "borrow recorded");
        Ok(())
    })
}

/// Drop every borrow for `book_id` and return how many were removed.
pub(crate) fn remove_borrows_for_book(conn: &Connection, book_id: i64) -> Result<usize> {
    atomically(conn, |conn| {
        let mut borrows = fetch_borrows(conn)?;
        let before = borrows.len();
        borrows.retain(|borrow| borrow.book_id != book_id);
        let removed = before - borrows.len();
        if removed > 0 {
            save_collection(conn, Collection::Borrows, &borrows)?;
        }
        Ok(removed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::db::open_store;

    fn store() -> Connection {
        open_store(&StoreConfig::in_memory()).expect("in-memory store should open")
    }

    #[test]
    fn borrows_filter_by_member() {
        let conn = store();
        add_borrow(&conn, Borrow { book_id: 1, member_id: 1 }).expect("add");
        add_borrow(&conn, Borrow { book_id: 2, member_id: 2 }).expect("add");
        add_borrow(&conn, Borrow { book_id: 3, member_id: 1 }).expect("add");

        let mine = fetch_borrows_for_member(&conn, 1).expect("filter");
        assert_eq!(
            mine,
            vec![
                Borrow { book_id: 1, member_id: 1 },
                Borrow { book_id: 3, member_id: 1 }
            ]
        );
    }

    #[test]
    fn remove_counts_every_matching_borrow() {
        let conn = store();
        add_borrow(&conn, Borrow { book_id: 1, member_id: 1 }).expect("add");
        add_borrow(&conn, Borrow { book_id: 1, member_id: 2 }).expect("add");
        add_borrow(&conn, Borrow { book_id: 2, member_id: 3 }).expect("add");

        assert_eq!(remove_borrows_for_book(&conn, 1).expect("remove"), 2);
        assert_eq!(remove_borrows_for_book(&conn, 1).expect("remove"), 0);
        assert_eq!(
            fetch_borrows(&conn).expect("list"),
            vec![Borrow { book_id: 2, member_id: 3 }]
        );
    }
}
