use rusqlite::Connection;
use tracing::info;

use crate::error::{LibraryError, Result};
use crate::models::Reservation;

use super::store::{atomically, load_collection, save_collection, Collection};

/// All reservations across books, oldest first.
pub fn fetch_reservations(conn: &Connection) -> Result<Vec<Reservation>> {
    Ok(load_collection(conn, Collection::Reservations)?)
}

/// The queue for one book. The first entry has priority.
pub fn fetch_reservations_for_book(conn: &Connection, book_id: i64) -> Result<Vec<Reservation>> {
    Ok(fetch_reservations(conn)?
        .into_iter()
        .filter(|reservation| reservation.book_id == book_id)
        .collect())
}

pub fn has_reservation(conn: &Connection, book_id: i64, member_id: i64) -> Result<bool> {
    Ok(fetch_reservations(conn)?
        .iter()
        .any(|reservation| reservation.matches(book_id, member_id)))
}

/// Queue a reservation at the back, refusing a duplicate (book, member) pair.
pub(crate) fn add_reservation(conn: &Connection, reservation: Reservation) -> Result<()> {
    atomically(conn, |conn| {
        let mut reservations = fetch_reservations(conn)?;
        if reservations
            .iter()
            .any(|existing| existing.matches(reservation.book_id, reservation.member_id))
        {
            return Err(LibraryError::AlreadyReserved {
                book_id: reservation.book_id,
                member_id: reservation.member_id,
            });
        }
        reservations.push(reservation);
        save_collection(conn, Collection::Reservations, &reservations)?;
        info!(
            book_id = reservation.book_id,
            member_id = reservation.member_id,
            "reservation queued"
        );
        Ok(())
    })
}

/// Remove the reservation for exactly this pair. Returns whether one existed;
/// the collection is not rewritten when nothing matched.
pub(crate) fn remove_reservation(conn: &Connection, book_id: i64, member_id: i64) -> Result<bool> {
    atomically(conn, |conn| {
        let mut reservations = fetch_reservations(conn)?;
        let before = reservations.len();
        reservations.retain(|reservation| !reservation.matches(book_id, member_id));
        if reservations.len() == before {
            return Ok(false);
        }
        save_collection(conn, Collection::Reservations, &reservations)?;
        Ok(true)
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
    fn queue_keeps_insertion_order_per_book() {
        let conn = store();
        for (book_id, member_id) in [(1, 3), (2, 9), (1, 1), (1, 2)] {
            add_reservation(&conn, Reservation { book_id, member_id }).expect("add");
        }

        let members: Vec<i64> = fetch_reservations_for_book(&conn, 1)
            .expect("queue")
            .iter()
            .map(|reservation| reservation.member_id)
            .collect();
        assert_eq!(members, vec![3, 1, 2]);
    }

    #[test]
    fn duplicate_pair_is_rejected() {
        let conn = store();
        let reservation = Reservation { book_id: 1, member_id: 2 };
        add_reservation(&conn, reservation).expect("first add");

        let result = add_reservation(&conn, reservation);
        assert!(matches!(
            result,
            Err(LibraryError::AlreadyReserved { book_id: 1, member_id: 2 })
        ));
        assert_eq!(fetch_reservations(&conn).expect("list").len(), 1);
    }

    #[test]
    fn remove_only_touches_matching_pair() {
        let conn = store();
        add_reservation(&conn, Reservation { book_id: 1, member_id: 1 }).expect("add");
        add_reservation(&conn, Reservation { book_id: 1, member_id: 2 }).expect("add");

        assert!(remove_reservation(&conn, 1, 1).expect("remove"));
        assert!(!remove_reservation(&conn, 1, 1).expect("remove again"));
        assert!(has_reservation(&conn, 1, 2).expect("lookup"));
    }
}
