//! Read-only views over the four collections. Nothing in here writes.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::db::{fetch_books, fetch_borrows, fetch_members, fetch_reservations};
use crate::error::Result;
use crate::models::{Book, Borrow, Member, Reservation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total_books: usize,
    pub total_available: usize,
    pub total_unavailable: usize,
}

/// A borrow joined with its book and member. Either side is `None` when the
/// referenced record has been deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowDetail {
    pub borrow: Borrow,
    pub book: Option<Book>,
    pub member: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDetail {
    pub reservation: Reservation,
    pub book: Option<Book>,
}

/// One position in a book's reservation queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub reservation: Reservation,
    pub member: Option<Member>,
}

/// Disagreements between collections found by [`integrity_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// `available` is false but no borrow names the book.
    UnavailableWithoutBorrow { book_id: i64 },
    /// `available` is true while a borrow names the book.
    AvailableWhileBorrowed { book_id: i64 },
    /// More than one active borrow for the same book.
    MultipleBorrows { book_id: i64, count: usize },
    DanglingBorrow { borrow: Borrow },
    DanglingReservation { reservation: Reservation },
}

pub fn summary(conn: &Connection) -> Result<Summary> {
    let books = fetch_books(conn)?;
    let total_available = books.iter().filter(|book| book.available).count();
    Ok(Summary {
        total_books: books.len(),
        total_available,
        total_unavailable: books.len() - total_available,
    })
}

/// Books currently lent to `member_id`, in borrow order.
pub fn borrowed_by_member(conn: &Connection, member_id: i64) -> Result<Vec<Book>> {
    let books = index_books(fetch_books(conn)?);
    Ok(fetch_borrows(conn)?
        .into_iter()
        .filter(|borrow| borrow.member_id == member_id)
        .filter_map(|borrow| books.get(&borrow.book_id).cloned())
        .collect())
}

pub fn borrowed_books(conn: &Connection) -> Result<Vec<BorrowDetail>> {
    let books = index_books(fetch_books(conn)?);
    let members = index_members(fetch_members(conn)?);
    Ok(fetch_borrows(conn)?
        .into_iter()
        .map(|borrow| BorrowDetail {
            book: books.get(&borrow.book_id).cloned(),
            member: members.get(&borrow.member_id).cloned(),
            borrow,
        })
        .collect())
}

pub fn reservations_with_books(conn: &Connection) -> Result<Vec<ReservationDetail>> {
    let books = index_books(fetch_books(conn)?);
    Ok(fetch_reservations(conn)?
        .into_iter()
        .map(|reservation| ReservationDetail {
            book: books.get(&reservation.book_id).cloned(),
            reservation,
        })
        .collect())
}

/// The book's queue, highest priority first, with member profiles attached.
pub fn reservation_queue(conn: &Connection, book_id: i64) -> Result<Vec<QueueEntry>> {
    let members = index_members(fetch_members(conn)?);
    Ok(fetch_reservations(conn)?
        .into_iter()
        .filter(|reservation| reservation.book_id == book_id)
        .map(|reservation| QueueEntry {
            member: members.get(&reservation.member_id).cloned(),
            reservation,
        })
        .collect())
}

/// Cross-check availability flags against the ledger and look for records
/// pointing at deleted books or members.
pub fn integrity_report(conn: &Connection) -> Result<Vec<IntegrityIssue>> {
    let books = fetch_books(conn)?;
    let members = index_members(fetch_members(conn)?);
    let borrows = fetch_borrows(conn)?;
    let reservations = fetch_reservations(conn)?;

    let mut borrow_counts: HashMap<i64, usize> = HashMap::new();
    for borrow in &borrows {
        *borrow_counts.entry(borrow.book_id).or_default() += 1;
    }

    let mut issues = Vec::new();
    for book in &books {
        let count = borrow_counts.get(&book.id).copied().unwrap_or(0);
        match (book.available, count) {
            (false, 0) => issues.push(IntegrityIssue::UnavailableWithoutBorrow { book_id: book.id }),
            (true, n) if n > 0 => {
                issues.push(IntegrityIssue::AvailableWhileBorrowed { book_id: book.id })
            }
            _ => {}
        }
        if count > 1 {
            issues.push(IntegrityIssue::MultipleBorrows {
                book_id: book.id,
                count,
            });
        }
    }

    let book_ids: Vec<i64> = books.iter().map(|book| book.id).collect();
    for borrow in borrows {
        if !book_ids.contains(&borrow.book_id) || !members.contains_key(&borrow.member_id) {
            issues.push(IntegrityIssue::DanglingBorrow { borrow });
        }
    }
    for reservation in reservations {
        if !book_ids.contains(&reservation.book_id)
            || !members.contains_key(&reservation.member_id)
        {
            issues.push(IntegrityIssue::DanglingReservation { reservation });
        }
    }

    Ok(issues)
}

fn index_books(books: Vec<Book>) -> HashMap<i64, Book> {
    books.into_iter().map(|book| (book.id, book)).collect()
}

fn index_members(members: Vec<Member>) -> HashMap<i64, Member> {
    members.into_iter().map(|member| (member.id, member)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StoreConfig, WorkflowPolicy};
    use crate::db::{create_book, create_member, delete_member, open_store};
    use crate::workflow::{request_book, ReservationIntent};

    fn library() -> Connection {
        let conn = open_store(&StoreConfig::in_memory()).expect("in-memory store should open");
        create_book(&conn, "Dune", "Herbert", true).expect("book");
        create_book(&conn, "Emma", "Austen", true).expect("book");
        create_book(&conn, "Ulysses", "Joyce", true).expect("book");
        create_member(&conn, "Ada", "ada@example.com").expect("member");
        create_member(&conn, "Brian", "brian@example.com").expect("member");
        conn
    }

    #[test]
    fn summary_counts_availability() {
        let conn = library();
        request_book(&conn, WorkflowPolicy::default(), 2, 1, ReservationIntent::Decline)
            .expect("borrow");

        assert_eq!(
            summary(&conn).expect("summary"),
            Summary {
                total_books: 3,
                total_available: 2,
                total_unavailable: 1
            }
        );
    }

    #[test]
    fn member_view_lists_only_their_books() {
        let conn = library();
        let policy = WorkflowPolicy::default();
        request_book(&conn, policy, 1, 1, ReservationIntent::Decline).expect("borrow");
        request_book(&conn, policy, 2, 2, ReservationIntent::Decline).expect("borrow");
        request_book(&conn, policy, 3, 1, ReservationIntent::Decline).expect("borrow");

        let titles: Vec<String> = borrowed_by_member(&conn, 1)
            .expect("view")
            .into_iter()
            .map(|book| book.title)
            .collect();
        assert_eq!(titles, vec!["Dune".to_string(), "Ulysses".to_string()]);
    }

    #[test]
    fn queue_attaches_member_profiles_in_order() {
        let conn = library();
        let policy = WorkflowPolicy::default();
        request_book(&conn, policy, 1, 1, ReservationIntent::Decline).expect("borrow");
        request_book(&conn, policy, 1, 2, ReservationIntent::Reserve).expect("reserve");

        let queue = reservation_queue(&conn, 1).expect("queue");
        assert_eq!(queue.len(), 1);
        assert_eq!(
            queue[0].member.as_ref().map(|member| member.name.as_str()),
            Some("Brian")
        );

        let detailed = reservations_with_books(&conn).expect("reservations");
        assert_eq!(
            detailed[0].book.as_ref().map(|book| book.title.as_str()),
            Some("Dune")
        );
    }

    #[test]
    fn integrity_report_is_clean_after_workflow() {
        let conn = library();
        let policy = WorkflowPolicy::default();
        request_book(&conn, policy, 1, 1, ReservationIntent::Decline).expect("borrow");
        request_book(&conn, policy, 1, 2, ReservationIntent::Reserve).expect("reserve");

        assert!(integrity_report(&conn).expect("report").is_empty());
    }

    #[test]
    fn integrity_report_flags_deleted_member_and_manual_flag() {
        let conn = library();
        let policy = WorkflowPolicy::default();
        request_book(&conn, policy, 1, 2, ReservationIntent::Decline).expect("borrow");
        delete_member(&conn, 2).expect("delete");
        create_book(&conn, "Lost", "Nobody", false).expect("book");

        let issues = integrity_report(&conn).expect("report");
        assert!(issues.contains(&IntegrityIssue::DanglingBorrow {
            borrow: Borrow { book_id: 1, member_id: 2 }
        }));
        assert!(issues.contains(&IntegrityIssue::UnavailableWithoutBorrow { book_id: 4 }));

        let details = borrowed_books(&conn).expect("borrowed");
        assert_eq!(details.len(), 1);
        assert!(details[0].member.is_none());
        assert!(details[0].book.is_some());
    }
}
