//! Borrow and reservation workflow.
//!
//! Each operation here touches more than one collection, so every one of them
//! runs inside a single store transaction: either all of its writes land or
//! none do, and a recoverable error rolls back to the state before the call.
//!
//! A book is `AVAILABLE` or `BORROWED`; a (book, member) pair is either
//! unqueued or `QUEUED`. Returning a book never promotes the queue on its own;
//! the caller converts a reservation explicitly once the book is back.

use rusqlite::Connection;
use tracing::{info, warn};

use crate::config::WorkflowPolicy;
use crate::db::{
    add_borrow, add_reservation, atomically, fetch_book, fetch_borrows, fetch_member,
    has_reservation, remove_borrows_for_book, remove_reservation, set_availability,
};
use crate::error::{LibraryError, Result};
use crate::models::{Book, Borrow, Reservation};

/// What the caller wants to happen when a requested book is out. The shell
/// asks the member up front and passes the answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationIntent {
    Reserve,
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The book was on the shelf and is now lent out.
    Borrowed(Borrow),
    /// The book was out; the member joined its queue.
    Reserved(Reservation),
    /// The book was out and the member was already queued. Nothing changed.
    AlreadyReserved(Reservation),
    /// The book was out and the member chose not to queue.
    Declined,
}

/// Data anomalies noticed while processing a return. They do not fail the
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// More than one borrow was on file for a single book.
    MultipleBorrowsRemoved { book_id: i64, count: usize },
    /// The book was returned but no borrow was recorded for it.
    NoBorrowOnFile { book_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub book: Book,
    pub removed_borrows: usize,
    pub warnings: Vec<IntegrityWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub book: Book,
    pub borrow: Borrow,
    /// False when the member borrowed without a queued reservation.
    pub reservation_removed: bool,
}

fn ensure_member(conn: &Connection, policy: WorkflowPolicy, member_id: i64) -> Result<()> {
    if policy.validate_member {
        fetch_member(conn, member_id)?;
    }
    Ok(())
}

/// Borrow the book if it is on the shelf, otherwise queue or decline per
/// `intent`.
pub fn request_book(
    conn: &Connection,
    policy: WorkflowPolicy,
    book_id: i64,
    member_id: i64,
    intent: ReservationIntent,
) -> Result<RequestOutcome> {
    atomically(conn, |conn| {
        let book = fetch_book(conn, book_id)?;
        ensure_member(conn, policy, member_id)?;

        if book.available {
            set_availability(conn, book_id, false)?;
            let borrow = Borrow { book_id, member_id };
            add_borrow(conn, borrow)?;
            info!(book_id, member_id, "book borrowed");
            return Ok(RequestOutcome::Borrowed(borrow));
        }

        if has_reservation(conn, book_id, member_id)? {
            return Ok(RequestOutcome::AlreadyReserved(Reservation {
                book_id,
                member_id,
            }));
        }

        match intent {
            ReservationIntent::Reserve => {
                let reservation = make_reservation(conn, policy, book_id, member_id)?;
                Ok(RequestOutcome::Reserved(reservation))
            }
            ReservationIntent::Decline => Ok(RequestOutcome::Declined),
        }
    })
}

/// Put the member at the back of the book's queue.
pub fn make_reservation(
    conn: &Connection,
    policy: WorkflowPolicy,
    book_id: i64,
    member_id: i64,
) -> Result<Reservation> {
    atomically(conn, |conn| {
        fetch_book(conn, book_id)?;
        ensure_member(conn, policy, member_id)?;

        let reservation = Reservation { book_id, member_id };
        add_reservation(conn, reservation)?;
        Ok(reservation)
    })
}

/// Mark the book available again and clear its borrow record. The queue is
/// left as is.
pub fn receive_return(conn: &Connection, book_id: i64) -> Result<ReturnReceipt> {
    atomically(conn, |conn| {
        let book = set_availability(conn, book_id, true)?;
        let removed_borrows = remove_borrows_for_book(conn, book_id)?;

        let mut warnings = Vec::new();
        match removed_borrows {
            1 => {}
            0 => {
                warn!(book_id, "returned book had no borrow on file");
                warnings.push(IntegrityWarning::NoBorrowOnFile { book_id });
            }
            count => {
                warn!(book_id, count, "returned book had several borrows on file");
                warnings.push(IntegrityWarning::MultipleBorrowsRemoved { book_id, count });
            }
        }

        info!(book_id, "book returned");
        Ok(ReturnReceipt {
            book,
            removed_borrows,
            warnings,
        })
    })
}

/// Turn the member's reservation into a borrow. The book must have been
/// returned first.
///
/// Writes happen in a fixed order: the reservation is removed, the borrow is
/// appended, then the book is flagged unavailable.
pub fn convert_reservation_to_borrow(
    conn: &Connection,
    policy: WorkflowPolicy,
    book_id: i64,
    member_id: i64,
) -> Result<Conversion> {
    atomically(conn, |conn| {
        let book = fetch_book(conn, book_id)?;
        ensure_member(conn, policy, member_id)?;

        if !book.available {
            return Err(LibraryError::BookUnavailable(book_id));
        }
        if fetch_borrows(conn)?
            .iter()
            .any(|borrow| borrow.matches(book_id, member_id))
        {
            return Err(LibraryError::AlreadyBorrowed { book_id, member_id });
        }

        let reservation_removed = remove_reservation(conn, book_id, member_id)?;
        let borrow = Borrow { book_id, member_id };
        add_borrow(conn, borrow)?;
        let book = set_availability(conn, book_id, false)?;

        info!(book_id, member_id, reservation_removed, "reservation converted to borrow");
        Ok(Conversion {
            book,
            borrow,
            reservation_removed,
        })
    })
}

/// Cancel a reservation. A missing pair is reported and nothing is written.
pub fn delete_reservation(conn: &Connection, book_id: i64, member_id: i64) -> Result<()> {
    atomically(conn, |conn| {
        if !remove_reservation(conn, book_id, member_id)? {
            return Err(LibraryError::ReservationNotFound { book_id, member_id });
        }
        info!(book_id, member_id, "reservation cancelled");
        Ok(())
    })
}
