//! Plain-text rendering of core results. Everything returns a `String` so the
//! shell decides where it goes.

use crate::models::{Book, Member};
use crate::reports::{BorrowDetail, IntegrityIssue, QueueEntry, ReservationDetail, Summary};
use crate::workflow::{Conversion, IntegrityWarning, RequestOutcome, ReturnReceipt};

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub(crate) fn book_table(heading: &str, books: &[Book]) -> String {
    if books.is_empty() {
        return "No books found.".to_string();
    }
    let mut lines = vec![
        format!("{heading}:"),
        format!("{:<5} {:<30} {:<20} {:<10}", "ID", "Title", "Author", "Available"),
    ];
    lines.extend(books.iter().map(|book| {
        format!(
            "{:<5} {:<30} {:<20} {:<10}",
            book.id,
            book.title,
            book.author,
            yes_no(book.available)
        )
    }));
    lines.join("\n")
}

pub(crate) fn book_detail(book: &Book) -> String {
    format!(
        "ID: {}, Title: {}, Author: {}, Available: {}",
        book.id,
        book.title,
        book.author,
        yes_no(book.available)
    )
}

pub(crate) fn member_table(members: &[Member]) -> String {
    if members.is_empty() {
        return "No members found.".to_string();
    }
    let mut lines = vec![
        "All Members:".to_string(),
        format!("{:<5} {:<20} {:<30}", "ID", "Name", "Email"),
    ];
    lines.extend(
        members
            .iter()
            .map(|member| format!("{:<5} {:<20} {:<30}", member.id, member.name, member.email)),
    );
    lines.join("\n")
}

pub(crate) fn member_detail(member: &Member) -> String {
    format!(
        "ID: {}\nName: {}\nEmail: {}",
        member.id, member.name, member.email
    )
}

pub(crate) fn borrow_table(details: &[BorrowDetail]) -> String {
    if details.is_empty() {
        return "No books are currently borrowed.".to_string();
    }
    let mut lines = vec![
        "Borrowed Books:".to_string(),
        format!(
            "{:<5} {:<30} {:<20} {:<15} {:<10}",
            "ID", "Title", "Author", "Member Name", "Member ID"
        ),
    ];
    for detail in details {
        let (title, author) = detail
            .book
            .as_ref()
            .map(|book| (book.title.as_str(), book.author.as_str()))
            .unwrap_or(("Not found", "Not found"));
        let name = detail
            .member
            .as_ref()
            .map(|member| member.name.as_str())
            .unwrap_or("Not found");
        lines.push(format!(
            "{:<5} {:<30} {:<20} {:<15} {:<10}",
            detail.borrow.book_id, title, author, name, detail.borrow.member_id
        ));
    }
    lines.join("\n")
}

pub(crate) fn reservation_table(details: &[ReservationDetail]) -> String {
    if details.is_empty() {
        return "No reservations found.".to_string();
    }
    let mut lines = vec![
        "All Reservations:".to_string(),
        format!(
            "{:<5} {:<30} {:<20} {:<10}",
            "Book", "Title", "Author", "Member ID"
        ),
    ];
    for detail in details {
        let (title, author) = detail
            .book
            .as_ref()
            .map(|book| (book.title.as_str(), book.author.as_str()))
            .unwrap_or(("Not found", "Not found"));
        lines.push(format!(
            "{:<5} {:<30} {:<20} {:<10}",
            detail.reservation.book_id, title, author, detail.reservation.member_id
        ));
    }
    lines.join("\n")
}

pub(crate) fn queue_table(book_id: i64, queue: &[QueueEntry]) -> String {
    if queue.is_empty() {
        return "No reservations found for this book.".to_string();
    }
    let mut lines = vec![
        format!("Reservation Queue for Book ID {book_id}:"),
        format!("{:<10} {:<20} {:<30}", "Member ID", "Name", "Email"),
    ];
    for entry in queue {
        let (name, email) = entry
            .member
            .as_ref()
            .map(|member| (member.name.as_str(), member.email.as_str()))
            .unwrap_or(("Not found", "Not found"));
        lines.push(format!(
            "{:<10} {:<20} {:<30}",
            entry.reservation.member_id, name, email
        ));
    }
    lines.join("\n")
}

pub(crate) fn summary(summary: &Summary) -> String {
    format!(
        "Book Summary:\nTotal Books: {}\nTotal Available Books: {}\nTotal Unavailable Books: {}",
        summary.total_books, summary.total_available, summary.total_unavailable
    )
}

pub(crate) fn request_outcome(outcome: &RequestOutcome) -> String {
    match outcome {
        RequestOutcome::Borrowed(_) => "Book borrowed successfully.".to_string(),
        RequestOutcome::Reserved(_) => "Reservation made successfully.".to_string(),
        RequestOutcome::AlreadyReserved(_) => "Reservation already made.".to_string(),
        RequestOutcome::Declined => {
            "Book is currently unavailable. No reservation made.".to_string()
        }
    }
}

fn integrity_warning(warning: &IntegrityWarning) -> String {
    match warning {
        IntegrityWarning::MultipleBorrowsRemoved { book_id, count } => {
            format!("Warning: {count} borrow records were on file for book {book_id}.")
        }
        IntegrityWarning::NoBorrowOnFile { book_id } => {
            format!("Warning: no borrow record was on file for book {book_id}.")
        }
    }
}

pub(crate) fn return_receipt(receipt: &ReturnReceipt) -> String {
    let mut lines = vec!["Book marked as returned successfully.".to_string()];
    lines.extend(receipt.warnings.iter().map(integrity_warning));
    lines.join("\n")
}

pub(crate) fn conversion(conversion: &Conversion) -> String {
    if conversion.reservation_removed {
        "Book borrowed successfully.".to_string()
    } else {
        "Book borrowed successfully (no reservation was queued).".to_string()
    }
}

pub(crate) fn integrity_report(issues: &[IntegrityIssue]) -> String {
    if issues.is_empty() {
        return "No integrity issues found.".to_string();
    }
    issues
        .iter()
        .map(|issue| match issue {
            IntegrityIssue::UnavailableWithoutBorrow { book_id } => {
                format!("Book {book_id} is marked unavailable but has no borrow.")
            }
            IntegrityIssue::AvailableWhileBorrowed { book_id } => {
                format!("Book {book_id} is marked available but is borrowed.")
            }
            IntegrityIssue::MultipleBorrows { book_id, count } => {
                format!("Book {book_id} has {count} active borrows.")
            }
            IntegrityIssue::DanglingBorrow { borrow } => format!(
                "Borrow of book {} by member {} references a deleted record.",
                borrow.book_id, borrow.member_id
            ),
            IntegrityIssue::DanglingReservation { reservation } => format!(
                "Reservation of book {} by member {} references a deleted record.",
                reservation.book_id, reservation.member_id
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
