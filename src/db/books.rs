use rusqlite::Connection;
use tracing::info;

use crate::error::{LibraryError, Result};
use crate::models::{Book, BookPatch};

use super::store::{allocate_id, atomically, load_collection, save_collection, Collection};

/// Every book in insertion order.
pub fn fetch_books(conn: &Connection) -> Result<Vec<Book>> {
    Ok(load_collection(conn, Collection::Books)?)
}

/// Look up one book, reporting [`LibraryError::BookNotFound`] when absent.
pub fn fetch_book(conn: &Connection, id: i64) -> Result<Book> {
    fetch_books(conn)?
        .into_iter()
        .find(|book| book.id == id)
        .ok_or(LibraryError::BookNotFound(id))
}

/// Books whose title contains `keyword`, ignoring case.
pub fn search_books(conn: &Connection, keyword: &str) -> Result<Vec<Book>> {
    let needle = keyword.to_lowercase();
    Ok(fetch_books(conn)?
        .into_iter()
        .filter(|book| book.title.to_lowercase().contains(&needle))
        .collect())
}

pub fn fetch_available_books(conn: &Connection) -> Result<Vec<Book>> {
    Ok(fetch_books(conn)?
        .into_iter()
        .filter(|book| book.available)
        .collect())
}

/// Append a new book with a freshly allocated id and return it.
pub fn create_book(
    conn: &Connection,
    title: &str,
    author: &str,
    available: bool,
) -> Result<Book> {
    atomically(conn, |conn| {
        let mut books = fetch_books(conn)?;
        let book = Book {
            id: allocate_id(conn, Collection::Books)?,
            title: title.to_string(),
            author: author.to_string(),
            available,
        };
        books.push(book.clone());
        save_collection(conn, Collection::Books, &books)?;
        info!(book_id = book.id, title = %book.title, "book created");
        Ok(book)
    })
}

/// Merge `patch` into the stored book and return the updated record.
pub fn update_book(conn: &Connection, id: i64, patch: BookPatch) -> Result<Book> {
    atomically(conn, |conn| {
        let mut books = fetch_books(conn)?;
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(LibraryError::BookNotFound(id))?;
        patch.apply(book);
        let updated = book.clone();
        save_collection(conn, Collection::Books, &books)?;
        info!(book_id = id, "book updated");
        Ok(updated)
    })
}

/// Remove a book. Borrows and reservations naming it are left in place.
/// Returns whether a record was removed; a missing id is not an error.
pub fn delete_book(conn: &Connection, id: i64) -> Result<bool> {
    atomically(conn, |conn| {
        let mut books = fetch_books(conn)?;
        let before = books.len();
        books.retain(|book| book.id != id);
        if books.len() == before {
            return Ok(false);
        }
        save_collection(conn, Collection::Books, &books)?;
        info!(book_id = id, "book deleted");
        Ok(true)
    })
}

/// Overwrite the availability flag without touching other fields. Used by the
/// workflow, which owns the borrow/availability pairing.
pub(crate) fn set_availability(
    conn: &Connection,
    id: i64,
    available: bool,
) -> Result<Book> {
    update_book(
        conn,
        id,
        BookPatch {
            available: Some(available),
            ..BookPatch::default()
        },
    )
}
