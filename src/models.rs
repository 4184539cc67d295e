//! Domain records stored in the four collections. These types are plain data
//! holders: the field names double as the persisted JSON keys, so renaming a
//! field here changes the on-disk format.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A catalogued book. `available` is false exactly while a borrow for this
/// book sits in the ledger.
pub struct Book {
    /// Identifier handed out by the catalog's id counter. Never reused.
    pub id: i64,
    /// Title shown in listings and matched by keyword search.
    pub title: String,
    pub author: String,
    /// Whether the book can be borrowed right now.
    pub available: bool,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A registered library member.
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// An active loan. At most one exists per book.
pub struct Borrow {
    pub book_id: i64,
    pub member_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// A queued request for an unavailable book. The position in the
/// reservations collection is the queue priority.
pub struct Reservation {
    pub book_id: i64,
    pub member_id: i64,
}

impl Reservation {
    /// True when this reservation belongs to the given (book, member) pair.
    pub fn matches(&self, book_id: i64, member_id: i64) -> bool {
        self.book_id == book_id && self.member_id == member_id
    }
}

impl Borrow {
    pub fn matches(&self, book_id: i64, member_id: i64) -> bool {
        self.book_id == book_id && self.member_id == member_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Partial update for a book. `None` leaves the stored value untouched.
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub available: Option<bool>,
}

impl BookPatch {
    /// Merge the supplied fields into `book`.
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(available) = self.available {
            book.available = available;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Partial update for a member profile.
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl MemberPatch {
    pub fn apply(self, member: &mut Member) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(email) = self.email {
            member.email = email;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_serializes_with_exact_field_names() {
        let book = Book {
            id: 7,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            available: true,
        };
        let value = serde_json::to_value(&book).expect("book should serialize");
        assert_eq!(
            value,
            serde_json::json!({"id": 7, "title": "Dune", "author": "Herbert", "available": true})
        );
    }

    #[test]
    fn reservation_reads_reference_layout() {
        let parsed: Vec<Reservation> =
            serde_json::from_str(r#"[{"book_id": 1, "member_id": 2}]"#).expect("valid json");
        assert_eq!(parsed, vec![Reservation { book_id: 1, member_id: 2 }]);
    }

    #[test]
    fn book_patch_only_touches_supplied_fields() {
        let mut book = Book {
            id: 1,
            title: "Old".to_string(),
            author: "Someone".to_string(),
            available: true,
        };
        BookPatch {
            title: Some("New".to_string()),
            ..BookPatch::default()
        }
        .apply(&mut book);

        assert_eq!(book.title, "New");
        assert_eq!(book.author, "Someone");
        assert!(book.available);
    }

    #[test]
    fn member_patch_replaces_email() {
        let mut member = Member {
            id: 3,
            name: "Ada".to_string(),
            email: "ada@old.example".to_string(),
        };
        MemberPatch {
            email: Some("ada@new.example".to_string()),
            ..MemberPatch::default()
        }
        .apply(&mut member);

        assert_eq!(member.name, "Ada");
        assert_eq!(member.email, "ada@new.example");
    }
}
