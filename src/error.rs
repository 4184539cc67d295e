//! Error types shared by the persistence layer and the workflow.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the durable medium. These abort the current operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not locate a home directory for the default database path")]
    NoHomeDir,
    #[error("failed to create data directory {path}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open record store at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("database error")]
    Sqlite(#[from] rusqlite::Error),
    #[error("collection `{collection}` does not hold valid JSON records")]
    Corrupt {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode collection `{collection}`")]
    Encode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification used by callers that only care about the outcome
/// category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidState,
    Storage,
}

/// Everything a catalog, directory, or workflow operation can report.
///
/// All variants except [`LibraryError::Storage`] are expected outcomes: they
/// leave every collection untouched and the caller may keep going.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Book {0} not found.")]
    BookNotFound(i64),
    #[error("Member {0} not found.")]
    MemberNotFound(i64),
    #[error("No reservation of book {book_id} for member {member_id}.")]
    ReservationNotFound { book_id: i64, member_id: i64 },
    #[error("Member {member_id} already has a reservation for book {book_id}.")]
    AlreadyReserved { book_id: i64, member_id: i64 },
    #[error("Book {0} is not available for borrowing.")]
    BookUnavailable(i64),
    #[error("Member {member_id} has already borrowed book {book_id}.")]
    AlreadyBorrowed { book_id: i64, member_id: i64 },
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl LibraryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BookNotFound(_) | Self::MemberNotFound(_) | Self::ReservationNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::AlreadyReserved { .. } => ErrorKind::AlreadyExists,
            Self::BookUnavailable(_) | Self::AlreadyBorrowed { .. } => ErrorKind::InvalidState,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// False only for storage failures.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Storage
    }
}

impl From<rusqlite::Error> for LibraryError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StoreError::Sqlite(err))
    }
}

pub type Result<T, E = LibraryError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_storage_errors_are_fatal() {
        assert!(LibraryError::BookNotFound(1).is_recoverable());
        assert!(LibraryError::AlreadyReserved { book_id: 1, member_id: 2 }.is_recoverable());
        assert!(LibraryError::BookUnavailable(1).is_recoverable());

        let storage = LibraryError::from(StoreError::NoHomeDir);
        assert_eq!(storage.kind(), ErrorKind::Storage);
        assert!(!storage.is_recoverable());
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            LibraryError::ReservationNotFound { book_id: 1, member_id: 1 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LibraryError::AlreadyBorrowed { book_id: 1, member_id: 1 }.kind(),
            ErrorKind::InvalidState
        );
    }
}
