//! Library record store: books, members, active borrows, and reservation
//! queues kept in four JSON collections inside one SQLite file.
//!
//! The persistence layer (`db`) loads and saves whole collections. The
//! `workflow` module strings those calls together for borrowing, returning,
//! and reserving, wrapping each operation in one transaction so the
//! availability flags and the borrow ledger never drift apart. `reports` holds
//! the read-only views a front end needs, and [`Library`] bundles it all behind
//! one handle. The `cli` module is the thin command-line shell the binary runs.
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod library;
pub mod models;
pub mod reports;
pub mod workflow;

/// Store location and workflow knobs.
pub use config::{StoreConfig, StoreLocation, WorkflowPolicy};

pub use error::{ErrorKind, LibraryError, StoreError};

/// The single entry point most callers need.
pub use library::Library;

/// The four record types plus their partial-update companions.
pub use models::{Book, BookPatch, Borrow, Member, MemberPatch, Reservation};

pub use reports::{BorrowDetail, IntegrityIssue, QueueEntry, ReservationDetail, Summary};
pub use workflow::{
    Conversion, IntegrityWarning, RequestOutcome, ReservationIntent, ReturnReceipt,
};
