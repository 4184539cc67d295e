use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "library-records",
    about = "Books, members, borrows, and reservation queues in one local store",
    version
)]
pub struct Cli {
    /// Path to the SQLite store (default: ~/.library-records/library.sqlite)
    #[arg(long, global = true, env = "LIBRARY_RECORDS_DB")]
    pub db: Option<PathBuf>,

    /// Use a throwaway in-memory store; takes precedence over --db
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// Accept member ids without checking they exist
    #[arg(long, global = true)]
    pub no_member_check: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage book records
    #[command(subcommand)]
    Book(BookCommands),

    /// Manage member profiles
    #[command(subcommand)]
    Member(MemberCommands),

    /// Borrow a book, or queue for it when it is out
    Request {
        book_id: i64,
        member_id: i64,

        /// Join the reservation queue if the book is unavailable
        #[arg(long)]
        reserve: bool,
    },

    /// Queue a reservation directly
    Reserve { book_id: i64, member_id: i64 },

    /// Receive a returned book
    Return { book_id: i64 },

    /// Turn a reservation into a borrow once the book is back
    Convert { book_id: i64, member_id: i64 },

    /// Cancel a reservation
    Cancel { book_id: i64, member_id: i64 },

    /// Read-only views
    #[command(subcommand)]
    Report(ReportCommands),
}

#[derive(Debug, Subcommand)]
pub enum BookCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// Register the book as already out
        #[arg(long)]
        unavailable: bool,
    },
    Show {
        id: i64,
    },
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        available: Option<bool>,
    },
    Delete {
        id: i64,
    },
    List {
        /// Only books on the shelf
        #[arg(long)]
        available: bool,
    },
    /// Case-insensitive title search
    Search {
        keyword: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum MemberCommands {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    Show {
        id: i64,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Delete {
        id: i64,
    },
    List,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommands {
    /// Active borrows, optionally for one member
    Borrowed {
        #[arg(long)]
        member: Option<i64>,
    },
    /// Every reservation with its book
    Reservations,
    /// The reservation queue of one book
    Queue { book_id: i64 },
    /// Book counts by availability
    Summary,
    /// Cross-collection consistency check
    Integrity,
}
