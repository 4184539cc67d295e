//! Non-interactive command-line shell over [`Library`]. Arguments are parsed
//! and validated by clap before any core call; every answer the core needs
//! (such as whether to queue for an unavailable book) arrives as a flag.

mod args;
mod render;

use anyhow::{Context, Result};

use crate::config::{StoreConfig, WorkflowPolicy};
use crate::error::LibraryError;
use crate::library::Library;
use crate::models::{BookPatch, MemberPatch};
use crate::workflow::ReservationIntent;

pub use args::{BookCommands, Cli, Commands, MemberCommands, ReportCommands};

/// Open the configured store and execute one command, printing its result.
pub fn run(cli: Cli) -> Result<()> {
    let config = if cli.in_memory {
        StoreConfig::in_memory()
    } else if let Some(path) = cli.db {
        StoreConfig::file(path)
    } else {
        StoreConfig::from_env().context("failed to resolve the default store path")?
    };
    let policy = WorkflowPolicy {
        validate_member: !cli.no_member_check,
    };

    let library = Library::open(&config, policy).context("failed to open the record store")?;
    println!("{}", execute(&library, cli.command)?);
    Ok(())
}

/// Map a core result onto shell output. Recoverable outcomes become a
/// message; storage failures abort the command.
fn reported<T>(
    result: Result<T, LibraryError>,
    render: impl FnOnce(T) -> String,
) -> Result<String> {
    match result {
        Ok(value) => Ok(render(value)),
        Err(err) if err.is_recoverable() => Ok(err.to_string()),
        Err(err) => Err(err).context("record store operation failed"),
    }
}

fn execute(library: &Library, command: Commands) -> Result<String> {
    match command {
        Commands::Book(command) => book_command(library, command),
        Commands::Member(command) => member_command(library, command),
        Commands::Request {
            book_id,
            member_id,
            reserve,
        } => {
            let intent = if reserve {
                ReservationIntent::Reserve
            } else {
                ReservationIntent::Decline
            };
            reported(library.request_book(book_id, member_id, intent), |outcome| {
                render::request_outcome(&outcome)
            })
        }
        Commands::Reserve { book_id, member_id } => {
            reported(library.make_reservation(book_id, member_id), |_| {
                "Reservation made successfully.".to_string()
            })
        }
        Commands::Return { book_id } => reported(library.receive_return(book_id), |receipt| {
            render::return_receipt(&receipt)
        }),
        Commands::Convert { book_id, member_id } => reported(
            library.convert_reservation_to_borrow(book_id, member_id),
            |conversion| render::conversion(&conversion),
        ),
        Commands::Cancel { book_id, member_id } => {
            reported(library.delete_reservation(book_id, member_id), |()| {
                "Reservation deleted successfully.".to_string()
            })
        }
        Commands::Report(command) => report_command(library, command),
    }
}

fn book_command(library: &Library, command: BookCommands) -> Result<String> {
    match command {
        BookCommands::Add {
            title,
            author,
            unavailable,
        } => reported(library.create_book(&title, &author, !unavailable), |book| {
            format!("Book created successfully with ID {}.", book.id)
        }),
        BookCommands::Show { id } => reported(library.book(id), |book| render::book_detail(&book)),
        BookCommands::Update {
            id,
            title,
            author,
            available,
        } => {
            let patch = BookPatch {
                title,
                author,
                available,
            };
            reported(library.update_book(id, patch), |_| {
                "Book updated successfully.".to_string()
            })
        }
        BookCommands::Delete { id } => reported(library.delete_book(id), |removed| {
            if removed {
                "Book deleted successfully.".to_string()
            } else {
                "Book not found.".to_string()
            }
        }),
        BookCommands::List { available: true } => reported(library.available_books(), |books| {
            render::book_table("Available Books", &books)
        }),
        BookCommands::List { available: false } => {
            reported(library.books(), |books| render::book_table("All Books", &books))
        }
        BookCommands::Search { keyword } => reported(library.search_books(&keyword), |books| {
            render::book_table("Found Books", &books)
        }),
    }
}

fn member_command(library: &Library, command: MemberCommands) -> Result<String> {
    match command {
        MemberCommands::Add { name, email } => {
            reported(library.create_member(&name, &email), |member| {
                format!("Member profile created successfully with ID {}.", member.id)
            })
        }
        MemberCommands::Show { id } => {
            reported(library.member(id), |member| render::member_detail(&member))
        }
        MemberCommands::Update { id, name, email } => {
            reported(library.update_member(id, MemberPatch { name, email }), |_| {
                "Member profile updated successfully.".to_string()
            })
        }
        MemberCommands::Delete { id } => reported(library.delete_member(id), |removed| {
            if removed {
                "Member profile deleted successfully.".to_string()
            } else {
                "Member not found.".to_string()
            }
        }),
        MemberCommands::List => reported(library.members(), |members| {
            render::member_table(&members)
        }),
    }
}

fn report_command(library: &Library, command: ReportCommands) -> Result<String> {
    match command {
        ReportCommands::Borrowed { member: Some(member_id) } => {
            reported(library.borrowed_by_member(member_id), |books| {
                render::book_table(&format!("Borrowed Books for Member ID {member_id}"), &books)
            })
        }
        ReportCommands::Borrowed { member: None } => {
            reported(library.borrowed_books(), |details| render::borrow_table(&details))
        }
        ReportCommands::Reservations => reported(library.reservations_with_books(), |details| {
            render::reservation_table(&details)
        }),
        ReportCommands::Queue { book_id } => {
            reported(library.reservation_queue(book_id), |queue| {
                render::queue_table(book_id, &queue)
            })
        }
        ReportCommands::Summary => {
            reported(library.summary(), |summary| render::summary(&summary))
        }
        ReportCommands::Integrity => reported(library.integrity_report(), |issues| {
            render::integrity_report(&issues)
        }),
    }
}
