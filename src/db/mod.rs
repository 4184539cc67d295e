//! Persistence module split across logical submodules.

mod books;
mod borrows;
mod connection;
mod members;
mod reservations;
mod store;

pub use books::{
    create_book, delete_book, fetch_available_books, fetch_book, fetch_books, search_books,
    update_book,
};
pub(crate) use books::set_availability;
pub use borrows::{fetch_borrows, fetch_borrows_for_member};
pub(crate) use borrows::{add_borrow, remove_borrows_for_book};
pub use connection::{ensure_schema, open_store};
pub use members::{create_member, delete_member, fetch_member, fetch_members, update_member};
pub use reservations::{fetch_reservations, fetch_reservations_for_book, has_reservation};
pub(crate) use reservations::{add_reservation, remove_reservation};
pub use store::{allocate_id, atomically, load_collection, save_collection, Collection};
