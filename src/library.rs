use rusqlite::Connection;

use crate::config::{StoreConfig, WorkflowPolicy};
use crate::db;
use crate::error::{Result, StoreError};
use crate::models::{Book, BookPatch, Borrow, Member, MemberPatch, Reservation};
use crate::reports::{self, BorrowDetail, IntegrityIssue, QueueEntry, ReservationDetail, Summary};
use crate::workflow::{
    self, Conversion, RequestOutcome, ReservationIntent, ReturnReceipt,
};

/// An open record store plus the workflow policy applied to it. Every method
/// reads the collections it needs straight from the database.
#[derive(Debug)]
pub struct Library {
    conn: Connection,
    policy: WorkflowPolicy,
}

impl Library {
    pub fn open(config: &StoreConfig, policy: WorkflowPolicy) -> Result<Self, StoreError> {
        Ok(Self {
            conn: db::open_store(config)?,
            policy,
        })
    }

    /// Fresh in-memory store with the default policy.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(&StoreConfig::in_memory(), WorkflowPolicy::default())
    }

    pub fn policy(&self) -> WorkflowPolicy {
        self.policy
    }

    /// Raw access for callers that need collection-level load/save.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn create_book(&self, title: &str, author: &str, available: bool) -> Result<Book> {
        db::create_book(&self.conn, title, author, available)
    }

    pub fn book(&self, id: i64) -> Result<Book> {
        db::fetch_book(&self.conn, id)
    }

    pub fn update_book(&self, id: i64, patch: BookPatch) -> Result<Book> {
        db::update_book(&self.conn, id, patch)
    }

    pub fn delete_book(&self, id: i64) -> Result<bool> {
        db::delete_book(&self.conn, id)
    }

    pub fn books(&self) -> Result<Vec<Book>> {
        db::fetch_books(&self.conn)
    }

    pub fn search_books(&self, keyword: &str) -> Result<Vec<Book>> {
        db::search_books(&self.conn, keyword)
    }

    pub fn available_books(&self) -> Result<Vec<Book>> {
        db::fetch_available_books(&self.conn)
    }

    pub fn create_member(&self, name: &str, email: &str) -> Result<Member> {
        db::create_member(&self.conn, name, email)
    }

    pub fn member(&self, id: i64) -> Result<Member> {
        db::fetch_member(&self.conn, id)
    }

    pub fn update_member(&self, id: i64, patch: MemberPatch) -> Result<Member> {
        db::update_member(&self.conn, id, patch)
    }

    pub fn delete_member(&self, id: i64) -> Result<bool> {
        db::delete_member(&self.conn, id)
    }

    pub fn members(&self) -> Result<Vec<Member>> {
        db::fetch_members(&self.conn)
    }

    pub fn borrows(&self) -> Result<Vec<Borrow>> {
        db::fetch_borrows(&self.conn)
    }

    pub fn reservations(&self) -> Result<Vec<Reservation>> {
        db::fetch_reservations(&self.conn)
    }

    /// Queue for one book, in priority order.
    pub fn reservations_for_book(&self, book_id: i64) -> Result<Vec<Reservation>> {
        db::fetch_reservations_for_book(&self.conn, book_id)
    }

    pub fn request_book(
        &self,
        book_id: i64,
        member_id: i64,
        intent: ReservationIntent,
    ) -> Result<RequestOutcome> {
        workflow::request_book(&self.conn, self.policy, book_id, member_id, intent)
    }

    pub fn make_reservation(&self, book_id: i64, member_id: i64) -> Result<Reservation> {
        workflow::make_reservation(&self.conn, self.policy, book_id, member_id)
    }

    pub fn receive_return(&self, book_id: i64) -> Result<ReturnReceipt> {
        workflow::receive_return(&self.conn, book_id)
    }

    pub fn convert_reservation_to_borrow(&self, book_id: i64, member_id: i64) -> Result<Conversion> {
        workflow::convert_reservation_to_borrow(&self.conn, self.policy, book_id, member_id)
    }

    pub fn delete_reservation(&self, book_id: i64, member_id: i64) -> Result<()> {
        workflow::delete_reservation(&self.conn, book_id, member_id)
    }

    pub fn summary(&self) -> Result<Summary> {
        reports::summary(&self.conn)
    }

    pub fn borrowed_by_member(&self, member_id: i64) -> Result<Vec<Book>> {
        reports::borrowed_by_member(&self.conn, member_id)
    }

    pub fn borrowed_books(&self) -> Result<Vec<BorrowDetail>> {
        reports::borrowed_books(&self.conn)
    }

    pub fn reservations_with_books(&self) -> Result<Vec<ReservationDetail>> {
        reports::reservations_with_books(&self.conn)
    }

    pub fn reservation_queue(&self, book_id: i64) -> Result<Vec<QueueEntry>> {
        reports::reservation_queue(&self.conn, book_id)
    }

    pub fn integrity_report(&self) -> Result<Vec<IntegrityIssue>> {
        reports::integrity_report(&self.conn)
    }
}
