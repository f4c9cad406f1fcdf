//! # ReservationLedger Trait
//!
//! The narrow surface the reservation actor writes through. The actor never
//! touches book or member records itself; it asks the ledger to flip a book's
//! visible status and to finalize a borrow. [`Library`](crate::store::Library)
//! is the production implementation and [`MockLedger`](super::mock::MockLedger)
//! the test double.

use crate::error::LibraryError;
use crate::model::{BookId, BookStatus, MemberId};
use async_trait::async_trait;

/// Callbacks the reservation actor needs from the store.
///
/// # Context Injection
/// The ledger is handed to [`ReservationActor::run`](super::ReservationActor::run)
/// rather than to the constructor. The store owns the actor's client, so the
/// actor can only receive the store once both halves exist.
///
/// # Locking
/// Implementations must not call back into the actor while holding their own
/// locks. The actor holds its hold-table lock while invoking these methods.
#[async_trait]
pub trait ReservationLedger: Send + Sync + 'static {
    /// Set the visible status of a book.
    ///
    /// Fails with [`LibraryError::NotFound`] if the book does not exist.
    async fn update_book_status(
        &self,
        book_id: BookId,
        status: BookStatus,
    ) -> Result<(), LibraryError>;

    /// Complete a borrow on behalf of a hold.
    ///
    /// Fails with [`LibraryError::NotFound`] for a missing book or member and
    /// [`LibraryError::Conflict`] if the book is already borrowed.
    async fn finalize_borrow(&self, book_id: BookId, member_id: MemberId)
        -> Result<(), LibraryError>;
}
