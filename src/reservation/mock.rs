//! # Mock Ledger & Testing Helpers
//!
//! Utilities for testing the reservation actor and its callers in isolation.
//!
//! ## When to use what
//!
//! | Helper | Replaces | Use Case |
//! |--------|----------|----------|
//! | [`MockLedger`] | the [`Library`](crate::store::Library) store | Driving a real actor and asserting which callbacks it made |
//! | [`create_mock_client`] | the actor | Testing code that talks to a [`ReservationClient`] |
//!
//! ## Error Injection
//!
//! Failures that are awkward to provoke against a real store (a status update
//! rejected mid-request, a borrow that keeps failing) are one builder call
//! away:
//!
//! ```rust
//! use library_reservations::error::LibraryError;
//! use library_reservations::reservation::mock::MockLedger;
//!
//! let ledger = MockLedger::new()
//!     .with_borrow_error(LibraryError::NotFound("member_7".into()));
//! ```

use super::ledger::ReservationLedger;
use super::message::{ReservationMessage, ReservationRequest};
use super::record::HoldTable;
use super::ReservationClient;
use crate::error::LibraryError;
use crate::model::{BookId, BookStatus, MemberId};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// A callback observed by [`MockLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerCall {
    UpdateStatus(BookId, BookStatus),
    FinalizeBorrow(BookId, MemberId),
}

/// An in-memory [`ReservationLedger`] that records every call.
///
/// Calls succeed unless an error was configured with
/// [`with_status_error`](MockLedger::with_status_error) or
/// [`with_borrow_error`](MockLedger::with_borrow_error).
#[derive(Debug, Default)]
pub struct MockLedger {
    calls: Mutex<Vec<LedgerCall>>,
    status_error: Option<LibraryError>,
    borrow_error: Option<LibraryError>,
    borrow_latency: Option<Duration>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `update_book_status` call fail with `error`.
    pub fn with_status_error(mut self, error: LibraryError) -> Self {
        self.status_error = Some(error);
        self
    }

    /// Make every `finalize_borrow` call fail with `error`.
    pub fn with_borrow_error(mut self, error: LibraryError) -> Self {
        self.borrow_error = Some(error);
        self
    }

    /// Make every `finalize_borrow` call take `latency` before it answers.
    ///
    /// The actor holds its table lock across the call, so this keeps the hold
    /// table locked for that long.
    pub fn with_borrow_latency(mut self, latency: Duration) -> Self {
        self.borrow_latency = Some(latency);
        self
    }

    /// All calls observed so far, in order.
    pub async fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().await.clone()
    }

    /// The last status written for `book_id`, if any.
    pub async fn last_status(&self, book_id: BookId) -> Option<BookStatus> {
        self.calls
            .lock()
            .await
            .iter()
            .rev()
            .find_map(|call| match call {
                LedgerCall::UpdateStatus(id, status) if *id == book_id => Some(*status),
                _ => None,
            })
    }

    /// Number of `finalize_borrow` calls observed for `book_id`.
    pub async fn borrow_attempts(&self, book_id: BookId) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, LedgerCall::FinalizeBorrow(id, _) if *id == book_id))
            .count()
    }
}

#[async_trait]
impl ReservationLedger for MockLedger {
    async fn update_book_status(
        &self,
        book_id: BookId,
        status: BookStatus,
    ) -> Result<(), LibraryError> {
        self.calls
            .lock()
            .await
            .push(LedgerCall::UpdateStatus(book_id, status));
        match &self.status_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn finalize_borrow(
        &self,
        book_id: BookId,
        member_id: MemberId,
    ) -> Result<(), LibraryError> {
        self.calls
            .lock()
            .await
            .push(LedgerCall::FinalizeBorrow(book_id, member_id));
        if let Some(latency) = self.borrow_latency {
            tokio::time::sleep(latency).await;
        }
        match &self.borrow_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Creates a client whose mailbox is a receiver the test controls.
///
/// # Testing Strategy
/// Code built on [`ReservationClient`] (the store's `reserve`, timeouts, full
/// mailboxes) can be tested without a running actor: read requests off the
/// receiver with [`expect_reserve`] and answer them, or never answer to
/// provoke a timeout.
pub fn create_mock_client(
    buffer_size: usize,
    submit_timeout: Duration,
) -> (ReservationClient, mpsc::Receiver<ReservationMessage>, HoldTable) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let holds = HoldTable::new();
    let client = ReservationClient::new(sender, holds.clone(), submit_timeout);
    (client, receiver, holds)
}

/// Helper to verify that the next message is a Reserve request
pub async fn expect_reserve(
    receiver: &mut mpsc::Receiver<ReservationMessage>,
) -> Option<ReservationRequest> {
    match receiver.recv().await {
        Some(ReservationMessage::Reserve(request)) => Some(request),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reserve_returns_actor_reply() {
        let (client, mut receiver, _holds) = create_mock_client(10, Duration::from_secs(5));

        let reserve_task = tokio::spawn(async move { client.reserve(BookId(1), MemberId(2)).await });

        let request = expect_reserve(&mut receiver)
            .await
            .expect("Expected Reserve request");
        assert_eq!(request.book_id, BookId(1));
        assert_eq!(request.member_id, MemberId(2));
        request
            .respond_to
            .send(Err(LibraryError::Conflict("book_1 is already reserved".into())))
            .unwrap();

        let result = reserve_task.await.unwrap();
        assert!(matches!(result, Err(LibraryError::Conflict(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reserve_times_out_without_reply() {
        let (client, mut receiver, _holds) = create_mock_client(10, Duration::from_secs(5));

        let reserve_task = tokio::spawn(async move { client.reserve(BookId(1), MemberId(2)).await });

        // Take the request but never answer it.
        let _request = expect_reserve(&mut receiver).await.unwrap();

        let result = reserve_task.await.unwrap();
        assert_eq!(result, Err(LibraryError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_mailbox_fails_fast() {
        let (client, _receiver, _holds) = create_mock_client(1, Duration::from_millis(50));

        let (first, _first_response) = ReservationRequest::new(BookId(1), MemberId(1));
        client.submit(first).await.unwrap();

        let (second, _second_response) = ReservationRequest::new(BookId(2), MemberId(1));
        assert_eq!(client.submit(second).await, Err(LibraryError::Timeout));
    }

    #[tokio::test]
    async fn test_closed_mailbox() {
        let (client, receiver, _holds) = create_mock_client(1, Duration::from_secs(1));
        drop(receiver);

        let result = client.reserve(BookId(1), MemberId(1)).await;
        assert_eq!(result, Err(LibraryError::ActorClosed));
    }

    #[tokio::test]
    async fn test_mock_ledger_records_and_injects() {
        let ledger = MockLedger::new().with_borrow_error(LibraryError::NotFound("member_9".into()));

        ledger
            .update_book_status(BookId(3), BookStatus::Reserved)
            .await
            .unwrap();
        let borrowed = ledger.finalize_borrow(BookId(3), MemberId(9)).await;

        assert_eq!(borrowed, Err(LibraryError::NotFound("member_9".into())));
        assert_eq!(
            ledger.calls().await,
            vec![
                LedgerCall::UpdateStatus(BookId(3), BookStatus::Reserved),
                LedgerCall::FinalizeBorrow(BookId(3), MemberId(9)),
            ]
        );
        assert_eq!(ledger.last_status(BookId(3)).await, Some(BookStatus::Reserved));
        assert_eq!(ledger.borrow_attempts(BookId(3)).await, 1);
    }
}
