//! # Reservation Client
//!
//! The caller-facing half of the reservation actor.

use super::message::{ReservationMessage, ReservationRequest};
use super::record::HoldTable;
use crate::error::LibraryError;
use crate::model::{BookId, MemberId};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, instrument};

/// A type-safe client for interacting with a [`ReservationActor`](super::ReservationActor).
///
/// * **Cloneable**: holds a sender and a handle to the hold table.
/// * **Bounded waits**: every call that goes through the mailbox gives up
///   after `submit_timeout`.
#[derive(Debug, Clone)]
pub struct ReservationClient {
    sender: mpsc::Sender<ReservationMessage>,
    holds: HoldTable,
    submit_timeout: Duration,
}

impl ReservationClient {
    pub fn new(
        sender: mpsc::Sender<ReservationMessage>,
        holds: HoldTable,
        submit_timeout: Duration,
    ) -> Self {
        Self {
            sender,
            holds,
            submit_timeout,
        }
    }

    /// Enqueue a request without waiting for its outcome.
    ///
    /// A full mailbox is waited on for at most `submit_timeout`, then the
    /// request is dropped and [`LibraryError::Timeout`] returned.
    pub async fn submit(&self, request: ReservationRequest) -> Result<(), LibraryError> {
        self.enqueue(ReservationMessage::Reserve(request), self.submit_timeout)
            .await
    }

    /// Ask the actor to hold `book_id` for `member_id` and wait for the outcome.
    ///
    /// The deadline covers both enqueueing and the reply. A `Timeout` is an
    /// unknown outcome: once enqueued, the request is not withdrawn and may
    /// still place a hold.
    #[instrument(skip(self))]
    pub async fn reserve(&self, book_id: BookId, member_id: MemberId) -> Result<(), LibraryError> {
        debug!("Sending request");
        let deadline = Instant::now() + self.submit_timeout;
        let (request, response) = ReservationRequest::new(book_id, member_id);
        self.submit(request).await?;

        match timeout_at(deadline, response).await {
            Ok(reply) => reply.map_err(|_| LibraryError::ActorDropped)?,
            Err(_) => Err(LibraryError::Timeout),
        }
    }

    /// Whether a hold record currently exists for `book_id`.
    ///
    /// Reads the table under its lock without going through the mailbox, so it
    /// never waits behind queued requests.
    pub async fn has_live_hold(&self, book_id: BookId) -> bool {
        self.holds.contains(book_id).await
    }

    /// The member `book_id` is held for, if any.
    pub async fn holder(&self, book_id: BookId) -> Option<MemberId> {
        self.holds.holder(book_id).await
    }

    /// Stop the actor and wait until it has released every pending hold.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), LibraryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.enqueue(ReservationMessage::Shutdown { respond_to }, self.submit_timeout)
            .await?;
        response.await.map_err(|_| LibraryError::ActorDropped)
    }

    async fn enqueue(&self, msg: ReservationMessage, wait: Duration) -> Result<(), LibraryError> {
        self.sender.send_timeout(msg, wait).await.map_err(|e| match e {
            mpsc::error::SendTimeoutError::Timeout(_) => LibraryError::Timeout,
            mpsc::error::SendTimeoutError::Closed(_) => LibraryError::ActorClosed,
        })
    }
}
