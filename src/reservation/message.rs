//! # Mailbox Messages
//!
//! The message types sent from [`ReservationClient`](super::ReservationClient)
//! to [`ReservationActor`](super::ReservationActor).

use crate::error::LibraryError;
use crate::model::{BookId, MemberId};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, LibraryError>>;

/// A request to hold `book_id` for `member_id`.
///
/// `respond_to` is used exactly once. If the requester has already given up
/// (timed out), the reply is silently discarded.
#[derive(Debug)]
pub struct ReservationRequest {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub respond_to: Response<()>,
}

impl ReservationRequest {
    /// Creates a request and the receiver its outcome will arrive on.
    pub fn new(
        book_id: BookId,
        member_id: MemberId,
    ) -> (Self, oneshot::Receiver<Result<(), LibraryError>>) {
        let (respond_to, response) = oneshot::channel();
        let request = Self {
            book_id,
            member_id,
            respond_to,
        };
        (request, response)
    }
}

/// Everything the actor's mailbox can carry.
#[derive(Debug)]
pub enum ReservationMessage {
    Reserve(ReservationRequest),
    /// Stop the loop, release every pending hold and acknowledge.
    ///
    /// Needed because the store keeps a client while the actor keeps the
    /// store, so the channel never closes on its own.
    Shutdown { respond_to: oneshot::Sender<()> },
}
