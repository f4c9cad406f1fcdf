//! Error types for the library and its reservation actor.

use thiserror::Error;

/// Errors that can occur during library and reservation operations.
///
/// Callback failures raised by the store while the actor places a hold are
/// forwarded to the requester unchanged, so the same enum covers both sides.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LibraryError {
    /// The requested book or member does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The book is held, borrowed or otherwise not in the required state.
    #[error("{0}")]
    Conflict(String),

    /// No reply arrived before the submit deadline.
    ///
    /// The outcome is unknown: the request may still be processed.
    #[error("reservation request timeout")]
    Timeout,

    /// The reservation actor is no longer accepting requests.
    #[error("Actor closed")]
    ActorClosed,

    /// The reservation actor dropped the response channel.
    #[error("Actor dropped response channel")]
    ActorDropped,
}

impl LibraryError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, LibraryError::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LibraryError::NotFound(_))
    }
}
