//! # Reservation Actor
//!
//! Serializes "reserve a book" requests, enforces a time-bounded hold and
//! races a delayed borrow attempt against the hold's expiry.
//!
//! ## Structure
//!
//! - [`actor`] - [`ReservationActor`], the mailbox loop and the expiry/borrow tasks
//! - [`client`] - [`ReservationClient`], the caller-facing handle
//! - [`ledger`] - [`ReservationLedger`], the store callbacks the actor writes through
//! - [`message`] - [`ReservationRequest`] and the mailbox message enum
//! - [`record`] - [`HoldTable`], the lock-guarded reservation table
//! - [`mock`] - test doubles for the ledger and the mailbox
//!
//! ## Per-book lifecycle
//!
//! ```text
//! NoHold --reserve--> Held --borrow attempt wins--> Borrowed
//!                       \
//!                        --expiry wins--> Expired (book back to Available)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use library_reservations::config::ReservationConfig;
//! use library_reservations::model::{BookId, MemberId};
//! use library_reservations::reservation::{self, mock::MockLedger};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = reservation::new(&ReservationConfig::default());
//!     tokio::spawn(actor.run(Arc::new(MockLedger::new())));
//!
//!     client.reserve(BookId(42), MemberId(7)).await?;
//!     assert!(client.has_live_hold(BookId(42)).await);
//!
//!     client.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod client;
pub mod ledger;
pub mod message;
pub mod mock;
pub mod record;

pub use actor::ReservationActor;
pub use client::ReservationClient;
pub use ledger::ReservationLedger;
pub use message::{ReservationMessage, ReservationRequest, Response};
pub use record::HoldTable;

use crate::config::ReservationConfig;

/// Creates a new Reservation actor and its client.
pub fn new(config: &ReservationConfig) -> (ReservationActor, ReservationClient) {
    ReservationActor::new(config)
}
