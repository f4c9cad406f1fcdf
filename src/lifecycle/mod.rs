//! # System Lifecycle & Orchestration
//!
//! Starts, wires and stops the reservation actor and the store it serves.
//!
//! ## Dependency Injection via Context
//!
//! The store needs the actor's client to forward reservations, and the actor
//! needs the store to write book status. The cycle is broken with late
//! binding:
//!
//! - **Construction time**: create the actor and its client, then the store
//!   around the client
//! - **Runtime**: inject the store into `actor.run(ledger)`
//!
//! ## Graceful Shutdown
//!
//! Because both halves keep each other alive, closing the channel by dropping
//! clients does not work here. [`LibrarySystem::shutdown`] sends an explicit
//! shutdown message and awaits the actor task.

pub mod library_system;
pub mod tracing;

pub use self::library_system::*;
pub use self::tracing::setup_tracing;
