//! # Library Reservations
//!
//! > **Time-bounded book holds on top of a single-writer actor.**
//!
//! This crate implements the reservation core of an in-memory library: a
//! Tokio actor that serializes "reserve a book" requests, keeps each hold for
//! a fixed duration, and races a delayed borrow attempt against the hold's
//! expiry.
//!
//! ## 🏗️ Design
//!
//! ### Two collaborators
//! - **[`ReservationActor`](reservation::ReservationActor)**: owns the hold table,
//!   consumes a bounded mailbox one request at a time, schedules expiry and the
//!   delayed borrow.
//! - **[`Library`](store::Library)**: owns books and members behind one
//!   reader/writer lock and exposes the two callbacks the actor writes through
//!   ([`ReservationLedger`](reservation::ReservationLedger)).
//!
//! ### Racing tasks, one lock
//! Every hold spawns an expiry timer and a delayed borrow attempt. Both take
//! the hold-table lock and act only if the record they were scheduled for is
//! still there, so exactly one of them wins. The borrow keeps the lock across
//! its `finalize_borrow` call, so a book that was borrowed is never reverted
//! to `Available` by a late expiry.
//!
//! ### Type-Safe Error Handling
//! All operations return [`LibraryError`](error::LibraryError). Errors raised by
//! the store while a hold is placed reach the requester unchanged; errors from
//! the background borrow attempt are only logged.
//!
//! ### Observability
//! `tracing` everywhere. See [`lifecycle::tracing`] for what gets logged at
//! which level.
//!
//! ## 🗺️ Module Tour
//!
//! - [`reservation`]: the actor, its client, the ledger trait and test doubles.
//! - [`store`]: the shared library store.
//! - [`lifecycle`]: [`LibrarySystem`](lifecycle::LibrarySystem) wiring and tracing setup.
//! - [`model`]: [`Book`](model::Book), [`Member`](model::Member) and their ids.
//! - [`config`]: [`ReservationConfig`](config::ReservationConfig) with the
//!   mailbox size and timings.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the scripted demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Shorter holds for experimenting
//! LIBRARY_HOLD_DURATION_MS=1000 RUST_LOG=debug cargo run
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod reservation;
pub mod store;
