//! # Observability & Tracing
//!
//! This module provides the tracing setup for the library binary.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: startup, shutdown and how many holds were released
//! - **Hold Transitions**: `Hold placed`, `Borrowed`, `Hold expired`
//! - **Race Losers**: at `debug`, the expiry or borrow task that found no matching hold
//! - **Failures**: rejected reservations and failed callbacks, with book and member ids
//!
//! ## Usage Examples
//!
//! ```bash
//! # Transitions only
//! RUST_LOG=info cargo run
//!
//! # Request payloads and race losers too
//! RUST_LOG=debug cargo run
//!
//! # Only the actor
//! RUST_LOG=library_reservations::reservation=debug cargo run
//! ```
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Reservation actor started hold_ms=5000 borrow_delay_ms=100
//! INFO reserve: Hold placed book_id=book_42 member_id=member_7
//! WARN Reserve rejected book_id=book_42 member_id=member_9 error=book_42 is already reserved
//! INFO Borrowed book_id=book_42 member_id=member_7 hold_id=1
//! ```

/// Initializes a compact, `RUST_LOG`-filtered subscriber for the whole process.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
