//! # Reservation Actor
//!
//! This module defines the `ReservationActor`, the single writer of the
//! reservation table. It processes mailbox messages sequentially, places holds
//! through the [`ReservationLedger`], and schedules two racing background
//! tasks per hold:
//!
//! - an **expiry timer** that releases the hold and reverts the book to
//!   `Available` once the hold duration elapses;
//! - a **delayed borrow attempt** that finalizes the borrow shortly after the
//!   hold is placed.
//!
//! Both tasks take the hold-table lock and only act if the record they were
//! scheduled for is still present. The first one to get there removes it; the
//! other finds nothing and does nothing.

use super::ledger::ReservationLedger;
use super::message::{ReservationMessage, ReservationRequest};
use super::record::{HoldTable, ReservationRecord};
use super::ReservationClient;
use crate::config::ReservationConfig;
use crate::error::LibraryError;
use crate::model::{BookId, BookStatus, MemberId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// The actor that owns every reservation hold.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the receiver end of
/// the mailbox and is the only code path that creates records.
///
/// **Concurrency Model**:
/// Requests are handled one at a time, so requests for the same book are
/// strictly FIFO. Unlike a pure actor, the table itself sits behind a lock:
/// expiry timers and borrow attempts run as separate tasks and mutate it
/// concurrently with the loop.
///
/// # Usage Pattern
///
/// 1.  **Create**: [`ReservationActor::new`] returns the actor and its client.
/// 2.  **Wire**: hand the client to whatever implements [`ReservationLedger`].
/// 3.  **Run**: spawn `actor.run(ledger)`.
pub struct ReservationActor {
    receiver: mpsc::Receiver<ReservationMessage>,
    holds: HoldTable,
    hold_duration: Duration,
    borrow_delay: Duration,
    next_hold_id: u64,
}

impl ReservationActor {
    /// Creates a new `ReservationActor` and its associated `ReservationClient`.
    ///
    /// The mailbox is bounded by `config.mailbox_capacity`; the client gives up
    /// on a full mailbox after `config.submit_timeout_ms`.
    pub fn new(config: &ReservationConfig) -> (Self, ReservationClient) {
        let (sender, receiver) = mpsc::channel(config.mailbox_capacity);
        let holds = HoldTable::new();
        let actor = Self {
            receiver,
            holds: holds.clone(),
            hold_duration: config.hold_duration(),
            borrow_delay: config.borrow_delay(),
            next_hold_id: 1,
        };
        let client = ReservationClient::new(sender, holds, config.submit_timeout());
        (actor, client)
    }

    /// Runs the actor's event loop until a `Shutdown` message arrives or every
    /// client is dropped.
    ///
    /// # Context Injection
    /// The ledger is injected here rather than in [`ReservationActor::new`],
    /// because the ledger usually owns this actor's client.
    pub async fn run<L: ReservationLedger>(mut self, ledger: Arc<L>) {
        info!(
            hold_ms = self.hold_duration.as_millis() as u64,
            borrow_delay_ms = self.borrow_delay.as_millis() as u64,
            "Reservation actor started"
        );

        let mut shutdown_ack = None;
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ReservationMessage::Reserve(ReservationRequest {
                    book_id,
                    member_id,
                    respond_to,
                }) => {
                    debug!(%book_id, %member_id, "Reserve");
                    let result = self.handle_reserve(book_id, member_id, &ledger).await;
                    match &result {
                        Ok(()) => info!(%book_id, %member_id, "Hold placed"),
                        Err(e) => warn!(%book_id, %member_id, error = %e, "Reserve rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                ReservationMessage::Shutdown { respond_to } => {
                    shutdown_ack = Some(respond_to);
                    break;
                }
            }
        }

        let released = self.release_all(&ledger).await;
        info!(released, "Shutdown");
        if let Some(respond_to) = shutdown_ack {
            let _ = respond_to.send(());
        }
    }

    async fn handle_reserve<L: ReservationLedger>(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
        ledger: &Arc<L>,
    ) -> Result<(), LibraryError> {
        let mut records = self.holds.lock().await;

        if let Some(existing) = records.get(&book_id) {
            if existing.is_live(self.hold_duration) {
                return Err(LibraryError::Conflict(format!(
                    "{book_id} is already reserved"
                )));
            }
            debug!(%book_id, stale_hold = existing.hold_id, "Dropping stale hold");
            existing.cancel_expiry();
            records.remove(&book_id);
        }

        ledger
            .update_book_status(book_id, BookStatus::Reserved)
            .await?;

        let hold_id = self.next_hold_id;
        self.next_hold_id += 1;

        let expiry = tokio::spawn(expire_hold(
            self.holds.clone(),
            Arc::clone(ledger),
            book_id,
            hold_id,
            self.hold_duration,
        ));
        records.insert(
            book_id,
            ReservationRecord {
                hold_id,
                book_id,
                member_id,
                reserved_at: Instant::now(),
                expiry,
            },
        );
        drop(records);

        tokio::spawn(attempt_borrow(
            self.holds.clone(),
            Arc::clone(ledger),
            BorrowAttempt {
                book_id,
                member_id,
                hold_id,
                delay: self.borrow_delay,
                hold_duration: self.hold_duration,
            },
        ));

        Ok(())
    }

    /// Cancels every pending timer and reverts the held books to `Available`.
    async fn release_all<L: ReservationLedger>(&self, ledger: &Arc<L>) -> usize {
        let mut records = self.holds.lock().await;
        let released = records.len();
        for (_, record) in records.drain() {
            record.cancel_expiry();
            if let Err(e) = ledger
                .update_book_status(record.book_id, BookStatus::Available)
                .await
            {
                warn!(book_id = %record.book_id, error = %e, "Failed to release hold");
            }
        }
        released
    }
}

/// Parameters of one delayed borrow attempt.
#[derive(Debug, Clone, Copy)]
struct BorrowAttempt {
    book_id: BookId,
    member_id: MemberId,
    hold_id: u64,
    delay: Duration,
    hold_duration: Duration,
}

/// Expiry timer for a single hold.
///
/// Reverts the book only if the record is still the one this timer was
/// started for. A borrow that completed first removed the record and aborted
/// this task, so it never reaches the revert.
async fn expire_hold<L: ReservationLedger>(
    holds: HoldTable,
    ledger: Arc<L>,
    book_id: BookId,
    hold_id: u64,
    after: Duration,
) {
    tokio::time::sleep(after).await;

    let mut records = holds.lock().await;
    match records.get(&book_id) {
        Some(record) if record.hold_id == hold_id => {
            records.remove(&book_id);
        }
        _ => {
            debug!(%book_id, hold_id, "Expiry found no matching hold");
            return;
        }
    }

    match ledger
        .update_book_status(book_id, BookStatus::Available)
        .await
    {
        Ok(()) => info!(%book_id, hold_id, "Hold expired"),
        Err(e) => warn!(%book_id, hold_id, error = %e, "Hold expired but status revert failed"),
    }
}

/// Delayed borrow attempt for a single hold.
///
/// The table lock is held across the check and the `finalize_borrow` call, so
/// the expiry timer cannot release the hold in between.
async fn attempt_borrow<L: ReservationLedger>(holds: HoldTable, ledger: Arc<L>, attempt: BorrowAttempt) {
    let BorrowAttempt {
        book_id,
        member_id,
        hold_id,
        delay,
        hold_duration,
    } = attempt;

    tokio::time::sleep(delay).await;

    let mut records = holds.lock().await;
    let live = matches!(
        records.get(&book_id),
        Some(record) if record.hold_id == hold_id && record.is_live(hold_duration)
    );
    if !live {
        debug!(%book_id, hold_id, "Borrow attempt found no live hold");
        return;
    }

    match ledger.finalize_borrow(book_id, member_id).await {
        Ok(()) => {
            if let Some(record) = records.remove(&book_id) {
                record.cancel_expiry();
            }
            info!(%book_id, %member_id, hold_id, "Borrowed");
        }
        Err(e) => {
            warn!(%book_id, %member_id, hold_id, error = %e, "Borrow attempt failed, hold kept until expiry");
        }
    }
}
