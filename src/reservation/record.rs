//! Hold records and the lock-guarded table that stores them.

use crate::model::{BookId, MemberId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// A live hold on one book.
///
/// `hold_id` is unique per hold, so a timer or borrow task scheduled for an
/// earlier hold can tell it is looking at a newer record for the same book.
#[derive(Debug)]
pub(crate) struct ReservationRecord {
    pub(crate) hold_id: u64,
    pub(crate) book_id: BookId,
    pub(crate) member_id: MemberId,
    pub(crate) reserved_at: Instant,
    pub(crate) expiry: JoinHandle<()>,
}

impl ReservationRecord {
    pub(crate) fn is_live(&self, hold_duration: Duration) -> bool {
        self.reserved_at.elapsed() < hold_duration
    }

    pub(crate) fn cancel_expiry(&self) {
        self.expiry.abort();
    }
}

/// Shared handle to the actor's reservation table.
///
/// The actor loop, its expiry timers and its delayed borrow attempts all take
/// the same lock around every read-modify-delete sequence. Clients only get
/// read access through [`HoldTable::contains`].
#[derive(Debug, Clone, Default)]
pub struct HoldTable {
    records: Arc<Mutex<HashMap<BookId, ReservationRecord>>>,
}

impl HoldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a record currently exists for `book_id`.
    ///
    /// Presence only: a record whose age already exceeds the hold duration
    /// still counts until its expiry timer or a newer request removes it.
    pub async fn contains(&self, book_id: BookId) -> bool {
        self.records.lock().await.contains_key(&book_id)
    }

    /// The member a book is currently held for, if any.
    pub async fn holder(&self, book_id: BookId) -> Option<MemberId> {
        self.records
            .lock()
            .await
            .get(&book_id)
            .map(|record| record.member_id)
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, HashMap<BookId, ReservationRecord>> {
        self.records.lock().await
    }
}
