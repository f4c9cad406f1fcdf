//! # Shared Library Store
//!
//! Authoritative book and member state behind a single reader/writer lock.
//!
//! Reads (`get_*`, `list_*`) take the read lock; every mutation takes the
//! write lock. The store owns a [`ReservationClient`] for the reservation
//! path and implements [`ReservationLedger`] so the actor can write back
//! through it.
//!
//! The store never calls into the actor while holding its own lock, which
//! keeps the lock order one-way (hold table, then store).

use crate::error::LibraryError;
use crate::model::{Book, BookId, BookListing, BookStatus, Member, MemberId};
use crate::reservation::{ReservationClient, ReservationLedger};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

#[derive(Debug, Default)]
struct LibraryState {
    books: HashMap<BookId, Book>,
    members: HashMap<MemberId, Member>,
}

impl LibraryState {
    fn book_mut(&mut self, book_id: BookId) -> Result<&mut Book, LibraryError> {
        self.books
            .get_mut(&book_id)
            .ok_or_else(|| LibraryError::NotFound(book_id.to_string()))
    }

    /// Status write used by the reservation actor.
    ///
    /// A hold can never be placed over a loan: a direct borrow may land between
    /// the reserve fast path and the actor's write.
    fn set_status(&mut self, book_id: BookId, status: BookStatus) -> Result<(), LibraryError> {
        let book = self.book_mut(book_id)?;
        if status == BookStatus::Reserved && book.status == BookStatus::Borrowed {
            return Err(LibraryError::Conflict(format!("{book_id} is not available")));
        }
        book.status = status;
        Ok(())
    }

    /// Borrow rules shared by direct borrows and hold completion.
    fn lend(&mut self, book_id: BookId, member_id: MemberId) -> Result<(), LibraryError> {
        let book = self
            .books
            .get(&book_id)
            .ok_or_else(|| LibraryError::NotFound(book_id.to_string()))?;
        if book.status == BookStatus::Borrowed {
            return Err(LibraryError::Conflict(format!("{book_id} is already borrowed")));
        }
        let member = self
            .members
            .get_mut(&member_id)
            .ok_or_else(|| LibraryError::NotFound(member_id.to_string()))?;

        member.borrowed.push(book_id);
        self.book_mut(book_id)?.status = BookStatus::Borrowed;
        Ok(())
    }
}

/// The in-memory library.
///
/// Share it through an `Arc`; the reservation actor receives the same `Arc`
/// as its ledger.
#[derive(Debug)]
pub struct Library {
    state: RwLock<LibraryState>,
    reservations: ReservationClient,
}

impl Library {
    pub fn new(reservations: ReservationClient) -> Self {
        Self {
            state: RwLock::new(LibraryState::default()),
            reservations,
        }
    }

    /// The client of the reservation actor serving this library.
    pub fn reservations(&self) -> &ReservationClient {
        &self.reservations
    }

    /// Add a book to the catalog, replacing any book with the same id.
    ///
    /// The stored copy always starts `Available`.
    pub async fn add_book(&self, mut book: Book) {
        book.status = BookStatus::Available;
        let mut state = self.state.write().await;
        info!(book_id = %book.id, title = %book.title, "Book added");
        state.books.insert(book.id, book);
    }

    pub async fn remove_book(&self, book_id: BookId) -> Result<Book, LibraryError> {
        let mut state = self.state.write().await;
        let book = state
            .books
            .remove(&book_id)
            .ok_or_else(|| LibraryError::NotFound(book_id.to_string()))?;
        info!(%book_id, size = state.books.len(), "Book removed");
        Ok(book)
    }

    pub async fn add_member(&self, member: Member) {
        let mut state = self.state.write().await;
        info!(member_id = %member.id, name = %member.name, "Member added");
        state.members.insert(member.id, member);
    }

    pub async fn remove_member(&self, member_id: MemberId) -> Result<Member, LibraryError> {
        let mut state = self.state.write().await;
        let member = state
            .members
            .remove(&member_id)
            .ok_or_else(|| LibraryError::NotFound(member_id.to_string()))?;
        info!(%member_id, size = state.members.len(), "Member removed");
        Ok(member)
    }

    pub async fn get_book(&self, book_id: BookId) -> Option<Book> {
        self.state.read().await.books.get(&book_id).cloned()
    }

    pub async fn get_member(&self, member_id: MemberId) -> Option<Member> {
        self.state.read().await.members.get(&member_id).cloned()
    }

    /// All members, sorted by id.
    pub async fn members(&self) -> Vec<Member> {
        let state = self.state.read().await;
        let mut members: Vec<Member> = state.members.values().cloned().collect();
        members.sort_by_key(|member| member.id);
        members
    }

    /// Borrow a book directly, outside of the reservation flow.
    ///
    /// Unlike [`finalize_borrow`](ReservationLedger::finalize_borrow), a book
    /// that is on hold is refused: only the hold's own borrow attempt may take
    /// it.
    #[instrument(skip(self))]
    pub async fn borrow_book(&self, book_id: BookId, member_id: MemberId) -> Result<(), LibraryError> {
        let mut state = self.state.write().await;
        if let Some(book) = state.books.get(&book_id) {
            if book.status == BookStatus::Reserved {
                return Err(LibraryError::Conflict(format!("{book_id} is reserved")));
            }
        }
        state.lend(book_id, member_id)?;
        info!("Borrowed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn return_book(&self, book_id: BookId, member_id: MemberId) -> Result<(), LibraryError> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&book_id) {
            return Err(LibraryError::NotFound(book_id.to_string()));
        }
        let member = state
            .members
            .get_mut(&member_id)
            .ok_or_else(|| LibraryError::NotFound(member_id.to_string()))?;
        let position = member
            .borrowed
            .iter()
            .position(|id| *id == book_id)
            .ok_or_else(|| {
                LibraryError::Conflict(format!("{member_id} has not borrowed {book_id}"))
            })?;

        member.borrowed.remove(position);
        state.book_mut(book_id)?.status = BookStatus::Available;
        info!("Returned");
        Ok(())
    }

    /// Place a hold on `book_id` for `member_id`.
    ///
    /// Runs a fast check under the read lock, then hands the request to the
    /// reservation actor and waits for its answer or the submit deadline.
    ///
    /// # Errors
    /// - [`LibraryError::NotFound`] if the book or member does not exist
    /// - [`LibraryError::Conflict`] if the book is held, borrowed, or the actor
    ///   rejects the request
    /// - [`LibraryError::Timeout`] if no answer arrives in time; the hold may
    ///   still be placed afterwards
    #[instrument(skip(self))]
    pub async fn reserve(&self, book_id: BookId, member_id: MemberId) -> Result<(), LibraryError> {
        let status = {
            let state = self.state.read().await;
            let book = state
                .books
                .get(&book_id)
                .ok_or_else(|| LibraryError::NotFound(book_id.to_string()))?;
            if !state.members.contains_key(&member_id) {
                return Err(LibraryError::NotFound(member_id.to_string()));
            }
            book.status
        };

        if status != BookStatus::Available {
            debug!(%status, "Fast path rejected");
            if status == BookStatus::Reserved && self.reservations.has_live_hold(book_id).await {
                return Err(LibraryError::Conflict(format!("{book_id} is already reserved")));
            }
            return Err(LibraryError::Conflict(format!("{book_id} is not available")));
        }

        self.reservations.reserve(book_id, member_id).await
    }

    /// Books that can still be reserved or are on hold, sorted by id.
    pub async fn list_available_books(&self) -> Vec<Book> {
        let state = self.state.read().await;
        let mut books: Vec<Book> = state
            .books
            .values()
            .filter(|book| matches!(book.status, BookStatus::Available | BookStatus::Reserved))
            .cloned()
            .collect();
        books.sort_by_key(|book| book.id);
        books
    }

    /// Books currently lent to `member_id`, in borrow order.
    pub async fn list_borrowed_books(&self, member_id: MemberId) -> Result<Vec<Book>, LibraryError> {
        let state = self.state.read().await;
        let member = state
            .members
            .get(&member_id)
            .ok_or_else(|| LibraryError::NotFound(member_id.to_string()))?;
        Ok(member
            .borrowed
            .iter()
            .filter_map(|book_id| state.books.get(book_id).cloned())
            .collect())
    }

    /// Every book, annotated with whether the reservation actor holds it.
    pub async fn list_books(&self) -> Vec<BookListing> {
        let mut books: Vec<Book> = {
            let state = self.state.read().await;
            state.books.values().cloned().collect()
        };
        books.sort_by_key(|book| book.id);

        let mut listings = Vec::with_capacity(books.len());
        for book in books {
            let on_hold = self.reservations.has_live_hold(book.id).await;
            listings.push(BookListing { book, on_hold });
        }
        listings
    }
}

#[async_trait]
impl ReservationLedger for Library {
    async fn update_book_status(
        &self,
        book_id: BookId,
        status: BookStatus,
    ) -> Result<(), LibraryError> {
        self.state.write().await.set_status(book_id, status)?;
        debug!(%book_id, %status, "Status updated");
        Ok(())
    }

    async fn finalize_borrow(
        &self,
        book_id: BookId,
        member_id: MemberId,
    ) -> Result<(), LibraryError> {
        self.state.write().await.lend(book_id, member_id)
    }
}
