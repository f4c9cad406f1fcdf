//! Represents a book in the library catalog.
//!
//! # Ownership
//! Books live inside the [`Library`](crate::store::Library) store and are only
//! mutated while its write lock is held. The [`status`](Book::status) field is
//! the single source of truth other components observe.

use serde::{Deserialize, Serialize};

use std::fmt::Display;

/// Type-safe identifier for Books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(pub u32);

impl From<u32> for BookId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "book_{}", self.0)
    }
}

/// Externally visible lifecycle state of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookStatus {
    #[default]
    Available,
    Reserved,
    Borrowed,
}

impl Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookStatus::Available => "Available",
            BookStatus::Reserved => "Reserved",
            BookStatus::Borrowed => "Borrowed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub status: BookStatus,
}

impl Book {
    /// Creates a new Book instance.
    ///
    /// # Arguments
    /// * `id` - Catalog identifier chosen by the caller
    /// * `title` - Book title
    /// * `author` - Book author
    ///
    /// # Notes
    /// The book starts out `Available`; [`Library::add_book`](crate::store::Library::add_book)
    /// resets the status anyway.
    pub fn new(id: impl Into<BookId>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            status: BookStatus::Available,
        }
    }
}

/// A book together with whether the reservation actor currently holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct BookListing {
    pub book: Book,
    pub on_hold: bool,
}
