//! Pure data structures owned by the [`Library`](crate::store::Library) store.

pub mod book;
pub mod member;

pub use book::*;
pub use member::*;
