use crate::model::BookId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub u32);

impl From<u32> for MemberId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "member_{}", self.0)
    }
}

/// Represents a registered library member.
///
/// `borrowed` keeps the ids of the member's current loans in the order they
/// were borrowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub borrowed: Vec<BookId>,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            borrowed: Vec::new(),
        }
    }

    pub fn has_borrowed(&self, book_id: BookId) -> bool {
        self.borrowed.contains(&book_id)
    }
}
