use serde::{Deserialize, Serialize};
use shelf_authz::Address;

use super::registry::BookId;

/// Notifications emitted by committed registry calls.
///
/// Variant names are the fixed notification names external indexers match on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LibraryEvent {
    NewBookAdded {
        id: BookId,
        name: String,
        author: String,
        copies: u64,
    },
    BookCopiesUpdated {
        id: BookId,
        copies: u64,
    },
    BookBorrowed {
        book_id: BookId,
        borrower: Address,
    },
    BookReturned {
        book_id: BookId,
        borrower: Address,
    },
}

impl LibraryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LibraryEvent::NewBookAdded { .. } => "NewBookAdded",
            LibraryEvent::BookCopiesUpdated { .. } => "BookCopiesUpdated",
            LibraryEvent::BookBorrowed { .. } => "BookBorrowed",
            LibraryEvent::BookReturned { .. } => "BookReturned",
        }
    }

    pub fn book_id(&self) -> BookId {
        match self {
            LibraryEvent::NewBookAdded { id, .. } | LibraryEvent::BookCopiesUpdated { id, .. } => {
                *id
            }
            LibraryEvent::BookBorrowed { book_id, .. } | LibraryEvent::BookReturned { book_id, .. } => {
                *book_id
            }
        }
    }
}
