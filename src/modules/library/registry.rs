//! The book registry: inventory, loans and borrow history.
//!
//! Books are kept in insertion order so that a book's id is its position.
//! A name index sits beside the list and is updated on every insert; books
//! are never removed, so indices never go stale.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shelf_authz::{Address, OwnerGuard};

use super::error::{reason, LibraryError};
use super::events::LibraryEvent;

/// Position of a book in insertion order.
pub type BookId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub author: String,
    pub copies: u64,
}

/// The `(name, author, copies)` tuple returned by read views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookView {
    pub name: String,
    pub author: String,
    pub copies: u64,
}

impl BookView {
    /// Placeholder for an out-of-stock book in [`Library::all_available_books`].
    pub fn sentinel() -> Self {
        Self::default()
    }

    pub fn is_sentinel(&self) -> bool {
        self.name.is_empty() && self.author.is_empty() && self.copies == 0
    }
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            name: book.name.clone(),
            author: book.author.clone(),
            copies: book.copies,
        }
    }
}

#[derive(Debug)]
struct Entry {
    book: Book,
    history: Vec<Address>,
}

/// Registry state. Mutators either apply fully and return the emitted
/// notification, or return an error having changed nothing.
#[derive(Debug)]
pub struct Library {
    guard: OwnerGuard,
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
    // (book, borrower) -> active; returned loans stay as `false`
    loans: HashMap<(BookId, Address), bool>,
}

impl Library {
    /// Deploy an empty registry owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            guard: OwnerGuard::new(owner),
            entries: Vec::new(),
            by_name: HashMap::new(),
            loans: HashMap::new(),
        }
    }

    pub fn owner(&self) -> Address {
        self.guard.owner()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a book, or overwrite the copy count of the book with the same name.
    ///
    /// Owner only. Re-adding keeps the original id and author.
    pub fn add_book(
        &mut self,
        caller: Address,
        name: &str,
        author: &str,
        copies: u64,
    ) -> Result<LibraryEvent, LibraryError> {
        self.guard.ensure(caller)?;

        if name.is_empty() {
            return Err(LibraryError::Validation(reason::EMPTY_NAME));
        }
        if author.is_empty() {
            return Err(LibraryError::Validation(reason::EMPTY_AUTHOR));
        }
        if copies == 0 {
            return Err(LibraryError::Validation(reason::ZERO_COPIES));
        }

        if let Some(&index) = self.by_name.get(name) {
            let book = &mut self.entries[index].book;
            book.copies = copies;
            return Ok(LibraryEvent::BookCopiesUpdated {
                id: book.id,
                copies,
            });
        }

        let index = self.entries.len();
        let book = Book {
            id: index as BookId,
            name: name.to_owned(),
            author: author.to_owned(),
            copies,
        };
        let event = LibraryEvent::NewBookAdded {
            id: book.id,
            name: book.name.clone(),
            author: book.author.clone(),
            copies,
        };

        self.by_name.insert(book.name.clone(), index);
        self.entries.push(Entry {
            book,
            history: Vec::new(),
        });

        Ok(event)
    }

    /// Take one copy of `id` on behalf of `caller`.
    pub fn borrow_book(&mut self, caller: Address, id: BookId) -> Result<LibraryEvent, LibraryError> {
        let index = self.index_of(id)?;

        if self.entries[index].book.copies == 0 {
            return Err(LibraryError::OutOfStock(reason::OUT_OF_STOCK));
        }
        if self.is_borrowing(id, caller) {
            return Err(LibraryError::State(reason::ALREADY_BORROWED));
        }

        let entry = &mut self.entries[index];
        entry.book.copies -= 1;
        entry.history.push(caller);
        self.loans.insert((id, caller), true);

        Ok(LibraryEvent::BookBorrowed {
            book_id: id,
            borrower: caller,
        })
    }

    /// Give back the copy of `id` that `caller` holds.
    pub fn return_book(&mut self, caller: Address, id: BookId) -> Result<LibraryEvent, LibraryError> {
        let index = self.index_of(id)?;

        if !self.is_borrowing(id, caller) {
            return Err(LibraryError::State(reason::NOT_BORROWED));
        }
        let copies = self.entries[index]
            .book
            .copies
            .checked_add(1)
            .ok_or(LibraryError::State(reason::COPIES_OVERFLOW))?;

        self.entries[index].book.copies = copies;
        self.loans.insert((id, caller), false);

        Ok(LibraryEvent::BookReturned {
            book_id: id,
            borrower: caller,
        })
    }

    pub fn book(&self, id: BookId) -> Result<&Book, LibraryError> {
        let index = self.index_of(id)?;
        Ok(&self.entries[index].book)
    }

    pub fn book_by_name(&self, name: &str) -> Result<BookView, LibraryError> {
        if name.is_empty() {
            return Err(LibraryError::Validation(reason::EMPTY_NAME));
        }
        self.by_name
            .get(name)
            .map(|&index| BookView::from(&self.entries[index].book))
            .ok_or(LibraryError::NotFound(reason::UNKNOWN_NAME))
    }

    /// Every address that ever borrowed `id`, oldest first, repeats included.
    pub fn book_history(&self, id: BookId) -> Result<&[Address], LibraryError> {
        let index = self.index_of(id)?;
        Ok(&self.entries[index].history)
    }

    pub fn all_books(&self) -> Vec<BookView> {
        self.entries
            .iter()
            .map(|entry| BookView::from(&entry.book))
            .collect()
    }

    /// Like [`Library::all_books`], with out-of-stock books replaced in place
    /// by [`BookView::sentinel`] so positions still match book ids.
    pub fn all_available_books(&self) -> Vec<BookView> {
        self.entries
            .iter()
            .map(|entry| match entry.book.copies {
                0 => BookView::sentinel(),
                _ => BookView::from(&entry.book),
            })
            .collect()
    }

    /// Whether `borrower` currently holds a copy of `id`.
    pub fn is_borrowing(&self, id: BookId, borrower: Address) -> bool {
        self.loans.get(&(id, borrower)).copied().unwrap_or(false)
    }

    fn index_of(&self, id: BookId) -> Result<usize, LibraryError> {
        usize::try_from(id)
            .ok()
            .filter(|&index| index < self.entries.len())
            .ok_or(LibraryError::NotFound(reason::UNKNOWN_ID))
    }
}
