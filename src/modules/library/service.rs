use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shelf_authz::Address;
use shelf_events::EventBus;
use tokio::sync::RwLock;

use super::error::LibraryError;
use super::events::LibraryEvent;
use super::registry::{BookId, BookView, Library};

/// Notifications emitted by one committed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub events: Vec<LibraryEvent>,
}

/// Shared handle to the deployed registry.
///
/// Mutations queue on a single write lock in arrival order; reads share a
/// read lock and only see committed state. Notifications are published
/// before the write lock is released so subscribers see commit order.
#[derive(Clone)]
pub struct LibraryService {
    state: Arc<RwLock<Library>>,
    owner: Address,
    events: EventBus<LibraryEvent>,
}

impl LibraryService {
    pub fn new(library: Library, events: EventBus<LibraryEvent>) -> Self {
        Self {
            owner: library.owner(),
            state: Arc::new(RwLock::new(library)),
            events,
        }
    }

    /// Construct an empty registry owned by `owner`.
    pub fn deploy(owner: Address, event_capacity: usize) -> Self {
        tracing::info!(%owner, "library deployed");
        Self::new(Library::new(owner), EventBus::new(event_capacity))
    }

    pub fn events(&self) -> &EventBus<LibraryEvent> {
        &self.events
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub async fn add_book(
        &self,
        caller: Address,
        name: &str,
        author: &str,
        copies: u64,
    ) -> Result<Receipt, LibraryError> {
        self.commit("addBook", caller, |library| {
            library.add_book(caller, name, author, copies)
        })
        .await
    }

    pub async fn borrow_book(&self, caller: Address, id: BookId) -> Result<Receipt, LibraryError> {
        self.commit("borrowBook", caller, |library| library.borrow_book(caller, id))
            .await
    }

    pub async fn return_book(&self, caller: Address, id: BookId) -> Result<Receipt, LibraryError> {
        self.commit("returnBook", caller, |library| library.return_book(caller, id))
            .await
    }

    pub async fn book_by_name(&self, name: &str) -> Result<BookView, LibraryError> {
        self.state.read().await.book_by_name(name)
    }

    pub async fn book_history(&self, id: BookId) -> Result<Vec<Address>, LibraryError> {
        Ok(self.state.read().await.book_history(id)?.to_vec())
    }

    pub async fn all_books(&self) -> Vec<BookView> {
        self.state.read().await.all_books()
    }

    pub async fn all_available_books(&self) -> Vec<BookView> {
        self.state.read().await.all_available_books()
    }

    async fn commit<F>(
        &self,
        operation: &'static str,
        caller: Address,
        apply: F,
    ) -> Result<Receipt, LibraryError>
    where
        F: FnOnce(&mut Library) -> Result<LibraryEvent, LibraryError>,
    {
        let mut library = self.state.write().await;

        match apply(&mut *library) {
            Ok(event) => {
                tracing::info!(
                    operation,
                    %caller,
                    book_id = event.book_id(),
                    event = event.name(),
                    "call committed"
                );
                self.events.publish(event.clone());
                Ok(Receipt {
                    events: vec![event],
                })
            }
            Err(err) => {
                tracing::debug!(operation, %caller, reason = %err, "call rejected");
                Err(err)
            }
        }
    }
}
