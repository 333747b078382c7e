//! Notification subscriber that writes every committed call to the audit log.

use shelf_events::{EventBus, RecvError};
use tokio::task::JoinHandle;

use super::events::LibraryEvent;

/// Spawn a task logging every notification under the `shelf::audit` target.
///
/// The task ends when the bus closes or the handle is aborted.
pub fn spawn(bus: &EventBus<LibraryEvent>) -> JoinHandle<()> {
    let mut rx = bus.subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log(&event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(target: "shelf::audit", missed, "audit log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn log(event: &LibraryEvent) {
    match event {
        LibraryEvent::NewBookAdded {
            id,
            name,
            author,
            copies,
        } => tracing::info!(
            target: "shelf::audit",
            id = *id,
            name = %name,
            author = %author,
            copies = *copies,
            "NewBookAdded"
        ),
        LibraryEvent::BookCopiesUpdated { id, copies } => {
            tracing::info!(target: "shelf::audit", id = *id, copies = *copies, "BookCopiesUpdated")
        }
        LibraryEvent::BookBorrowed { book_id, borrower } => {
            tracing::info!(target: "shelf::audit", book_id = *book_id, %borrower, "BookBorrowed")
        }
        LibraryEvent::BookReturned { book_id, borrower } => {
            tracing::info!(target: "shelf::audit", book_id = *book_id, %borrower, "BookReturned")
        }
    }
}
