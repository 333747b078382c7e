//! Library module: the book registry and its HTTP surface.

pub mod audit;
pub mod error;
pub mod events;
pub mod models;
mod openapi;
pub mod registry;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use shelf_http::caller::DEFAULT_CALLER_HEADER;
use shelf_kernel::{InitCtx, Module};
use tokio::{sync::Mutex, task::JoinHandle};

pub use error::{reason, LibraryError};
pub use events::LibraryEvent;
pub use registry::{Book, BookId, BookView, Library};
pub use service::{LibraryService, Receipt};

pub struct LibraryModule {
    service: LibraryService,
    caller_header: String,
    audit: Mutex<Option<JoinHandle<()>>>,
}

impl LibraryModule {
    pub fn new(service: LibraryService) -> Self {
        Self {
            service,
            caller_header: DEFAULT_CALLER_HEADER.to_string(),
            audit: Mutex::new(None),
        }
    }

    /// Header the HTTP facade reads the caller address from; documented in the OpenAPI fragment.
    pub fn with_caller_header(mut self, header: impl Into<String>) -> Self {
        self.caller_header = header.into().to_ascii_lowercase();
        self
    }
}

#[async_trait]
impl Module for LibraryModule {
    fn name(&self) -> &'static str {
        "library"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.library.owner != self.service.owner() {
            anyhow::bail!(
                "library deployed by {} but settings name {} as owner",
                self.service.owner(),
                ctx.settings.library.owner
            );
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            owner = %self.service.owner(),
            "library module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::fragment(&self.caller_header))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let mut slot = self.audit.lock().await;
        if slot.is_none() {
            *slot = Some(audit::spawn(self.service.events()));
        }
        tracing::info!(module = self.name(), "library audit log attached");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        if let Some(handle) = self.audit.lock().await.take() {
            handle.abort();
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    return Err(anyhow::Error::new(err).context("audit task failed"));
                }
            }
        }
        tracing::info!(module = self.name(), "library module stopped");
        Ok(())
    }
}

/// Create the library module around an already deployed registry
pub fn create_module(service: LibraryService, caller_header: &str) -> Arc<dyn Module> {
    Arc::new(LibraryModule::new(service).with_caller_header(caller_header))
}
