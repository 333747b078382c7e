//! Process bootstrap: deploy the registry once, host it, serve it.

use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules::{self, library::LibraryService};

/// Deploy a fresh registry owned by the configured owner and register every module.
pub fn assemble(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let library = LibraryService::deploy(settings.library.owner, settings.events.capacity);

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings, library).context("failed to register modules")?;
    Ok(registry)
}

/// Run the module lifecycle around the HTTP server until shutdown.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let registry = assemble(&settings)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings).await;
    let stopped = registry.stop_all().await;

    served?;
    stopped?;

    tracing::info!("shelf shut down cleanly");
    Ok(())
}
