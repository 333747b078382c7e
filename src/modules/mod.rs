pub mod library;

use shelf_kernel::{settings::Settings, ModuleRegistry};

use library::LibraryService;

/// Register all application modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    settings: &Settings,
    library: LibraryService,
) -> anyhow::Result<()> {
    registry.register(library::create_module(
        library,
        &settings.library.caller_header,
    ))
}
