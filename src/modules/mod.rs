pub mod auth;
pub mod books;
pub mod system;

use std::sync::Arc;

use bookshelf_authz::Authenticator;
use bookshelf_kernel::{settings::Settings, ModuleRegistry};

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    settings: &Settings,
    authenticator: Arc<Authenticator>,
) {
    registry.register(auth::create_module(authenticator));
    registry.register(books::create_module());
    registry.register(system::create_module(settings.system.clone()));
}
