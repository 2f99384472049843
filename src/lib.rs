//! Bookshelf application library
//!
//! Wires the auth, books and system modules around one shared token codec and
//! serves them through the HTTP facade.

pub mod modules;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use bookshelf_authz::{AccessGuard, Authenticator, Identity, TokenCodec};
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Registered modules plus the guard protecting them.
pub struct Application {
    registry: ModuleRegistry,
    guard: AccessGuard,
}

impl Application {
    /// Build every module from `settings`.
    ///
    /// Issuance and verification share one codec, and with it one secret.
    pub fn build(settings: &Settings) -> anyhow::Result<Self> {
        let codec = Arc::new(
            TokenCodec::from_settings(&settings.auth).context("invalid auth settings")?,
        );
        let authenticator = Arc::new(Authenticator::new(
            Identity::from_settings(&settings.auth),
            codec.clone(),
        ));
        let guard = AccessGuard::new(codec);

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, settings, authenticator);

        Ok(Self { registry, guard })
    }

    /// The complete HTTP router, without binding a socket.
    pub fn router(&self, settings: &Settings) -> Router {
        bookshelf_http::build_router(&self.registry, settings, self.guard.clone())
    }

    /// Init and start modules, serve until shutdown, then stop modules.
    pub async fn run(self, settings: &Settings) -> anyhow::Result<()> {
        let ctx = InitCtx { settings };

        self.registry.init_all(&ctx).await?;
        self.registry.start_all(&ctx).await?;

        let served = bookshelf_http::start_server(&self.registry, settings, self.guard.clone()).await;

        self.registry.stop_all().await?;
        served
    }
}
