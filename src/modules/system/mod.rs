//! File upload and configuration echo routes.

use std::{path::Path, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use bookshelf_http::AppError;
use bookshelf_kernel::{settings::SystemSettings, InitCtx, Module};
use serde_json::json;

const UPLOAD_FIELD: &str = "image";
const DEFAULT_SECRET: &str = "default secret";

pub struct SystemModule {
    settings: Arc<SystemSettings>,
}

impl SystemModule {
    pub fn new(settings: SystemSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl Module for SystemModule {
    fn name(&self) -> &'static str {
        "system"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.settings.upload_dir)
            .await
            .with_context(|| {
                format!(
                    "failed to create upload directory {}",
                    self.settings.upload_dir.display()
                )
            })?;

        tracing::info!(
            module = self.name(),
            upload_dir = %self.settings.upload_dir.display(),
            "system module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/upload", post(upload_file))
            .route("/config", get(get_config))
            .with_state(self.settings.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/upload": {
                    "post": {
                        "summary": "Upload an image to local disk",
                        "tags": ["System"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "multipart/form-data": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "image": { "type": "string", "format": "binary" }
                                        },
                                        "required": ["image"]
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "File stored",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            },
                            "400": {
                                "description": "Missing file field",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/config": {
                    "get": {
                        "summary": "Echo the configured secret",
                        "tags": ["System"],
                        "responses": {
                            "200": {
                                "description": "Configured secret",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": { "SECRET": { "type": "string" } }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }))
    }
}

/// Store the `image` field under the upload directory.
async fn upload_file(
    State(settings): State<Arc<SystemSettings>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<&'static str, AppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // Only the final path component is kept.
        let file_name = field
            .file_name()
            .and_then(|name| Path::new(name).file_name())
            .map(|name| name.to_owned())
            .ok_or_else(|| AppError::bad_request("upload field has no file name"))?;
        let data = field.bytes().await?;

        let destination = settings.upload_dir.join(&file_name);
        tokio::fs::create_dir_all(&settings.upload_dir)
            .await
            .context("failed to create upload directory")?;
        tokio::fs::write(&destination, &data)
            .await
            .with_context(|| format!("failed to write {}", destination.display()))?;

        tracing::info!(
            path = %destination.display(),
            bytes = data.len(),
            "file uploaded"
        );
        return Ok("File upload complete!");
    }

    Err(AppError::bad_request(format!(
        "multipart field '{}' is required",
        UPLOAD_FIELD
    )))
}

async fn get_config(State(settings): State<Arc<SystemSettings>>) -> Json<serde_json::Value> {
    let secret = settings
        .secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SECRET);

    Json(json!({ "SECRET": secret }))
}

pub fn create_module(settings: SystemSettings) -> Arc<dyn Module> {
    Arc::new(SystemModule::new(settings))
}
