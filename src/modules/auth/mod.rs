use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use bookshelf_authz::{Authenticator, Credential};
use bookshelf_http::AppError;
use bookshelf_kernel::{InitCtx, Module};
use serde::{Deserialize, Serialize};

const LOGIN_MESSAGE: &str = "Login success";

/// Response body of `POST /login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Public login endpoint
pub struct AuthModule {
    authenticator: Arc<Authenticator>,
}

impl AuthModule {
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }
}

#[async_trait]
impl Module for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn requires_auth(&self) -> bool {
        false
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            identity = %ctx.settings.auth.identity_email,
            token_ttl_hours = ctx.settings.auth.token_ttl_hours,
            "auth module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/login", post(login))
            .with_state(self.authenticator.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/login": {
                    "post": {
                        "summary": "Exchange credentials for a bearer token",
                        "tags": ["Auth"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Credential" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Login succeeded",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/LoginResponse" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Malformed body",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "401": {
                                "description": "Invalid email or password",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Credential": {
                        "type": "object",
                        "properties": {
                            "email": { "type": "string", "format": "email" },
                            "password": { "type": "string", "format": "password" }
                        },
                        "required": ["email", "password"]
                    },
                    "LoginResponse": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" },
                            "token": { "type": "string" }
                        },
                        "required": ["message", "token"]
                    }
                }
            }
        }))
    }
}

async fn login(
    State(authenticator): State<Arc<Authenticator>>,
    payload: Result<Json<Credential>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(credential) = payload?;
    let token = authenticator.login(&credential)?;

    Ok(Json(LoginResponse {
        message: LOGIN_MESSAGE.to_string(),
        token,
    }))
}

/// Create the auth module around a shared authenticator
pub fn create_module(authenticator: Arc<Authenticator>) -> Arc<dyn Module> {
    Arc::new(AuthModule::new(authenticator))
}
