pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};

use store::BookStore;

/// Books module: the catalogue and its CRUD routes
pub struct BooksModule {
    store: Arc<BookStore>,
}

impl BooksModule {
    pub fn new(store: Arc<BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.store.len().await;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book_ref = serde_json::json!({ "$ref": "#/components/schemas/Book" });
        let error_ref = serde_json::json!({ "$ref": "#/components/schemas/ErrorResponse" });
        let id_param = serde_json::json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        });
        let json_body = |schema: &serde_json::Value| {
            serde_json::json!({ "application/json": { "schema": schema } })
        };
        let error = |description: &str| {
            serde_json::json!({ "description": description, "content": json_body(&error_ref) })
        };

        Some(serde_json::json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books in insertion order",
                                "content": json_body(&serde_json::json!({
                                    "type": "array",
                                    "items": book_ref
                                }))
                            },
                            "401": error("Missing or invalid token"),
                            "403": error("Token lacks the admin role")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": { "required": true, "content": json_body(&book_ref) },
                        "responses": {
                            "200": { "description": "Created book", "content": json_body(&book_ref) },
                            "400": error("Malformed body"),
                            "401": error("Missing or invalid token"),
                            "403": error("Token lacks the admin role")
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": { "description": "The book", "content": json_body(&book_ref) },
                            "400": error("Identifier is not an integer"),
                            "404": error("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Replace a book's title and author",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "requestBody": {
                            "required": true,
                            "content": json_body(&serde_json::json!({
                                "$ref": "#/components/schemas/UpdateBook"
                            }))
                        },
                        "responses": {
                            "200": { "description": "Updated book", "content": json_body(&book_ref) },
                            "400": error("Bad identifier or body"),
                            "404": error("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "400": error("Identifier is not an integer"),
                            "404": error("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Caller-assigned identifier"
                            },
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            }
                        }
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Ignored; the path id is kept"
                            },
                            "title": { "type": "string" },
                            "author": { "type": "string" }
                        }
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let books = self.store.len().await;
        tracing::info!(
            module = self.name(),
            books,
            "books module stopped"
        );
        Ok(())
    }
}

/// Create the books module over a store seeded with the starter catalogue
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new(Arc::new(BookStore::seeded())))
}
