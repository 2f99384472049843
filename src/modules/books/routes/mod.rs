//! HTTP handlers for the Books module.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use bookshelf_authz::Claims;
use bookshelf_http::AppError;

use super::models::{Book, UpdateBook};
use super::store::{BookStore, StoreError};

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::not_found(err.to_string()),
        }
    }
}

/// Routes served by the Books module
pub fn router(store: Arc<BookStore>) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

async fn list_books(State(store): State<Arc<BookStore>>) -> Json<Vec<Book>> {
    Json(store.list().await)
}

async fn get_book(
    State(store): State<Arc<BookStore>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id?;
    Ok(Json(store.get(id).await?))
}

async fn create_book(
    State(store): State<Arc<BookStore>>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(book) = payload?;
    let created = store.create(book).await;

    tracing::info!(actor = %claims.email, book_id = created.id, "book created");
    Ok(Json(created))
}

async fn update_book(
    State(store): State<Arc<BookStore>>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let updated = store.update(id, input).await?;

    tracing::info!(actor = %claims.email, book_id = id, "book updated");
    Ok(Json(updated))
}

async fn delete_book(
    State(store): State<Arc<BookStore>>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    store.delete(id).await?;

    tracing::info!(actor = %claims.email, book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use bookshelf_authz::ADMIN_ROLE;
    use tower::ServiceExt;

    fn app() -> Router {
        let claims = Claims::new("user@example.com", ADMIN_ROLE, i64::MAX);
        router(Arc::new(BookStore::seeded())).layer(Extension(claims))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_list_books() {
        let response = app().oneshot(empty_request("GET", "/books")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let books: Vec<Book> = body_json(response).await;
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "1984");
    }

    #[tokio::test]
    async fn test_get_book_bad_id() {
        let response = app()
            .oneshot(empty_request("GET", "/books/abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_book_not_found() {
        let response = app()
            .oneshot(empty_request("GET", "/books/99"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_book() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/books",
                r#"{"id":3,"title":"Dune","author":"Frank Herbert"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let created: Book = body_json(response).await;
        assert_eq!(created, Book::new(3, "Dune", "Frank Herbert"));

        let response = app.oneshot(empty_request("GET", "/books/3")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Book = body_json(response).await;
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_book_missing_fields_default() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/books", r#"{"title":"t","author":"a"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let created: Book = body_json(response).await;
        assert_eq!(created, Book::new(0, "t", "a"));

        let response = app.oneshot(empty_request("GET", "/books/0")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_book_malformed_body() {
        for body in [r#"{"id":"three"}"#, "not json", r#"{"title":["t"]}"#] {
            let response = app()
                .oneshot(json_request("POST", "/books", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_create_book_without_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/books")
            .body(Body::from(r#"{"id":3,"title":"t","author":"a"}"#))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_book() {
        let response = app()
            .oneshot(json_request(
                "PUT",
                "/books/1",
                r#"{"id":9,"title":"X","author":"Y"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let updated: Book = body_json(response).await;
        assert_eq!(updated, Book::new(1, "X", "Y"));
    }

    #[tokio::test]
    async fn test_partial_update_blanks_missing_fields() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request("PUT", "/books/1", r#"{"title":"X"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Book = body_json(response).await;
        assert_eq!(updated, Book::new(1, "X", ""));

        let response = app
            .oneshot(json_request("PUT", "/books/2", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Book = body_json(response).await;
        assert_eq!(updated, Book::new(2, "", ""));
    }

    #[tokio::test]
    async fn test_update_book_errors() {
        let cases = [
            ("/books/abc", r#"{"title":"X","author":"Y"}"#, StatusCode::BAD_REQUEST),
            ("/books/1", r#"{"title":"X","author":false}"#, StatusCode::BAD_REQUEST),
            ("/books/1", "{", StatusCode::BAD_REQUEST),
            ("/books/99", r#"{"title":"X","author":"Y"}"#, StatusCode::NOT_FOUND),
        ];

        for (uri, body, expected) in cases {
            let response = app()
                .oneshot(json_request("PUT", uri, body))
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "{uri} {body}");
        }
    }

    #[tokio::test]
    async fn test_delete_book() {
        let app = app();
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/books/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/books/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(empty_request("DELETE", "/books/x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
