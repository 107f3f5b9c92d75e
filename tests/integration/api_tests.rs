//! API integration tests
//!
//! The router runs in-process over the in-memory store, so no server or
//! database is needed.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, repository::Repository, AppConfig, AppState};

const BASE_URL: &str = "/api/v1";

fn app() -> Router {
    api::router(AppState::new(AppConfig::default(), Repository::in_memory()))
}

async fn send(app: &Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(format!("{}{}", BASE_URL, path));

    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).expect("Failed to build request"))
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };

    (status, body)
}

async fn create_book(app: &Router, title: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/books",
        Some(json!({ "title": title, "author": "Test Author" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("No book ID")
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_book_lifecycle() {
    let app = app();
    let id = create_book(&app, "Test Book").await;

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Test Book");

    // An id in the body must not override the path id
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({ "id": 999, "title": "Renamed", "author": "Someone", "isbn": "978-0-00-000000-0" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["title"], "Renamed");

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = send(&app, Method::DELETE, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBook");
    assert_eq!(body["message"], format!("Book not found with id: {}", id));
}

#[tokio::test]
async fn test_update_missing_book() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/5",
        Some(json!({ "title": "T", "author": "A" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found with id: 5");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/books", Some(json!({ "title": "No author" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = app();

    for (method, path) in [
        (Method::GET, "/books/abc"),
        (Method::DELETE, "/books/abc"),
        (Method::GET, "/users/abc"),
        (Method::DELETE, "/users/abc"),
    ] {
        let (status, body) = send(&app, method, path, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BadValue");
        assert_eq!(body["code"], 18);
    }

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/abc",
        Some(json!({ "title": "T", "author": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_create_user_requires_existing_book() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "Test", "last_name": "User", "book_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found with id: 999");

    let (_, body) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_user_lifecycle_and_book_conflict() {
    let app = app();
    let first_book = create_book(&app, "First").await;
    let second_book = create_book(&app, "Second").await;

    let (status, user) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "Test", "last_name": "User", "phone": "555-0100", "book_id": first_book })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_i64().expect("No user ID");
    assert_eq!(user["book_id"], first_book);

    // Referenced book cannot be deleted
    let (status, body) = send(&app, Method::DELETE, &format!("/books/{}", first_book), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BookInUse");
    let (status, _) = send(&app, Method::GET, &format!("/books/{}", first_book), None).await;
    assert_eq!(status, StatusCode::OK);

    // Re-point to a missing book: rejected, user unchanged
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/users/{}", user_id),
        Some(json!({ "name": "Changed", "last_name": "User", "book_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found with id: 999");
    let (_, current) = send(&app, Method::GET, &format!("/users/{}", user_id), None).await;
    assert_eq!(current, user);

    // Re-point to the second book
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/users/{}", user_id),
        Some(json!({ "name": "Changed", "last_name": "User", "book_id": second_book })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], user_id);
    assert_eq!(updated["name"], "Changed");
    assert_eq!(updated["phone"], Value::Null);
    assert_eq!(updated["book_id"], second_book);
    assert_eq!(updated["created_at"], user["created_at"]);

    // The first book is free again
    let (status, _) = send(&app, Method::DELETE, &format!("/books/{}", first_book), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Deleting a user twice is fine
    for _ in 0..2 {
        let (status, _) = send(&app, Method::DELETE, &format!("/users/{}", user_id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    let (status, body) = send(&app, Method::GET, &format!("/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchUser");
}

#[tokio::test]
async fn test_update_missing_user() {
    let app = app();
    let book = create_book(&app, "Any").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/users/41",
        Some(json!({ "name": "A", "last_name": "B", "book_id": book })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found with id: 41");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}
