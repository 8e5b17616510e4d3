//! Home route, unmatched paths and unsupported methods.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, get};
use movie_cast_api::MemoryStore;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn home_returns_greeting() {
    let response = get(build_test_app(Arc::new(MemoryStore::new())), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "msg": "API Home" }));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(build_test_app(Arc::new(MemoryStore::new())), "/api/v1/directors").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_method_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/movies/1")
        .body(Body::empty())
        .unwrap();
    let response = build_test_app(Arc::new(MemoryStore::new()))
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let big = "a".repeat(movie_cast_api::routes::BODY_LIMIT_BYTES + 1);
    let body = json!({ "title": big }).to_string();
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/v1/movies/1")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap();
    let response = build_test_app(Arc::new(MemoryStore::new()))
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
