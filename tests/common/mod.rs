#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use movie_cast_api::model::{Record, ACTOR, CASTING, MOVIE};
use movie_cast_api::{app, AppState, MemoryStore, Store};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn record(v: Value) -> Record {
    match v {
        Value::Object(m) => m,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Movie 1 "X", actor 2 "Y" and one casting linking them.
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .create_many(&MOVIE, vec![record(serde_json::json!({ "id": 1, "title": "X" }))])
        .await
        .unwrap();
    store
        .create_many(&ACTOR, vec![record(serde_json::json!({ "id": 2, "name": "Y" }))])
        .await
        .unwrap();
    store
        .create_many(
            &CASTING,
            vec![record(serde_json::json!({ "movieId": 1, "actorId": 2, "characterName": "Lead" }))],
        )
        .await
        .unwrap();
    store
}

/// Full application router over `store`, same middleware as the server.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    app(AppState { store })
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// PUT declaring a JSON body but sending zero bytes.
pub async fn put_empty_json(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn put_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
