//! HTTP-level tests for /api/v1/movies, driven through the full router without a listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, put_empty_json, put_form, put_json, seeded_store};
use movie_cast_api::model::{CASTING, MOVIE};
use movie_cast_api::Store;
use serde_json::{json, Value};

#[tokio::test]
async fn list_embeds_actor_objects_in_casting() {
    let store = seeded_store().await;
    let response = get(build_test_app(store), "/api/v1/movies").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let movies = json["data"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["id"], 1);
    assert_eq!(movies[0]["title"], "X");
    let casting = movies[0]["casting"].as_array().unwrap();
    assert_eq!(casting.len(), 1);
    assert_eq!(casting[0]["actor"]["id"], 2);
    assert_eq!(casting[0]["actor"]["name"], "Y");
    assert!(casting[0].get("movieId").is_none(), "list casting is an actor projection");
}

#[tokio::test]
async fn list_is_served_with_and_without_trailing_slash() {
    let store = seeded_store().await;
    let plain = body_json(get(build_test_app(store.clone()), "/api/v1/movies").await).await;

    let response = get(build_test_app(store), "/api/v1/movies/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, plain);
}

#[tokio::test]
async fn detail_embeds_full_casting_rows() {
    let store = seeded_store().await;
    let json = body_json(get(build_test_app(store), "/api/v1/movies/1").await).await;

    let movie = &json["data"];
    assert_eq!(movie["id"], 1);
    assert_eq!(movie["title"], "X");
    assert_eq!(movie["releaseYear"], Value::Null);
    assert!(movie["createdAt"].is_string());
    let casting = &movie["casting"][0];
    assert_eq!(casting["movieId"], 1);
    assert_eq!(casting["actorId"], 2);
    assert_eq!(casting["characterName"], "Lead");
    assert!(casting.get("actor").is_none(), "detail casting rows are not expanded");
}

#[tokio::test]
async fn absent_or_non_numeric_id_reads_as_null() {
    let store = seeded_store().await;
    for uri in ["/api/v1/movies/999", "/api/v1/movies/abc", "/api/v1/movies/1.5"] {
        let response = get(build_test_app(store.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(body_json(response).await, json!({ "data": null }), "{uri}");
    }
}

#[tokio::test]
async fn update_applies_the_body_and_returns_the_row() {
    let store = seeded_store().await;
    let response = put_json(
        build_test_app(store.clone()),
        "/api/v1/movies/1",
        json!({ "title": "X2", "releaseYear": 2001, "genre": "drama" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "X2");
    assert_eq!(json["data"]["releaseYear"], 2001);
    assert!(json["data"].get("casting").is_none());

    let stored = store.find_unique(&MOVIE, 1, None).await.unwrap().unwrap();
    assert_eq!(stored["genre"], "drama");
}

#[tokio::test]
async fn update_accepts_url_encoded_bodies() {
    let store = seeded_store().await;
    let response = put_form(build_test_app(store), "/api/v1/movies/1", "title=Form+Title&releaseYear=1984").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Form Title");
    assert_eq!(json["data"]["releaseYear"], 1984);
}

#[tokio::test]
async fn empty_json_body_is_an_empty_update() {
    let store = seeded_store().await;
    let before = store.find_unique(&MOVIE, 1, None).await.unwrap().unwrap();

    let response = put_empty_json(build_test_app(store.clone()), "/api/v1/movies/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "X");
    assert!(json["data"]["updatedAt"].is_string());

    let after = store.find_unique(&MOVIE, 1, None).await.unwrap().unwrap();
    for (key, value) in &before {
        if key != "updated_at" {
            assert_eq!(after.get(key), Some(value), "{key} changed");
        }
    }
}

#[tokio::test]
async fn update_of_missing_movie_is_404_and_server_keeps_serving() {
    let store = seeded_store().await;
    let response = put_json(build_test_app(store.clone()), "/api/v1/movies/999", json!({ "title": "Z" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_found");

    let response = get(build_test_app(store), "/api/v1/movies/1").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_with_non_numeric_id_is_404() {
    let store = seeded_store().await;
    let response = put_json(build_test_app(store), "/api/v1/movies/abc", json!({ "title": "Z" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_update_bodies_are_400() {
    let store = seeded_store().await;
    for body in [
        json!({ "director": "nobody" }),
        json!({ "title": null }),
        json!({ "releaseYear": "next year" }),
        json!({ "id": 7 }),
        json!(["title"]),
    ] {
        let response = put_json(build_test_app(store.clone()), "/api/v1/movies/1", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
    let stored = store.find_unique(&MOVIE, 1, None).await.unwrap().unwrap();
    assert_eq!(stored["title"], "X");
}

#[tokio::test]
async fn delete_returns_the_row_then_reads_null() {
    let store = seeded_store().await;
    let response = delete(build_test_app(store.clone()), "/api/v1/movies/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], 1);
    assert_eq!(json["data"]["title"], "X");

    let json = body_json(get(build_test_app(store.clone()), "/api/v1/movies/1").await).await;
    assert_eq!(json, json!({ "data": null }));

    assert!(store.find_many(&CASTING, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_of_missing_movie_is_404() {
    let store = seeded_store().await;
    let response = delete(build_test_app(store), "/api/v1/movies/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_store_lists_empty_array() {
    let store = std::sync::Arc::new(movie_cast_api::MemoryStore::new());
    let json = body_json(get(build_test_app(store), "/api/v1/movies").await).await;
    assert_eq!(json, json!({ "data": [] }));
}
