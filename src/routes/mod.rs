//! Route tables and the full application router.

mod actors;
mod home;
mod movies;

pub use actors::actor_routes;
pub use home::home_routes;
pub use movies::movie_routes;

use crate::handlers::{actors::list_actors, movies::list_movies};
use crate::state::AppState;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Request bodies above this size are rejected with 413.
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Home route plus both resource routers under `/api/v1`, with access logging and a body limit.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(home_routes())
        .nest("/api/v1/movies", movie_routes(state.clone()))
        .nest("/api/v1/actors", actor_routes(state.clone()))
        .merge(collection_slash_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES)),
        )
}

/// Nested `/` routes only match without the trailing slash; list both collections at `.../` too.
fn collection_slash_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/movies/", get(list_movies))
        .route("/api/v1/actors/", get(list_actors))
        .with_state(state)
}
