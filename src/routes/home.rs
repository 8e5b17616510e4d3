use crate::handlers::home::home;
use axum::{routing::get, Router};

/// GET / (no state).
pub fn home_routes() -> Router {
    Router::new().route("/", get(home))
}
