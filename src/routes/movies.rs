use crate::handlers::movies::{delete_movie, get_movie, list_movies, update_movie};
use crate::state::AppState;
use axum::{routing::get, Router};

/// Mounted at `/api/v1/movies`.
pub fn movie_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_movies))
        .route("/:id", get(get_movie).put(update_movie).delete(delete_movie))
        .with_state(state)
}
