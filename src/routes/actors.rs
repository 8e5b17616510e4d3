use crate::handlers::actors::{delete_actor, get_actor, list_actors};
use crate::state::AppState;
use axum::{routing::get, Router};

/// Mounted at `/api/v1/actors`. PUT is served by the read handler and ignores its body.
pub fn actor_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_actors))
        .route("/:id", get(get_actor).put(get_actor).delete(delete_actor))
        .with_state(state)
}
