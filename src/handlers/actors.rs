//! Actor handlers: list, read, delete.

use crate::case::record_to_api;
use crate::error::AppError;
use crate::extractors::RecordId;
use crate::model::ACTOR;
use crate::response::{success_many, success_one_ok};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// GET /api/v1/actors: every actor, no castings.
pub async fn list_actors(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.find_many(&ACTOR, None).await?;
    Ok(success_many(rows.into_iter().map(record_to_api).collect()))
}

/// GET (and PUT) /api/v1/actors/:id: the actor or `null`. Never writes.
pub async fn get_actor(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    let row = match id {
        Some(id) => state.store.find_unique(&ACTOR, id, None).await?,
        None => None,
    };
    Ok(success_one_ok(row.map(record_to_api)))
}

/// DELETE /api/v1/actors/:id: returns the deleted actor; its castings go with it.
pub async fn delete_actor(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    let id = id.ok_or_else(|| AppError::NotFound("actor id is not a number".into()))?;
    let row = state.store.delete(&ACTOR, id).await?;
    tracing::info!(actor_id = id, "actor deleted");
    Ok(success_one_ok(record_to_api(row)))
}
