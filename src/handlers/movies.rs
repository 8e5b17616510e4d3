//! Movie handlers: list, read, update, delete.

use crate::case::record_to_api;
use crate::error::AppError;
use crate::extractors::{FieldSet, RecordId};
use crate::model::{coerce_update, MOVIE, MOVIE_DETAIL_INCLUDE, MOVIE_LIST_INCLUDE};
use crate::response::{success_many, success_one_ok};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// GET /api/v1/movies: every movie with `casting: [{ actor }]`.
pub async fn list_movies(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.find_many(&MOVIE, Some(&MOVIE_LIST_INCLUDE)).await?;
    Ok(success_many(rows.into_iter().map(record_to_api).collect()))
}

/// GET /api/v1/movies/:id: the movie with full casting rows, or `null`.
pub async fn get_movie(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    let row = match id {
        Some(id) => state.store.find_unique(&MOVIE, id, Some(&MOVIE_DETAIL_INCLUDE)).await?,
        None => None,
    };
    Ok(success_one_ok(row.map(record_to_api)))
}

/// PUT /api/v1/movies/:id: apply the body as the field set.
pub async fn update_movie(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    FieldSet(body): FieldSet,
) -> Result<impl IntoResponse, AppError> {
    let id = id.ok_or_else(|| AppError::NotFound("movie id is not a number".into()))?;
    let fields = coerce_update(&MOVIE, id, body)?;
    let row = state.store.update(&MOVIE, id, fields).await?;
    tracing::info!(movie_id = id, "movie updated");
    Ok(success_one_ok(record_to_api(row)))
}

/// DELETE /api/v1/movies/:id: returns the deleted movie; its castings go with it.
pub async fn delete_movie(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    let id = id.ok_or_else(|| AppError::NotFound("movie id is not a number".into()))?;
    let row = state.store.delete(&MOVIE, id).await?;
    tracing::info!(movie_id = id, "movie deleted");
    Ok(success_one_ok(record_to_api(row)))
}
