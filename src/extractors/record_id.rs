//! Extract the `:id` path segment as a numeric record id.

use crate::error::AppError;
use crate::model::coerce_id;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Coerced `:id`. `None` when the segment is not a number; such an id matches no row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordId(pub Option<i64>);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(RecordId(coerce_id(&raw)))
    }
}
