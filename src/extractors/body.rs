//! Decode an update body from JSON or URL-encoded form data.

use crate::error::AppError;
use crate::model::Record;
use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use serde_json::Value;

/// Raw update fields, keys as the client sent them.
///
/// `application/json` must be an object; `application/x-www-form-urlencoded` yields string
/// values; any other content type (or none), or an empty body, is an empty field set.
#[derive(Debug, Default)]
pub struct FieldSet(pub Record);

#[async_trait]
impl<S> FromRequest<S> for FieldSet
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        let is_json = content_type.starts_with("application/json");
        let is_form = content_type.starts_with("application/x-www-form-urlencoded");
        if !is_json && !is_form {
            return Ok(FieldSet::default());
        }

        let method = req.method().clone();
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?;
        if bytes.is_empty() {
            return Ok(FieldSet::default());
        }

        if is_json {
            let Json(value) =
                Json::<Value>::from_bytes(&bytes).map_err(|e| rejection(e.status(), e.body_text()))?;
            match value {
                Value::Object(map) => Ok(FieldSet(map)),
                _ => Err(AppError::BadRequest("body must be a JSON object".into())),
            }
        } else {
            let req = Request::builder()
                .method(method)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(bytes))
                .map_err(|e| AppError::Internal(e.to_string()))?;
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            Ok(FieldSet(
                pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect(),
            ))
        }
    }
}

/// Keep the 413 from the body limit; every other decode failure is the client's malformed body.
fn rejection(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::BadRequest(message)
    }
}
