//! API request handlers.

pub mod health;
pub mod portfolio;
pub mod predict;
pub mod recommendations;
pub mod score;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Unwrap a JSON body, rejecting absent, empty or falsy payloads.
pub(crate) fn require_body(
    payload: Result<Json<Value>, JsonRejection>,
    message: &str,
) -> ApiResult<Value> {
    let Json(body) = payload?;

    let empty = match &body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    };

    if empty {
        return Err(ApiError::BadRequest(message.to_string()));
    }

    Ok(body)
}
