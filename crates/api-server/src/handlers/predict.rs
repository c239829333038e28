//! Yield prediction handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;
use yieldshift_core::types::YieldPrediction;

use super::require_body;
use crate::error::ApiResult;
use crate::state::AppState;

/// Prediction request. Only documents the body; the handler reads the
/// fields loosely so `asset` (and `chain` for established protocols) can be
/// any JSON value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PredictRequest {
    pub protocol: Option<String>,
    pub chain: Option<String>,
    pub asset: Option<String>,
}

/// Predict the yield trend for a protocol/chain/asset combination.
#[utoipa::path(
    post,
    path = "/api/predict",
    tag = "prediction",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Yield trend prediction", body = YieldPrediction),
        (status = 400, description = "Missing or malformed body", body = crate::error::ErrorResponse),
        (status = 500, description = "Prediction failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<YieldPrediction>> {
    let body = require_body(payload, "No data provided")?;
    let prediction = state.predictor.predict_value(&body)?;

    Ok(Json(prediction))
}
