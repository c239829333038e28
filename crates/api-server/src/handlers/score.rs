//! Migration scoring handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use yieldshift_core::types::{ScoreRequest, ScoreResult};

use super::require_body;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Batch scoring request. Each entry is a score request, optionally with
/// extra fields that are echoed back.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchScoreRequest {
    pub opportunities: Vec<Value>,
}

/// Batch scoring response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchScoreResponse {
    /// Input entries with `score`, `annualGain`, `breakeven` and `costs`
    /// merged in, in input order.
    pub scored_opportunities: Vec<Value>,
}

/// Score a single migration opportunity.
#[utoipa::path(
    post,
    path = "/api/score",
    tag = "scoring",
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Migration score", body = ScoreResult),
        (status = 400, description = "Missing or malformed body", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn score_opportunity(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ScoreResult>> {
    let body = require_body(payload, "No data provided")?;
    let result = state.scorer.score_value(&body);

    info!(
        score = result.score,
        annual_gain = result.annual_gain,
        "Scored migration opportunity"
    );

    Ok(Json(result))
}

/// Score multiple opportunities at once.
#[utoipa::path(
    post,
    path = "/api/batch-score",
    tag = "scoring",
    request_body = BatchScoreRequest,
    responses(
        (status = 200, description = "Scored opportunities in input order", body = BatchScoreResponse),
        (status = 400, description = "Missing opportunities or malformed entry", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn batch_score(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<BatchScoreResponse>> {
    let body = require_body(payload, "No opportunities provided")?;

    let opportunities = match body.get("opportunities") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ApiError::BadRequest(
                "opportunities must be an array".to_string(),
            ))
        }
        None => return Err(ApiError::BadRequest("No opportunities provided".to_string())),
    };

    let scored_opportunities = state.scorer.score_batch(opportunities)?;

    info!(count = scored_opportunities.len(), "Batch scored opportunities");

    Ok(Json(BatchScoreResponse {
        scored_opportunities,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerConfig;
    use serde_json::json;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(&ServerConfig::default()))
    }

    #[tokio::test]
    async fn test_score_opportunity() {
        let body = json!({
            "currentPosition": { "amount": 12300, "currentApy": 8.1 },
            "targetOpportunity": { "targetApy": 14.2, "protocolSafetyScore": 9 }
        });

        let Json(result) = score_opportunity(State(state()), Ok(Json(body)))
            .await
            .unwrap();
        assert_eq!(result.score, 97);
    }

    #[tokio::test]
    async fn test_score_rejects_empty_object() {
        let err = score_opportunity(State(state()), Ok(Json(json!({}))))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_batch_requires_opportunities() {
        let err = batch_score(State(state()), Ok(Json(json!({ "items": [] }))))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "No opportunities provided"));

        let err = batch_score(State(state()), Ok(Json(json!({ "opportunities": {} }))))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_batch_empty_list_is_ok() {
        let Json(response) = batch_score(State(state()), Ok(Json(json!({ "opportunities": [] }))))
            .await
            .unwrap();
        assert!(response.scored_opportunities.is_empty());
    }
}
