//! Migration recommendations handler.
//!
//! Ranks candidate opportunities for each of the caller's positions.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use migration_scorer::{filter_by_score, CandidateOpportunity, Recommendation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use yieldshift_core::types::TrackedPosition;

use crate::error::ApiResult;
use crate::state::AppState;

/// Recommendations request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsRequest {
    pub positions: Vec<TrackedPosition>,
    pub opportunities: Vec<CandidateOpportunity>,
    /// Drop recommendations scoring below this.
    #[serde(default)]
    pub min_score: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Get ranked migration recommendations.
#[utoipa::path(
    post,
    path = "/api/recommendations",
    tag = "recommendations",
    request_body = RecommendationsRequest,
    responses(
        (status = 200, description = "Recommendations, best first", body = RecommendationsResponse),
        (status = 400, description = "Missing positions or opportunities", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendationsRequest>, JsonRejection>,
) -> ApiResult<Json<RecommendationsResponse>> {
    let Json(request) = payload?;

    let mut recommendations = state
        .recommender
        .recommend(&request.positions, &request.opportunities);

    if let Some(min_score) = request.min_score {
        recommendations = filter_by_score(recommendations, min_score);
    }

    Ok(Json(RecommendationsResponse { recommendations }))
}
