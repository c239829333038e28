//! Portfolio health handler.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use migration_scorer::{portfolio_health, PortfolioHealth, ScoredOpportunity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use yieldshift_core::types::TrackedPosition;

use crate::error::ApiResult;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PortfolioHealthRequest {
    pub positions: Vec<TrackedPosition>,
    /// Scored opportunities, e.g. the output of `/api/recommendations`.
    pub opportunities: Vec<ScoredOpportunity>,
}

/// Compute per-position and overall portfolio health.
#[utoipa::path(
    post,
    path = "/api/portfolio-health",
    tag = "recommendations",
    request_body = PortfolioHealthRequest,
    responses(
        (status = 200, description = "Portfolio health", body = PortfolioHealth),
        (status = 400, description = "Missing positions or opportunities", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_portfolio_health(
    payload: Result<Json<PortfolioHealthRequest>, JsonRejection>,
) -> ApiResult<Json<PortfolioHealth>> {
    let Json(request) = payload?;
    let health = portfolio_health(&request.positions, &request.opportunities);

    tracing::debug!(
        positions = request.positions.len(),
        health_score = health.health_score,
        "Computed portfolio health"
    );

    Ok(Json(health))
}
