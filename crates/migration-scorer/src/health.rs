//! Position and portfolio health.
//!
//! Health measures how much yield a position leaves on the table compared
//! with the best migration found for it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use yieldshift_core::types::{Position, TrackedPosition};

use crate::recommendation::{best_opportunity, Scored, HIGH_URGENCY_SCORE, MEDIUM_URGENCY_SCORE};

/// A previously scored opportunity, as returned by the recommendations
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoredOpportunity {
    pub position_id: String,
    pub score: u32,
    #[serde(default)]
    pub annual_gain: f64,
}

impl Scored for ScoredOpportunity {
    fn position_id(&self) -> &str {
        &self.position_id
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn annual_gain(&self) -> f64 {
        self.annual_gain
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Optimal,
    Underperforming,
    Critical,
}

impl PositionStatus {
    /// Status from the best score found for a position, if any.
    pub fn from_best_score(best_score: Option<u32>) -> Self {
        match best_score {
            Some(score) if score >= HIGH_URGENCY_SCORE => Self::Critical,
            Some(score) if score >= MEDIUM_URGENCY_SCORE => Self::Underperforming,
            _ => Self::Optimal,
        }
    }
}

/// Health of a position given its best migration.
///
/// Returns 100 when nothing better exists and 50 when the position earns
/// nothing. Otherwise the forgone gain as a share of current yield maps to
/// 20 (over 40%), 50 (over 20%), 75 (over 10%) or 100.
pub fn position_health<T: Scored>(position: &Position, best: Option<&T>) -> u32 {
    let Some(best) = best else {
        return 100;
    };

    let current_yield = position.annual_yield();
    if current_yield == 0.0 {
        return 50;
    }

    let loss_percent = best.annual_gain() / current_yield * 100.0;
    if loss_percent > 40.0 {
        20
    } else if loss_percent > 20.0 {
        50
    } else if loss_percent > 10.0 {
        75
    } else {
        100
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionHealth {
    pub position_id: String,
    pub health: u32,
    pub status: PositionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHealth {
    /// Mean position health, rounded. 100 for an empty portfolio.
    pub health_score: u32,
    pub positions: Vec<PositionHealth>,
}

pub fn portfolio_health<T: Scored>(positions: &[TrackedPosition], scored: &[T]) -> PortfolioHealth {
    let breakdown: Vec<PositionHealth> = positions
        .iter()
        .map(|tracked| {
            let best = best_opportunity(scored, &tracked.id);
            PositionHealth {
                position_id: tracked.id.clone(),
                health: position_health(&tracked.position, best),
                status: PositionStatus::from_best_score(best.map(Scored::score)),
            }
        })
        .collect();

    let health_score = if breakdown.is_empty() {
        100
    } else {
        let total: u32 = breakdown.iter().map(|p| p.health).sum();
        (total as f64 / breakdown.len() as f64).round() as u32
    };

    PortfolioHealth {
        health_score,
        positions: breakdown,
    }
}
