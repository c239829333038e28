//! Migration scoring.
//!
//! A migration is scored from four factors, each normalized to 0-100:
//! APY uplift, protocol safety, cost efficiency and gas timing. The
//! weighted sum is clamped and rounded to an integer score.

use serde_json::{Map, Value};
use tracing::{debug, warn};
use yieldshift_core::types::{MigrationCosts, ScoreRequest, ScoreResult};

use crate::error::{ScoringError, ScoringResult};

/// Gas price assumed until a live gas feed is wired in (gwei).
pub const ASSUMED_GAS_PRICE_GWEI: f64 = 25.0;

/// Reference gas price for the timing factor (gwei).
pub const AVERAGE_GAS_PRICE_GWEI: f64 = 30.0;

const DAYS_PER_YEAR: f64 = 365.0;

/// Factor weights. They sum to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWeights {
    pub apy: f64,
    pub safety: f64,
    pub cost: f64,
    pub timing: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            apy: 0.40,
            safety: 0.30,
            cost: 0.20,
            timing: 0.10,
        }
    }
}

/// Per-factor scores for a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub apy_diff_percent: f64,
    pub apy_score: f64,
    pub safety_score: f64,
    pub cost_score: f64,
    pub timing_score: f64,
}

impl ScoreBreakdown {
    pub fn compute(request: &ScoreRequest, gas_price_gwei: f64) -> Self {
        let position = &request.current_position;
        let target = &request.target_opportunity;

        let apy_diff_percent = apy_diff_percent(position.current_apy, target.target_apy);

        Self {
            apy_diff_percent,
            apy_score: (apy_diff_percent * 5.0).clamp(0.0, 100.0),
            safety_score: target.protocol_safety_score * 10.0,
            cost_score: cost_score(request.total_cost(), position.amount),
            timing_score: timing_score(gas_price_gwei, AVERAGE_GAS_PRICE_GWEI),
        }
    }

    pub fn weighted(&self, weights: &ScoreWeights) -> f64 {
        self.apy_score * weights.apy
            + self.safety_score * weights.safety
            + self.cost_score * weights.cost
            + self.timing_score * weights.timing
    }

    /// Weighted score clamped to 0-100 and rounded.
    pub fn final_score(&self, weights: &ScoreWeights) -> u32 {
        self.weighted(weights).clamp(0.0, 100.0).round() as u32
    }
}

/// Relative APY improvement in percent. Zero when there is no current APY.
pub fn apy_diff_percent(current_apy: f64, target_apy: f64) -> f64 {
    if current_apy > 0.0 {
        (target_apy - current_apy) / current_apy * 100.0
    } else {
        0.0
    }
}

/// Every 1% of principal spent on costs takes 20 points off.
pub fn cost_score(total_cost: f64, amount: f64) -> f64 {
    let cost_percent = if amount > 0.0 {
        total_cost / amount * 100.0
    } else {
        100.0
    };
    (100.0 - cost_percent * 20.0).max(0.0)
}

/// Full marks at or below the average gas price, linear penalty above it.
pub fn timing_score(gas_price: f64, average_gas_price: f64) -> f64 {
    if gas_price <= average_gas_price {
        100.0
    } else {
        (100.0 - (gas_price - average_gas_price) / average_gas_price * 100.0).max(0.0)
    }
}

/// Scores migration requests.
#[derive(Debug, Clone)]
pub struct MigrationScorer {
    weights: ScoreWeights,
    gas_price_gwei: f64,
}

impl Default for MigrationScorer {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            gas_price_gwei: ASSUMED_GAS_PRICE_GWEI,
        }
    }
}

impl MigrationScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Use an observed gas price for the timing factor.
    pub fn with_gas_price(mut self, gas_price_gwei: f64) -> Self {
        self.gas_price_gwei = gas_price_gwei;
        self
    }

    /// Score a typed request. Fails only on non-finite inputs.
    pub fn score(&self, request: &ScoreRequest) -> ScoringResult<ScoreResult> {
        request.ensure_finite()?;

        let breakdown = ScoreBreakdown::compute(request, self.gas_price_gwei);
        let score = breakdown.final_score(&self.weights);

        let position = &request.current_position;
        let total_cost = request.total_cost();
        let current_annual_yield = position.annual_yield();
        let target_annual_yield = position.amount * request.target_opportunity.target_apy / 100.0;
        let yield_uplift = target_annual_yield - current_annual_yield;

        let daily_gain = yield_uplift / DAYS_PER_YEAR;
        let breakeven = if daily_gain > 0.0 {
            total_cost / daily_gain
        } else {
            f64::INFINITY
        };

        debug!(
            score,
            apy_score = breakdown.apy_score,
            safety_score = breakdown.safety_score,
            cost_score = breakdown.cost_score,
            timing_score = breakdown.timing_score,
            "Scored migration"
        );

        Ok(ScoreResult {
            score,
            annual_gain: (yield_uplift - total_cost).max(0.0),
            breakeven,
            costs: MigrationCosts::new(request.bridge_cost, request.gas_cost),
        })
    }

    /// Score a typed request, falling back to the zeroed result on a fault.
    pub fn score_or_zeroed(&self, request: &ScoreRequest) -> ScoreResult {
        self.score(request).unwrap_or_else(|e| {
            warn!(error = %e, "Error calculating score");
            ScoreResult::zeroed()
        })
    }

    /// Score loosely-typed JSON. Never fails: unreadable or invalid input
    /// yields the zeroed result.
    pub fn score_value(&self, raw: &Value) -> ScoreResult {
        match ScoreRequest::from_value(raw) {
            Ok(request) => self.score_or_zeroed(&request),
            Err(e) => {
                warn!(error = %e, "Error calculating score");
                ScoreResult::zeroed()
            }
        }
    }

    /// Score each opportunity and merge the result fields into a copy of it.
    /// Order and length are preserved.
    pub fn score_batch(&self, opportunities: &[Value]) -> ScoringResult<Vec<Value>> {
        opportunities
            .iter()
            .enumerate()
            .map(|(index, opportunity)| {
                let mut merged: Map<String, Value> = opportunity
                    .as_object()
                    .cloned()
                    .ok_or(ScoringError::NotAnObject { index })?;

                let result = self.score_value(opportunity);
                let fields = serde_json::to_value(&result).map_err(yieldshift_core::Error::from)?;
                if let Value::Object(fields) = fields {
                    merged.extend(fields);
                }

                Ok(Value::Object(merged))
            })
            .collect()
    }
}

/// Score a single migration with the default scorer.
pub fn calculate_migration_score(raw: &Value) -> ScoreResult {
    MigrationScorer::default().score_value(raw)
}

/// Score a typed request with the default scorer.
pub fn score_request(request: &ScoreRequest) -> ScoringResult<ScoreResult> {
    MigrationScorer::default().score(request)
}

/// Score a batch with the default scorer.
pub fn batch_score_opportunities(opportunities: &[Value]) -> ScoringResult<Vec<Value>> {
    MigrationScorer::default().score_batch(opportunities)
}
