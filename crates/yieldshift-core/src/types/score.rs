//! Score requests and results.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Opportunity, Position};
use crate::{Error, Result};

/// Bridge fee assumed when the request omits one (USD).
pub const DEFAULT_BRIDGE_COST: f64 = 3.20;

/// Gas fee assumed when the request omits one (USD).
pub const DEFAULT_GAS_COST: f64 = 0.80;

/// Input to the migration scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreRequest {
    pub current_position: Position,
    pub target_opportunity: Opportunity,
    pub bridge_cost: f64,
    pub gas_cost: f64,
}

impl Default for ScoreRequest {
    fn default() -> Self {
        Self {
            current_position: Position::default(),
            target_opportunity: Opportunity::default(),
            bridge_cost: DEFAULT_BRIDGE_COST,
            gas_cost: DEFAULT_GAS_COST,
        }
    }
}

impl ScoreRequest {
    /// Read a request from loosely-typed JSON, applying field defaults.
    ///
    /// The request and its nested sections must be objects; serde would
    /// otherwise read arrays positionally.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::NotAnObject { field: "request" });
        };
        for field in ["currentPosition", "targetOpportunity"] {
            if object.get(field).is_some_and(|v| !v.is_object()) {
                return Err(Error::NotAnObject { field });
            }
        }
        Ok(Self::deserialize(value)?)
    }

    /// Combined bridge and gas cost.
    pub fn total_cost(&self) -> f64 {
        self.bridge_cost + self.gas_cost
    }

    /// Reject NaN and infinite inputs.
    pub fn ensure_finite(&self) -> Result<()> {
        let fields = [
            ("currentPosition.amount", self.current_position.amount),
            ("currentPosition.currentApy", self.current_position.current_apy),
            ("targetOpportunity.targetApy", self.target_opportunity.target_apy),
            (
                "targetOpportunity.protocolSafetyScore",
                self.target_opportunity.protocol_safety_score,
            ),
            ("bridgeCost", self.bridge_cost),
            ("gasCost", self.gas_cost),
        ];

        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((field, _)) => Err(Error::NonFinite { field: *field }),
            None => Ok(()),
        }
    }
}

/// Migration cost breakdown (USD).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MigrationCosts {
    pub bridge: f64,
    pub gas: f64,
    pub total: f64,
}

impl MigrationCosts {
    pub fn new(bridge: f64, gas: f64) -> Self {
        Self {
            bridge,
            gas,
            total: bridge + gas,
        }
    }
}

/// Output of the migration scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Weighted score, 0 to 100.
    pub score: u32,
    /// Projected yearly gain after costs, never negative.
    pub annual_gain: f64,
    /// Days until the gain covers the costs. `null` on the wire when the
    /// migration never breaks even.
    #[serde(with = "breakeven_days")]
    #[schema(value_type = Option<f64>)]
    pub breakeven: f64,
    pub costs: MigrationCosts,
}

impl ScoreResult {
    /// The safe result returned when scoring faults.
    pub fn zeroed() -> Self {
        Self {
            score: 0,
            annual_gain: 0.0,
            breakeven: f64::INFINITY,
            costs: MigrationCosts::default(),
        }
    }

    pub fn breaks_even(&self) -> bool {
        self.breakeven.is_finite()
    }
}

/// Encodes an infinite breakeven as JSON `null`.
pub mod breakeven_days {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(days: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if days.is_finite() {
            serializer.serialize_f64(*days)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
