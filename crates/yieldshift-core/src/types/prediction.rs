//! Yield trend predictions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Predicted direction of a pool's APY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    Stable,
    Increasing,
    Decreasing,
}

impl Prediction {
    pub const ALL: [Prediction; 3] = [Self::Stable, Self::Increasing, Self::Decreasing];
}

/// Short-term trend label shown next to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Neutral,
    Down,
}

impl Trend {
    pub const ALL: [Trend; 3] = [Self::Up, Self::Neutral, Self::Down];
}

/// Prediction for a protocol/chain/asset combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct YieldPrediction {
    pub prediction: Prediction,
    /// Confidence in `[0, 1]`, two decimals.
    pub confidence: f64,
    pub trend: Trend,
    pub protocol: String,
    /// Echoed from the request as given.
    #[schema(value_type = Option<String>)]
    pub chain: Option<Value>,
    /// Echoed from the request as given.
    #[schema(value_type = Option<String>)]
    pub asset: Option<Value>,
}
