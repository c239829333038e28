//! Target opportunities a position could migrate into.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Safety score assumed when the caller does not provide one.
pub const DEFAULT_PROTOCOL_SAFETY_SCORE: f64 = 8.0;

/// A target yield opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Opportunity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    /// Target APY in percent.
    pub target_apy: f64,
    /// Externally supplied risk rating, 0 to 10.
    pub protocol_safety_score: f64,
}

impl Default for Opportunity {
    fn default() -> Self {
        Self {
            protocol: None,
            chain: None,
            target_apy: 0.0,
            protocol_safety_score: DEFAULT_PROTOCOL_SAFETY_SCORE,
        }
    }
}
