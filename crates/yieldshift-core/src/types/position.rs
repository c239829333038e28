//! Yield positions currently held by a wallet.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A yield-bearing position the user currently holds.
///
/// Every field is optional on the wire. Missing numbers read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    /// Protocol identifier (e.g. `aave-v3`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Chain the position lives on (e.g. `ethereum`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    /// Asset symbol (e.g. `USDC`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// Principal in asset units.
    pub amount: f64,
    /// Current APY in percent.
    pub current_apy: f64,
}

impl Position {
    /// Yearly yield at the current APY.
    pub fn annual_yield(&self) -> f64 {
        annual_yield(self.amount, self.current_apy)
    }

    /// Case-insensitive chain comparison.
    pub fn is_on_chain(&self, chain: &str) -> bool {
        self.chain
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(chain))
    }
}

/// A position with the identifier the frontend uses to group opportunities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPosition {
    pub id: String,
    #[serde(flatten)]
    pub position: Position,
}

/// Yearly yield of `principal` at `apy` percent.
pub fn annual_yield(principal: f64, apy: f64) -> f64 {
    principal * apy / 100.0
}
