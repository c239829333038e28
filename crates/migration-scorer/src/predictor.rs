//! Heuristic yield trend predictor.
//!
//! Placeholder for a trained model: established lending protocols are
//! called stable, Base pools are called stable with an upward trend, and
//! everything else gets a random label. Confidence is drawn uniformly from
//! a band that depends on which rule matched.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::debug;
use yieldshift_core::types::{Prediction, Trend, YieldPrediction};

use crate::error::{PredictionError, PredictionResult};

/// Protocols treated as established (matched case-insensitively).
pub const ESTABLISHED_PROTOCOLS: [&str; 2] = ["aave-v3", "compound-v3"];

/// Chain whose incentives bias the trend upward.
pub const INCENTIVIZED_CHAIN: &str = "base";

/// Uniform confidence band `[low, low + width)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ConfidenceBand {
    low: f64,
    width: f64,
}

impl ConfidenceBand {
    const ESTABLISHED: Self = Self {
        low: 0.75,
        width: 0.15,
    };
    const INCENTIVIZED: Self = Self {
        low: 0.65,
        width: 0.20,
    };
    const UNKNOWN: Self = Self {
        low: 0.50,
        width: 0.30,
    };

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.low + rng.random::<f64>() * self.width
    }
}

fn is_established(protocol: &str) -> bool {
    ESTABLISHED_PROTOCOLS
        .iter()
        .any(|p| p.eq_ignore_ascii_case(protocol))
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Read a required string field. JSON `null` counts as missing.
fn text_field<'a>(value: Option<&'a Value>, field: &'static str) -> PredictionResult<&'a str> {
    match value {
        None | Some(Value::Null) => Err(PredictionError::MissingField { field }),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(PredictionError::NotAString { field }),
    }
}

fn echoed(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

/// Predict with an explicit random source.
///
/// `protocol` must be a string. `chain` is only consulted (and so only
/// required to be a string) when the protocol is not an established one.
/// `chain` and `asset` are echoed back as given.
pub fn predict_with<R: Rng + ?Sized>(
    rng: &mut R,
    protocol: Option<&Value>,
    chain: Option<&Value>,
    asset: Option<&Value>,
) -> PredictionResult<YieldPrediction> {
    let protocol = text_field(protocol, "protocol")?;

    let (prediction, trend, confidence) = if is_established(protocol) {
        (
            Prediction::Stable,
            Trend::Neutral,
            ConfidenceBand::ESTABLISHED.sample(rng),
        )
    } else {
        let chain_name = text_field(chain, "chain")?;
        if chain_name.eq_ignore_ascii_case(INCENTIVIZED_CHAIN) {
            (
                Prediction::Stable,
                Trend::Up,
                ConfidenceBand::INCENTIVIZED.sample(rng),
            )
        } else {
            let prediction = Prediction::ALL[rng.random_range(0..Prediction::ALL.len())];
            let confidence = ConfidenceBand::UNKNOWN.sample(rng);
            let trend = Trend::ALL[rng.random_range(0..Trend::ALL.len())];
            (prediction, trend, confidence)
        }
    };

    debug!(
        protocol,
        chain = ?chain,
        prediction = ?prediction,
        trend = ?trend,
        confidence,
        "Predicted yield trend"
    );

    Ok(YieldPrediction {
        prediction,
        confidence: round_to_cents(confidence),
        trend,
        protocol: protocol.to_string(),
        chain: echoed(chain),
        asset: echoed(asset),
    })
}

/// Predict using the thread-local random source.
pub fn predict_yield(protocol: &str, chain: &str, asset: &str) -> PredictionResult<YieldPrediction> {
    predict_with(
        &mut rand::rng(),
        Some(&Value::from(protocol)),
        Some(&Value::from(chain)),
        Some(&Value::from(asset)),
    )
}

/// Predictor owning its random source, shareable across request handlers.
pub struct YieldPredictor<R = StdRng> {
    rng: Mutex<R>,
}

impl YieldPredictor<StdRng> {
    /// Create a predictor seeded from the OS.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Create a reproducible predictor.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for YieldPredictor<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> YieldPredictor<R> {
    pub fn from_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn predict(
        &self,
        protocol: Option<&str>,
        chain: Option<&str>,
        asset: Option<&str>,
    ) -> PredictionResult<YieldPrediction> {
        let protocol = protocol.map(Value::from);
        let chain = chain.map(Value::from);
        let asset = asset.map(Value::from);
        self.predict_fields(protocol.as_ref(), chain.as_ref(), asset.as_ref())
    }

    /// Predict from a request body with `protocol`, `chain` and `asset` keys.
    pub fn predict_value(&self, body: &Value) -> PredictionResult<YieldPrediction> {
        let fields = body.as_object().ok_or(PredictionError::NotAnObject)?;
        self.predict_fields(fields.get("protocol"), fields.get("chain"), fields.get("asset"))
    }

    fn predict_fields(
        &self,
        protocol: Option<&Value>,
        chain: Option<&Value>,
        asset: Option<&Value>,
    ) -> PredictionResult<YieldPrediction> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        predict_with(&mut *rng, protocol, chain, asset)
    }
}
