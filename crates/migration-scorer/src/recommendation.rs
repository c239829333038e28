//! Migration recommendations.
//!
//! Matches candidate opportunities to the positions they could replace,
//! scores every match and keeps the best few per position.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};
use utoipa::ToSchema;
use yieldshift_core::protocols;
use yieldshift_core::types::{
    Opportunity, ScoreRequest, ScoreResult, TrackedPosition, DEFAULT_BRIDGE_COST,
    DEFAULT_GAS_COST,
};

use crate::scorer::MigrationScorer;

/// Recommendations kept per position.
pub const DEFAULT_RECOMMENDATIONS_PER_POSITION: usize = 3;

/// Score at or above which a migration is urgent.
pub const HIGH_URGENCY_SCORE: u32 = 85;

/// Score at or above which a migration is worth doing soon.
pub const MEDIUM_URGENCY_SCORE: u32 = 70;

/// A pool a position could move into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateOpportunity {
    pub target_protocol: String,
    pub target_chain: String,
    pub asset: String,
    pub target_apy: f64,
    /// Looked up from the protocol registry when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_safety_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvl: Option<f64>,
    /// Any other caller fields (logos, labels), carried into the
    /// recommendation.
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl CandidateOpportunity {
    pub fn safety_score(&self) -> f64 {
        self.protocol_safety_score
            .unwrap_or_else(|| protocols::safety_score_for(&self.target_protocol))
    }

    fn applies_to(&self, position: &TrackedPosition) -> bool {
        let same_asset = position
            .position
            .asset
            .as_deref()
            .is_some_and(|a| a == self.asset);
        same_asset && !position.position.is_on_chain(&self.target_chain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// When to act on a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimingAdvice {
    pub recommendation: String,
    pub reason: String,
    pub urgency: Urgency,
}

impl TimingAdvice {
    pub fn for_score(score: u32, apy_differential: f64) -> Self {
        if score >= HIGH_URGENCY_SCORE {
            Self {
                recommendation: "Move in next 48 hours".to_string(),
                reason: format!(
                    "APY differential of {:.1}% is exceptional",
                    apy_differential
                ),
                urgency: Urgency::High,
            }
        } else if score >= MEDIUM_URGENCY_SCORE {
            Self {
                recommendation: "Good opportunity, consider this week".to_string(),
                reason: "Strong yield improvement potential".to_string(),
                urgency: Urgency::Medium,
            }
        } else {
            Self {
                recommendation: "Monitor for better timing".to_string(),
                reason: "Moderate opportunity, wait for optimal conditions".to_string(),
                urgency: Urgency::Low,
            }
        }
    }
}

/// Keys a recommendation sets itself; candidate extras never override them.
const RECOMMENDATION_KEYS: [&str; 11] = [
    "positionId",
    "targetChainId",
    "amount",
    "currentApy",
    "apyDifferential",
    "score",
    "annualGain",
    "breakeven",
    "costs",
    "timing",
    "migrationSteps",
];

/// A scored candidate for one position.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub position_id: String,
    #[serde(flatten)]
    pub opportunity: CandidateOpportunity,
    pub target_chain_id: u64,
    pub amount: f64,
    pub current_apy: f64,
    pub apy_differential: f64,
    #[serde(flatten)]
    pub result: ScoreResult,
    pub timing: TimingAdvice,
    pub migration_steps: Vec<String>,
}

/// Anything carrying a score for a position.
pub trait Scored {
    fn position_id(&self) -> &str;
    fn score(&self) -> u32;
    fn annual_gain(&self) -> f64;
}

impl Scored for Recommendation {
    fn position_id(&self) -> &str {
        &self.position_id
    }

    fn score(&self) -> u32 {
        self.result.score
    }

    fn annual_gain(&self) -> f64 {
        self.result.annual_gain
    }
}

/// Keep entries scoring at least `min_score`.
pub fn filter_by_score<T: Scored>(scored: Vec<T>, min_score: u32) -> Vec<T> {
    scored.into_iter().filter(|s| s.score() >= min_score).collect()
}

/// Highest-scoring entry for a position. Ties go to the earliest entry.
pub fn best_opportunity<'a, T: Scored>(scored: &'a [T], position_id: &str) -> Option<&'a T> {
    scored
        .iter()
        .filter(|s| s.position_id() == position_id)
        .fold(None, |best: Option<&T>, current| match best {
            Some(b) if current.score() <= b.score() => Some(b),
            _ => Some(current),
        })
}

/// Group entries by position in first-seen order, each group sorted by
/// score descending.
pub fn group_by_position<T: Scored>(scored: Vec<T>) -> Vec<(String, Vec<T>)> {
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();

    for entry in scored {
        match groups.iter_mut().find(|(id, _)| id == entry.position_id()) {
            Some((_, group)) => group.push(entry),
            None => groups.push((entry.position_id().to_string(), vec![entry])),
        }
    }

    for (_, group) in groups.iter_mut() {
        group.sort_by(|a, b| b.score().cmp(&a.score()));
    }

    groups
}

/// Builds ranked recommendations from positions and candidates.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    scorer: MigrationScorer,
    bridge_cost: f64,
    gas_cost: f64,
    per_position: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self {
            scorer: MigrationScorer::default(),
            bridge_cost: DEFAULT_BRIDGE_COST,
            gas_cost: DEFAULT_GAS_COST,
            per_position: DEFAULT_RECOMMENDATIONS_PER_POSITION,
        }
    }
}

impl RecommendationEngine {
    pub fn new(scorer: MigrationScorer) -> Self {
        Self {
            scorer,
            ..Default::default()
        }
    }

    pub fn with_costs(mut self, bridge_cost: f64, gas_cost: f64) -> Self {
        self.bridge_cost = bridge_cost;
        self.gas_cost = gas_cost;
        self
    }

    pub fn with_per_position(mut self, per_position: usize) -> Self {
        self.per_position = per_position;
        self
    }

    /// Score each candidate against each position it applies to and return
    /// the top entries per position, best first overall.
    pub fn recommend(
        &self,
        positions: &[TrackedPosition],
        candidates: &[CandidateOpportunity],
    ) -> Vec<Recommendation> {
        let scored: Vec<Recommendation> = positions
            .iter()
            .flat_map(|position| {
                candidates
                    .iter()
                    .filter(move |c| c.applies_to(position))
                    .map(move |c| self.build(position, c))
            })
            .collect();

        let mut recommendations: Vec<Recommendation> = group_by_position(scored)
            .into_iter()
            .flat_map(|(position_id, mut group)| {
                debug!(
                    position_id = %position_id,
                    candidates = group.len(),
                    "Ranked candidates for position"
                );
                group.truncate(self.per_position);
                group
            })
            .collect();

        recommendations.sort_by(|a, b| b.result.score.cmp(&a.result.score));

        info!(
            positions = positions.len(),
            candidates = candidates.len(),
            recommendations = recommendations.len(),
            "Generated migration recommendations"
        );

        recommendations
    }

    fn build(&self, tracked: &TrackedPosition, candidate: &CandidateOpportunity) -> Recommendation {
        let position = &tracked.position;
        let safety_score = candidate.safety_score();

        let request = ScoreRequest {
            current_position: position.clone(),
            target_opportunity: Opportunity {
                protocol: Some(candidate.target_protocol.clone()),
                chain: Some(candidate.target_chain.clone()),
                target_apy: candidate.target_apy,
                protocol_safety_score: safety_score,
            },
            bridge_cost: self.bridge_cost,
            gas_cost: self.gas_cost,
        };
        let result = self.scorer.score_or_zeroed(&request);

        let apy_differential = candidate.target_apy - position.current_apy;
        let timing = TimingAdvice::for_score(result.score, apy_differential);
        let migration_steps = migration_steps(tracked, candidate, &result);

        Recommendation {
            position_id: tracked.id.clone(),
            opportunity: CandidateOpportunity {
                protocol_safety_score: Some(safety_score),
                extra: candidate
                    .extra
                    .iter()
                    .filter(|(key, _)| !RECOMMENDATION_KEYS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
                ..candidate.clone()
            },
            target_chain_id: protocols::chain_id(&candidate.target_chain),
            amount: position.amount,
            current_apy: position.current_apy,
            apy_differential,
            result,
            timing,
            migration_steps,
        }
    }
}

/// Human-readable steps for carrying out a migration.
pub fn migration_steps(
    tracked: &TrackedPosition,
    candidate: &CandidateOpportunity,
    result: &ScoreResult,
) -> Vec<String> {
    let position = &tracked.position;
    let amount = format_amount(position.amount);
    let asset = &candidate.asset;
    let from_chain = position.chain.as_deref().unwrap_or("Ethereum");
    let to_chain = &candidate.target_chain;
    let protocol = &candidate.target_protocol;

    vec![
        format!(
            "Withdraw {} {} from your current protocol on {}",
            amount, asset, from_chain
        ),
        format!(
            "Bridge {} from {} to {} (estimated fee: ${})",
            asset, from_chain, to_chain, result.costs.bridge
        ),
        format!("Approve {} for {} on {}", asset, protocol, to_chain),
        format!("Deposit {} {} to {} on {}", amount, asset, protocol, to_chain),
        format!("Start earning {:.2}% APY", candidate.target_apy),
    ]
}

/// Format with thousands separators and at most two decimals.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    match fraction {
        0 => format!("{}{}", sign, grouped),
        f if f % 10 == 0 => format!("{}{}.{}", sign, grouped, f / 10),
        f => format!("{}{}.{:02}", sign, grouped, f),
    }
}
