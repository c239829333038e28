//! Migration Scorer
//!
//! Scores yield migrations, predicts yield trends and ranks migration
//! recommendations for the YieldShift service.
//!
//! # Components
//!
//! - **Scorer**: weighted heuristic over APY uplift, protocol safety, cost
//!   efficiency and gas timing
//! - **Predictor**: heuristic trend labels with a seedable random source
//! - **Recommendations**: top opportunities per position with timing advice
//! - **Health**: per-position and portfolio health scores

pub mod error;
pub mod health;
pub mod predictor;
pub mod recommendation;
pub mod scorer;

pub use error::{PredictionError, PredictionResult, ScoringError, ScoringResult};
pub use health::{
    portfolio_health, position_health, PortfolioHealth, PositionHealth, PositionStatus,
    ScoredOpportunity,
};
pub use predictor::{predict_yield, YieldPredictor};
pub use recommendation::{
    best_opportunity, filter_by_score, group_by_position, CandidateOpportunity, Recommendation,
    RecommendationEngine, Scored, TimingAdvice, Urgency,
};
pub use scorer::{
    batch_score_opportunities, calculate_migration_score, score_request, MigrationScorer,
    ScoreWeights,
};
