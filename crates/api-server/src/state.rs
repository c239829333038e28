//! Application state shared across handlers.

use migration_scorer::{MigrationScorer, RecommendationEngine, YieldPredictor};

use crate::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Name reported by the health endpoint.
    pub service_name: String,
    /// Migration scorer.
    pub scorer: MigrationScorer,
    /// Yield trend predictor. Holds its own random source.
    pub predictor: YieldPredictor,
    /// Recommendation engine.
    pub recommender: RecommendationEngine,
}

impl AppState {
    /// Create state from server configuration with an OS-seeded predictor.
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_predictor(config, YieldPredictor::new())
    }

    /// Create state with an explicit predictor (e.g. a seeded one).
    pub fn with_predictor(config: &ServerConfig, predictor: YieldPredictor) -> Self {
        let scorer = MigrationScorer::default();
        Self {
            service_name: config.service_name.clone(),
            recommender: RecommendationEngine::new(scorer.clone()),
            scorer,
            predictor,
        }
    }
}
