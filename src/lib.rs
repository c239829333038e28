//! YieldShift: DeFi yield migration scoring
//!
//! This is the root crate that provides benchmark access to the internal modules.
//! For actual functionality, use the individual crates directly:
//!
//! - `yieldshift-core`: Position, opportunity and score types, protocol registry
//! - `migration-scorer`: Migration scoring, yield prediction, recommendations, health
//! - `api-server`: REST API server

// Re-export for benchmarks
pub use migration_scorer as scorer;
pub use yieldshift_core as core;
