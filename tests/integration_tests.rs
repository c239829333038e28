//! Integration tests for component interactions.
//!
//! These tests verify that the scorer, predictor, recommender and API work
//! together correctly.

use serde_json::json;

/// A scored request from raw JSON matches the worked reference values.
#[test]
fn test_reference_migration_score() {
    use migration_scorer::calculate_migration_score;

    let payload = json!({
        "currentPosition": {
            "protocol": "aave-v3",
            "chain": "ethereum",
            "asset": "USDC",
            "amount": 12300,
            "currentApy": 8.1
        },
        "targetOpportunity": {
            "protocol": "aave-v3",
            "chain": "base",
            "targetApy": 14.2,
            "protocolSafetyScore": 9
        },
        "bridgeCost": 3.20,
        "gasCost": 0.80
    });

    let result = calculate_migration_score(&payload);

    assert_eq!(result.score, 97);
    assert!((result.annual_gain - 746.3).abs() < 1e-9);
    assert!((result.breakeven - 1.946).abs() < 0.001);
    assert_eq!(result.costs.total, 4.0);
}

/// Bad input never escapes the scorer as an error.
#[test]
fn test_scoring_is_fail_soft() {
    use migration_scorer::calculate_migration_score;
    use yieldshift_core::types::ScoreResult;

    let result = calculate_migration_score(&json!({
        "currentPosition": { "amount": "twelve thousand" }
    }));
    assert_eq!(result, ScoreResult::zeroed());

    let result = calculate_migration_score(&json!([1, 2, 3]));
    assert_eq!(result, ScoreResult::zeroed());
}

/// Batch scoring keeps order and carries through caller fields.
#[test]
fn test_batch_scoring_preserves_order() {
    use migration_scorer::{batch_score_opportunities, ScoringError};

    let batch = vec![
        json!({ "id": "a", "currentPosition": { "amount": 1000, "currentApy": 2 }, "targetOpportunity": { "targetApy": 12 } }),
        json!({ "id": "b" }),
    ];

    let scored = batch_score_opportunities(&batch).unwrap();
    assert_eq!(scored.len(), 2);
    assert_eq!(scored[0]["id"], "a");
    assert_eq!(scored[1]["id"], "b");
    assert_eq!(scored[1]["score"], 34);

    let err = batch_score_opportunities(&[json!({}), json!("nope")]).unwrap_err();
    assert!(matches!(err, ScoringError::NotAnObject { index: 1 }));
}

/// A seeded predictor is reproducible and respects the heuristic rules.
#[test]
fn test_seeded_predictor_is_reproducible() {
    use migration_scorer::YieldPredictor;
    use yieldshift_core::types::{Prediction, Trend};

    let first = YieldPredictor::with_seed(99);
    let second = YieldPredictor::with_seed(99);

    for _ in 0..20 {
        let a = first.predict(Some("morpho"), Some("base"), Some("USDC")).unwrap();
        let b = second.predict(Some("morpho"), Some("base"), Some("USDC")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.prediction, Prediction::Stable);
        assert_eq!(a.trend, Trend::Up);
    }

    assert!(first.predict(None, Some("base"), None).is_err());
}

/// Recommendations feed straight into portfolio health.
#[test]
fn test_recommendations_drive_portfolio_health() {
    use migration_scorer::{portfolio_health, CandidateOpportunity, PositionStatus, RecommendationEngine};
    use yieldshift_core::types::{Position, TrackedPosition};

    let positions = vec![
        TrackedPosition {
            id: "1".to_string(),
            position: Position {
                protocol: Some("aave-v3".to_string()),
                chain: Some("ethereum".to_string()),
                asset: Some("USDC".to_string()),
                amount: 12300.0,
                current_apy: 8.1,
            },
        },
        TrackedPosition {
            id: "2".to_string(),
            position: Position {
                protocol: Some("aave-v3".to_string()),
                chain: Some("ethereum".to_string()),
                asset: Some("DAI".to_string()),
                amount: 5000.0,
                current_apy: 4.0,
            },
        },
    ];
    let candidates = vec![
        CandidateOpportunity {
            target_protocol: "Aave V3".to_string(),
            target_chain: "base".to_string(),
            asset: "USDC".to_string(),
            target_apy: 14.2,
            protocol_safety_score: None,
            tvl: None,
            extra: Default::default(),
        },
        // Same chain as the position, never recommended
        CandidateOpportunity {
            target_protocol: "Aave V3".to_string(),
            target_chain: "ethereum".to_string(),
            asset: "USDC".to_string(),
            target_apy: 30.0,
            protocol_safety_score: None,
            tvl: None,
            extra: Default::default(),
        },
    ];

    let recommendations = RecommendationEngine::default().recommend(&positions, &candidates);
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].position_id, "1");
    assert_eq!(recommendations[0].result.score, 97);
    assert_eq!(recommendations[0].target_chain_id, 8453);

    let health = portfolio_health(&positions, &recommendations);
    assert_eq!(health.positions[0].health, 20);
    assert_eq!(health.positions[0].status, PositionStatus::Critical);
    assert_eq!(health.positions[1].health, 100);
    assert_eq!(health.positions[1].status, PositionStatus::Optimal);
    assert_eq!(health.health_score, 60);
}

/// The configured server router answers health checks.
#[tokio::test]
async fn test_server_router_health() {
    use api_server::{ApiServer, ServerConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    let config = ServerConfig {
        service_name: "integration".to_string(),
        ..Default::default()
    };
    let router = ApiServer::new(config).router();

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "integration");
}
