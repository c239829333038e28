//! API route definitions.

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;
use crate::handlers::{health, portfolio, predict, recommendations, score};
use crate::state::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "YieldShift ML Service",
        version = "1.0.0",
        description = "Migration scoring and yield prediction for DeFi positions"
    ),
    paths(
        health::health_check,
        score::score_opportunity,
        score::batch_score,
        predict::predict,
        recommendations::get_recommendations,
        portfolio::get_portfolio_health,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            health::HealthResponse,
            score::BatchScoreRequest,
            score::BatchScoreResponse,
            predict::PredictRequest,
            recommendations::RecommendationsRequest,
            recommendations::RecommendationsResponse,
            portfolio::PortfolioHealthRequest,
            yieldshift_core::types::Position,
            yieldshift_core::types::TrackedPosition,
            yieldshift_core::types::Opportunity,
            yieldshift_core::types::ScoreRequest,
            yieldshift_core::types::ScoreResult,
            yieldshift_core::types::MigrationCosts,
            yieldshift_core::types::YieldPrediction,
            yieldshift_core::types::Prediction,
            yieldshift_core::types::Trend,
            migration_scorer::CandidateOpportunity,
            migration_scorer::Recommendation,
            migration_scorer::TimingAdvice,
            migration_scorer::Urgency,
            migration_scorer::ScoredOpportunity,
            migration_scorer::PortfolioHealth,
            migration_scorer::PositionHealth,
            migration_scorer::PositionStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scoring", description = "Migration scoring"),
        (name = "prediction", description = "Yield trend prediction"),
        (name = "recommendations", description = "Migration recommendations and portfolio health"),
    )
)]
pub struct ApiDoc;

/// Served endpoints, logged at startup.
pub const ENDPOINTS: [(&str, &str); 7] = [
    ("GET", "/health"),
    ("POST", "/api/score"),
    ("POST", "/api/batch-score"),
    ("POST", "/api/predict"),
    ("POST", "/api/recommendations"),
    ("POST", "/api/portfolio-health"),
    ("GET", "/swagger-ui"),
];

async fn not_found() -> ApiError {
    ApiError::NotFound("No such route".to_string())
}

/// Create the main router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))

        // Scoring endpoints
        .route("/api/score", post(score::score_opportunity))
        .route("/api/batch-score", post(score::batch_score))

        // Prediction endpoints
        .route("/api/predict", post(predict::predict))

        // Recommendation endpoints
        .route("/api/recommendations", post(recommendations::get_recommendations))
        .route("/api/portfolio-health", post(portfolio::get_portfolio_health))

        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))

        .fallback(not_found)

        // Add state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use migration_scorer::YieldPredictor;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let state = AppState::with_predictor(&ServerConfig::default(), YieldPredictor::with_seed(1));
        create_router(Arc::new(state))
    }

    fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = create_test_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_openapi_document() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("YieldShift ML Service"));
        assert!(json.contains("/api/score"));
        assert!(json.contains("/api/batch-score"));
        assert!(json.contains("/api/predict"));
    }

    #[tokio::test]
    async fn test_health_route() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "YieldShift ML Service");
    }

    #[tokio::test]
    async fn test_score_route() {
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
        let (status, body) = send(post_json("/api/score", payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 97);
        assert!((body["annualGain"].as_f64().unwrap() - 746.3).abs() < 1e-6);
        assert!((body["breakeven"].as_f64().unwrap() - 1.946).abs() < 0.001);
        assert_eq!(body["costs"]["total"].as_f64().unwrap(), 4.0);
    }

    #[tokio::test]
    async fn test_score_route_never_breaks_even_is_null() {
        let payload = json!({
            "currentPosition": { "amount": 1000, "currentApy": 9 },
            "targetOpportunity": { "targetApy": 3 }
        });
        let (status, body) = send(post_json("/api/score", payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["breakeven"], Value::Null);
    }

    #[tokio::test]
    async fn test_score_route_rejects_malformed_json() {
        let (status, body) = send(post_json("/api/score", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(post_json("/api/score", "")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(post_json("/api/score", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_score_route_without_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/score")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_batch_score_route() {
        let payload = json!({
            "opportunities": [
                {
                    "id": "first",
                    "currentPosition": { "amount": 12300, "currentApy": 8.1 },
                    "targetOpportunity": { "targetApy": 14.2, "protocolSafetyScore": 9 }
                },
                { "id": "second" }
            ]
        });
        let (status, body) = send(post_json("/api/batch-score", payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        let scored = body["scoredOpportunities"].as_array().unwrap();
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0]["id"], "first");
        assert_eq!(scored[0]["score"], 97);
        assert_eq!(scored[1]["id"], "second");
        assert_eq!(scored[1]["score"], 34);
    }

    #[tokio::test]
    async fn test_batch_score_route_requires_opportunities() {
        let (status, body) =
            send(post_json("/api/batch-score", json!({ "other": 1 }).to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("No opportunities provided"));

        let (status, body) = send(post_json(
            "/api/batch-score",
            json!({ "opportunities": [1, 2] }).to_string(),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_OPPORTUNITY");
    }

    #[tokio::test]
    async fn test_predict_route() {
        let payload = json!({ "protocol": "aave-v3", "chain": "ethereum", "asset": "USDC" });
        let (status, body) = send(post_json("/api/predict", payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "stable");
        assert_eq!(body["trend"], "neutral");
        let confidence = body["confidence"].as_f64().unwrap();
        assert!((0.75..=0.90).contains(&confidence));
        assert_eq!(body["protocol"], "aave-v3");
        assert_eq!(body["chain"], "ethereum");
        assert_eq!(body["asset"], "USDC");
    }

    #[tokio::test]
    async fn test_predict_route_errors() {
        let (status, _) = send(post_json("/api/predict", "")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) =
            send(post_json("/api/predict", json!({ "asset": "USDC" }).to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "PREDICTION_ERROR");

        let (status, body) =
            send(post_json("/api/predict", json!({ "protocol": 42 }).to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "PREDICTION_ERROR");
    }

    #[tokio::test]
    async fn test_score_route_array_body_is_zeroed() {
        let (status, body) = send(post_json("/api/score", "[{}]")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 0);
        assert_eq!(body["breakeven"], Value::Null);
        assert_eq!(body["costs"]["total"].as_f64().unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_recommendations_and_health_routes() {
        let positions = json!([
            { "id": "1", "chain": "ethereum", "asset": "USDC", "amount": 12300, "currentApy": 8.1 }
        ]);
        let payload = json!({
            "positions": positions,
            "opportunities": [
                { "targetProtocol": "Aave V3", "targetChain": "base", "asset": "USDC", "targetApy": 14.2, "tvl": 1.5e8 }
            ]
        });
        let (status, body) = send(post_json("/api/recommendations", payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        let recs = body["recommendations"].clone();
        assert_eq!(recs[0]["positionId"], "1");
        assert_eq!(recs[0]["score"], 97);
        assert_eq!(recs[0]["targetChainId"], 8453);
        assert_eq!(recs[0]["timing"]["urgency"], "high");

        let payload = json!({ "positions": positions, "opportunities": recs });
        let (status, body) = send(post_json("/api/portfolio-health", payload.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        // 746.3 forgone on 996.3 current yield
        assert_eq!(body["healthScore"], 20);
        assert_eq!(body["positions"][0]["status"], "critical");
    }

    #[tokio::test]
    async fn test_recommendations_route_requires_lists() {
        let (status, body) = send(post_json(
            "/api/recommendations",
            json!({ "positions": [] }).to_string(),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_listed_endpoints_are_routed() {
        for (method, path) in ENDPOINTS {
            let request = Request::builder()
                .method(method)
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap();
            let response = create_test_router().oneshot(request).await.unwrap();
            assert_ne!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, path);
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
