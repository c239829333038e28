//! API Server
//!
//! REST API for the YieldShift migration scoring service.
//!
//! # Features
//!
//! - **Scoring**: single and batch migration scores
//! - **Prediction**: heuristic yield trend labels
//! - **Recommendations**: ranked migrations per position and portfolio health
//! - **OpenAPI**: Auto-generated Swagger documentation
//!
//! # Example
//!
//! ```ignore
//! use api_server::{ApiServer, ServerConfig};
//!
//! let config = ServerConfig::from_env();
//! let server = ApiServer::new(config);
//! server.run().await?;
//! ```

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, ENDPOINTS};
pub use state::AppState;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method, Request};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable CORS for all origins.
    pub cors_permissive: bool,
    /// Name reported by `/health`.
    pub service_name: String,
    /// Maximum accepted request body size.
    pub max_body_bytes: usize,
    /// Emit logs as JSON.
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            cors_permissive: true,
            service_name: "YieldShift ML Service".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            // PORT first (hosting platforms), then API_PORT
            port: std::env::var("PORT")
                .or_else(|_| std::env::var("API_PORT"))
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            cors_permissive: std::env::var("CORS_PERMISSIVE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.cors_permissive),
            service_name: std::env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            log_json: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.log_json),
        }
    }

    /// Get the socket address.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

/// The API server.
pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server.
    pub fn new(config: ServerConfig) -> Self {
        let state = Arc::new(AppState::new(&config));
        Self { config, state }
    }

    /// Router with tracing, body limit and CORS layers applied.
    pub fn router(&self) -> Router {
        let cors = if self.config.cors_permissive {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        };

        create_router(self.state.clone())
            .layer(
                TraceLayer::new_for_http()
                    .on_request(|request: &Request<_>, _span: &tracing::Span| {
                        tracing::info!(
                            method = %request.method(),
                            uri = %request.uri(),
                            "Incoming request"
                        );
                    })
                    .on_response(DefaultOnResponse::new().level(Level::DEBUG))
                    .on_failure(
                        |error: tower_http::classify::ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                error = %error,
                                latency_ms = latency.as_millis(),
                                "Request failed"
                            );
                        },
                    ),
            )
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(cors)
    }

    /// Run the server.
    pub async fn run(self) -> anyhow::Result<()> {
        let router = self.router();
        let addr = self.config.socket_addr()?;

        info!(
            address = %addr,
            service = %self.config.service_name,
            "Starting API server"
        );
        for (method, path) in routes::ENDPOINTS {
            info!(method, path, "Endpoint");
        }

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5001);
        assert!(config.cors_permissive);
        assert_eq!(config.socket_addr().unwrap().port(), 5001);
    }

    #[test]
    fn test_invalid_socket_addr() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
