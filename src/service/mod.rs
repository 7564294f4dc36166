//! JSON-over-HTTP surface for rolling and auditing.
//!
//! | Route | Body |
//! |-------|------|
//! | `POST /roll` | `{ success, data: RollRecord, auditTrail: { totalRolls, lastRoll } }` |
//! | `GET /audit` | `{ success, data: { totalRolls, rolls } }` |
//! | `GET /entropy` | `{ success, data: { currentEntropy, randomMethod, description, features } }` |
//! | `GET /metrics` | Prometheus text format |
//! | `GET /health` | `OK` |

mod config;
mod handlers;
mod state;

pub use config::{ConfigError, ServiceConfig, DEFAULT_PORT};
pub use handlers::{
    AuditData, AuditResponse, AuditTrail, EntropyData, EntropyResponse, RollResponse,
};
pub use state::{RollOutcome, ServiceState};

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::generator::DieGenerator;
use crate::metrics::MetricsError;

/// Errors that can occur while running the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The listen socket could not be bound.
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    /// The Prometheus registry could not be built.
    #[error("metrics setup failed: {0}")]
    Metrics(#[from] MetricsError),

    /// The server stopped with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Builds the router over shared state.
pub fn router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/roll", post(handlers::roll_handler))
        .route("/audit", get(handlers::audit_handler))
        .route("/entropy", get(handlers::entropy_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/health", get(handlers::health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP server for the die service.
pub struct DiceServer {
    config: ServiceConfig,
    state: Arc<ServiceState>,
}

impl DiceServer {
    /// Creates a server with a fresh generator and empty ledger.
    pub fn new(config: ServiceConfig, generator: DieGenerator) -> Result<Self, ServiceError> {
        Ok(Self {
            config,
            state: Arc::new(ServiceState::new(generator)?),
        })
    }

    /// Returns the shared state.
    pub fn state(&self) -> Arc<ServiceState> {
        Arc::clone(&self.state)
    }

    /// Starts the HTTP server and runs until Ctrl-C.
    pub async fn run(self) -> Result<(), ServiceError> {
        let app = router(self.state);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        tracing::info!(
            addr = %self.config.bind_addr,
            "Dice service listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServiceError::Server(e.to_string()))?;

        tracing::info!("Dice service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolConfig;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let generator = DieGenerator::with_config(PoolConfig {
            host_metrics: false,
            ..Default::default()
        });
        router(Arc::new(ServiceState::new(generator).unwrap()))
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, method: Method, uri: &str) -> Value {
        let (status, body) = send(app, method, uri).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_roll_returns_record() {
        let app = test_app();
        let body = send_json(&app, Method::POST, "/roll").await;

        assert_eq!(body["success"], true);
        let die = body["data"]["die"].as_u64().unwrap();
        assert!((1..=6).contains(&die));
        assert_eq!(body["data"]["rollNumber"], 1);
        assert!(body["data"]["id"].is_string());
        assert!(body["data"]["timestamp"].is_string());
        assert!(body["data"]["entropyInfo"]["poolSize"].is_u64());
        assert_eq!(body["auditTrail"]["totalRolls"], 1);
        assert!(body["auditTrail"]["lastRoll"].is_null());
    }

    #[tokio::test]
    async fn test_three_rolls_count_up() {
        let app = test_app();
        send_json(&app, Method::POST, "/roll").await;
        send_json(&app, Method::POST, "/roll").await;
        let third = send_json(&app, Method::POST, "/roll").await;

        assert_eq!(third["data"]["rollNumber"], 3);
        assert_eq!(third["auditTrail"]["totalRolls"], 3);
    }

    #[tokio::test]
    async fn test_last_roll_is_previous_record() {
        let app = test_app();
        let first = send_json(&app, Method::POST, "/roll").await;
        let second = send_json(&app, Method::POST, "/roll").await;

        assert_eq!(second["auditTrail"]["totalRolls"], 2);
        assert_eq!(second["auditTrail"]["lastRoll"], first["data"]);
    }

    #[tokio::test]
    async fn test_audit_empty() {
        let app = test_app();
        let body = send_json(&app, Method::GET, "/audit").await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["totalRolls"], 0);
        assert_eq!(body["data"]["rolls"], Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn test_audit_after_two_rolls() {
        let app = test_app();
        send_json(&app, Method::POST, "/roll").await;
        send_json(&app, Method::POST, "/roll").await;

        let body = send_json(&app, Method::GET, "/audit").await;
        let rolls = body["data"]["rolls"].as_array().unwrap();

        assert_eq!(body["data"]["totalRolls"], 2);
        assert_eq!(rolls.len(), 2);
        assert_eq!(rolls[0]["rollNumber"], 1);
        assert_eq!(rolls[1]["rollNumber"], 2);
    }

    #[tokio::test]
    async fn test_concurrent_rolls_gap_free() {
        let app = test_app();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { send_json(&app, Method::POST, "/roll").await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let body = send_json(&app, Method::GET, "/audit").await;
        let rolls = body["data"]["rolls"].as_array().unwrap();
        let numbers: Vec<u64> = rolls
            .iter()
            .map(|r| r["rollNumber"].as_u64().unwrap())
            .collect();
        assert_eq!(numbers, (1..=20).collect::<Vec<u64>>());

        // Each record's pool snapshot is taken under the same lock as its roll.
        for roll in rolls {
            assert_eq!(roll["entropyInfo"]["entropyCounter"], roll["rollNumber"]);
            assert!(roll["entropyInfo"]["systemInfo"]["cpus"].is_u64());
        }
    }

    #[tokio::test]
    async fn test_entropy_snapshot_matches_state() {
        let generator = DieGenerator::with_config(PoolConfig {
            host_metrics: false,
            ..Default::default()
        });
        let state = ServiceState::new(generator).unwrap();

        let outcome = state.roll().await;
        let info = state.entropy_info().await;

        assert_eq!(info.pool.entropy_counter, 1);
        assert_eq!(outcome.record.entropy_info.as_ref().map(|i| &i.pool), Some(&info.pool));
        assert!(info.host.system_info.cpus >= 1);
    }

    #[tokio::test]
    async fn test_entropy_endpoint() {
        let app = test_app();
        let body = send_json(&app, Method::GET, "/entropy").await;
        let data = &body["data"];

        assert_eq!(body["success"], true);
        assert_eq!(data["randomMethod"], "Entropy Pool Mixing");
        assert!(data["description"].is_string());
        assert_eq!(data["features"].as_array().unwrap().len(), 5);
        assert_eq!(data["currentEntropy"]["entropyCounter"], 0);
        assert!(data["currentEntropy"]["systemInfo"]["cpus"].is_u64());
    }

    #[tokio::test]
    async fn test_metrics_track_rolls() {
        let app = test_app();
        send_json(&app, Method::POST, "/roll").await;

        let (status, body) = send(&app, Method::GET, "/metrics").await;
        let text = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(text.contains("dice_rolls_total 1"));
        assert!(text.contains("dice_entropy_counter 1"));
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_unknown_route_and_method() {
        let app = test_app();

        let (status, _) = send(&app, Method::GET, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/roll").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
