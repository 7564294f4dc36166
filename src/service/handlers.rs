//! Route handlers and response envelopes.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::ServiceState;
use crate::generator::EntropyInfo;
use crate::ledger::RollRecord;

const RANDOM_METHOD: &str = "Entropy Pool Mixing";

const DESCRIPTION: &str = "Combines operating system CSPRNG draws with a continuously \
refreshed entropy pool of clock, counter and host samples using xorshift mixing";

const FEATURES: [&str; 5] = [
    "Multiple OS CSPRNG draws per roll",
    "System memory and CPU metrics",
    "Entropy history and counter",
    "Xorshift bit mixing",
    "Triple-pass entropy combination",
];

/// Ledger summary attached to each roll response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrail {
    /// Ledger counter after this roll.
    pub total_rolls: u64,
    /// The record before this one, or null.
    pub last_roll: Option<RollRecord>,
}

/// `POST /roll` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResponse {
    /// Always true.
    pub success: bool,
    /// The new record.
    pub data: RollRecord,
    /// Ledger summary.
    pub audit_trail: AuditTrail,
}

/// Counter and full log.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditData {
    /// Ledger counter.
    pub total_rolls: u64,
    /// All records in roll order.
    pub rolls: Vec<RollRecord>,
}

/// `GET /audit` body.
#[derive(Debug, Serialize)]
pub struct AuditResponse {
    /// Always true.
    pub success: bool,
    /// Counter and log.
    pub data: AuditData,
}

/// Entropy diagnostics and a description of the method.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntropyData {
    /// Pool snapshot and host counters.
    pub current_entropy: EntropyInfo,
    /// Name of the roll method.
    pub random_method: &'static str,
    /// One-sentence summary of the method.
    pub description: &'static str,
    /// Notable properties of the method.
    pub features: &'static [&'static str],
}

/// `GET /entropy` body.
#[derive(Debug, Serialize)]
pub struct EntropyResponse {
    /// Always true.
    pub success: bool,
    /// Diagnostics.
    pub data: EntropyData,
}

/// `POST /roll`
pub(super) async fn roll_handler(State(state): State<Arc<ServiceState>>) -> Json<RollResponse> {
    let outcome = state.roll().await;

    Json(RollResponse {
        success: true,
        data: outcome.record,
        audit_trail: AuditTrail {
            total_rolls: outcome.total_rolls,
            last_roll: outcome.previous,
        },
    })
}

/// `GET /audit`
pub(super) async fn audit_handler(State(state): State<Arc<ServiceState>>) -> Json<AuditResponse> {
    let (total_rolls, rolls) = state.audit().await;

    Json(AuditResponse {
        success: true,
        data: AuditData { total_rolls, rolls },
    })
}

/// `GET /entropy`
pub(super) async fn entropy_handler(
    State(state): State<Arc<ServiceState>>,
) -> Json<EntropyResponse> {
    Json(EntropyResponse {
        success: true,
        data: EntropyData {
            current_entropy: state.entropy_info().await,
            random_method: RANDOM_METHOD,
            description: DESCRIPTION,
            features: &FEATURES,
        },
    })
}

/// `GET /metrics`
pub(super) async fn metrics_handler(State(state): State<Arc<ServiceState>>) -> impl IntoResponse {
    match state.metrics().encode() {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain; charset=utf-8")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

/// `GET /health`
pub(super) async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
