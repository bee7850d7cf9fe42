//! Health check endpoints

use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed readiness response
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: ReadinessChecks,
}

/// Individual readiness checks
#[derive(Serialize)]
pub struct ReadinessChecks {
    pub devices: CheckResult,
    pub dispatcher: DispatcherStatus,
}

/// Result of a single health check
#[derive(Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok",
            message: Some(message.into()),
        }
    }

    fn unavailable() -> Self {
        Self {
            status: "unavailable",
            message: Some("no devices configured".to_string()),
        }
    }
}

/// Backend calls currently in flight
#[derive(Serialize)]
pub struct DispatcherStatus {
    pub attempts: u32,
    pub in_flight: usize,
}

/// Liveness probe - is the service running?
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe - is the service ready to accept directives?
async fn ready(State(state): State<Arc<ApiState>>) -> (StatusCode, Json<ReadinessResponse>) {
    let registry = state.router.registry();
    let devices = if registry.is_empty() {
        CheckResult::unavailable()
    } else {
        CheckResult::ok(format!("{} registered", registry.len()))
    };

    let dispatcher = state.router.dispatcher();

    let all_ok = devices.status == "ok";
    let status = if all_ok { "ok" } else { "degraded" };
    let http_status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(ReadinessResponse {
            status,
            checks: ReadinessChecks {
                devices,
                dispatcher: DispatcherStatus {
                    attempts: dispatcher.attempts(),
                    in_flight: dispatcher.in_flight(),
                },
            },
        }),
    )
}

/// Build health router (liveness only, no state needed)
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// Build readiness router
pub fn ready_router(state: Arc<ApiState>) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
