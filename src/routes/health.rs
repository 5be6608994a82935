//! Health check endpoints.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Liveness probe; always returns OK while the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// GET /health
pub async fn status() -> Json<HealthStatus> {
    Json(HealthStatus { status: "healthy" })
}
