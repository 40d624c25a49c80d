// handlers/health.rs - GET / liveness check

use std::time::Instant;

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub is_healthy: bool,
    pub time: String,
}

/// Always healthy; the database is not consulted.
pub async fn health() -> Json<HealthCheck> {
    let start = Instant::now();
    let body = HealthCheck {
        is_healthy: true,
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    tracing::debug!("health check took {:?}", start.elapsed());
    Json(body)
}
