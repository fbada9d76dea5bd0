//! Liveness probe

use axum::Json;
use chrono::Utc;
use shared::HealthStatus;

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
