use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthStatus {
    status: &'static str,
}

/// Health check handler
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus { status: "healthy" })
}
