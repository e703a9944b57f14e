//! Health check endpoint

use axum::Json;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// GET /health - Liveness probe; providers are not contacted
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
