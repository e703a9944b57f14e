//! Mapping key hand-off for browser-side map rendering

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use trialfinder_core::Status;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct MapsKeyResponse {
    status: Status,
    api_key: String,
}

/// GET /api/get_maps_api_key
pub async fn get_api_key(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let api_key = state
        .maps_api_key
        .ok_or_else(|| AppError::NotConfigured("Google Maps API key not configured".to_string()))?;

    Ok(Json(MapsKeyResponse {
        status: Status::Success,
        api_key,
    }))
}
