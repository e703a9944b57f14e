pub mod health;
pub mod maps;
pub mod metrics;
mod trials;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the JSON API consumed by the frontend
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/get_maps_api_key", get(maps::get_api_key))
        .route("/search_trials", post(trials::search_trials))
        .route("/generate_summary", post(trials::generate_summary))
}
