//! Trial search and summary endpoints

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde::{Deserialize, Serialize};
use trialfinder_core::{LooseNumber, SearchQuery, Status, TrialDetails, TrialRecord, parse_age};

use crate::ai::summary;
use crate::error::AppError;
use crate::service::SearchLocation;
use crate::state::AppState;

/// Request body for trial search
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchTrialsRequest {
    condition: Option<String>,
    location: Option<String>,
    distance: Option<LooseNumber>,
    age: Option<LooseNumber>,
}

/// Response body for trial search
#[derive(Serialize)]
pub struct SearchTrialsResponse {
    status: Status,
    count: usize,
    #[serde(rename = "totalCount")]
    total_count: u64,
    trials: Vec<TrialRecord>,
    search_location: SearchLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

/// Request body for summary generation
#[derive(Debug, Deserialize)]
pub struct GenerateSummaryRequest {
    #[serde(default)]
    trial_details: Option<TrialDetails>,
}

/// Response body for summary generation
#[derive(Serialize)]
pub struct GenerateSummaryResponse {
    status: Status,
    summary: String,
}

/// POST /api/search_trials - Search the registry around a location
pub async fn search_trials(
    State(state): State<AppState>,
    body: Result<Json<SearchTrialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;

    let query = SearchQuery::from_form(
        body.condition.as_deref(),
        body.location.as_deref(),
        body.distance.as_ref(),
    )?;
    // Age only informs the log; a malformed value is dropped
    let age = parse_age(body.age.as_ref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unparseable age");
        None
    });

    tracing::info!(
        condition = %query.condition,
        location = ?query.location,
        radius_miles = query.radius_miles,
        age = ?age,
        "Trial search"
    );

    let results = state.search.search(&query).await?;

    Ok(Json(SearchTrialsResponse {
        status: Status::Success,
        count: results.trials.len(),
        total_count: results.total_count,
        trials: results.trials,
        search_location: results.search_location,
        warning: results.warning,
    }))
}

/// POST /api/generate_summary - Plain-language summary of one trial
pub async fn generate_summary(
    State(state): State<AppState>,
    body: Result<Json<GenerateSummaryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let details = body
        .trial_details
        .ok_or_else(|| AppError::BadRequest("Missing trial_details".to_string()))?;

    tracing::info!(title = %details.title, "Summary request");

    let summary = summary::summarize(&state.llm, &details).await.map_err(|e| {
        tracing::error!(error = %e, "Summary generation failed");
        AppError::from(e)
    })?;

    Ok(Json(GenerateSummaryResponse {
        status: Status::Success,
        summary,
    }))
}
