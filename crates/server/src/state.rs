//! Shared handler state

use std::time::Duration;

use crate::ai::OpenAiClient;
use crate::config::{Config, ConfigError};
use crate::geocode::GeocodeClient;
use crate::registry::RegistryClient;
use crate::retry::RetryPolicy;
use crate::service::TrialSearch;

/// Provider clients handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub search: TrialSearch,
    pub llm: OpenAiClient,
    pub maps_api_key: Option<String>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        let retry = RetryPolicy::with_retries(config.max_retries);

        let geocoder = GeocodeClient::new(
            http.clone(),
            config.geocode_base_url.clone(),
            config.maps_api_key.clone(),
        );
        let registry = RegistryClient::new(http.clone(), config.registry_base_url.clone(), retry.clone());
        let llm = OpenAiClient::new(
            http,
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            retry,
        );

        Ok(Self {
            search: TrialSearch::new(geocoder, registry, config.geocode_concurrency),
            llm,
            maps_api_key: config.maps_api_key.clone(),
        })
    }
}
