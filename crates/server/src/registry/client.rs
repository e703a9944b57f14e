//! ClinicalTrials.gov v2 search client

use trialfinder_core::{Coordinates, SearchPage, SearchQuery};

use crate::error::ProviderError;
use crate::middleware::record_provider_call;
use crate::retry::RetryPolicy;

const PROVIDER: &str = "registry";

#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl RegistryClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        }
    }

    /// Run one search. `origin` adds a geo-radius filter around that point.
    pub async fn search(
        &self,
        query: &SearchQuery,
        origin: Option<Coordinates>,
    ) -> Result<SearchPage, ProviderError> {
        let params = query.registry_params(origin);

        tracing::info!(
            condition = %query.condition,
            geo_filtered = origin.is_some(),
            radius_miles = query.radius_miles,
            "Searching registry"
        );

        let params = params.as_slice();
        self.retry
            .run("registry_search", || async move {
                let result = self.fetch(params).await;
                record_provider_call(PROVIDER, &result);
                result
            })
            .await
    }

    async fn fetch(&self, params: &[(&'static str, String)]) -> Result<SearchPage, ProviderError> {
        let response = self
            .http
            .get(format!("{}/studies", self.base_url))
            .header("accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status,
                body,
            });
        }

        response
            .json::<SearchPage>()
            .await
            .map_err(|e| ProviderError::Decode {
                provider: PROVIDER,
                message: e.to_string(),
            })
    }
}
