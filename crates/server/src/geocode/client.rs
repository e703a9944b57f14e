//! Google Geocoding API client

use serde::Deserialize;
use trialfinder_core::Coordinates;

use crate::error::ProviderError;
use crate::middleware::record_provider_call;

const PROVIDER: &str = "geocoder";

/// Geocoder for free-text addresses.
///
/// Lookups never fail hard: every problem degrades to `None` and is logged.
#[derive(Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GeocodeClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Whether a Maps key is available; without one every lookup is `None`
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolve an address to coordinates, or `None` if it cannot be resolved
    pub async fn geocode(&self, address: &str) -> Option<Coordinates> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!(address, "No Maps key, skipping geocode");
            return None;
        };

        let result = self.lookup(address, api_key).await;
        record_provider_call(PROVIDER, &result);

        match result {
            Ok(Some(coordinates)) => Some(coordinates),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(address, error = %e, "Geocoding failed");
                None
            }
        }
    }

    async fn lookup(&self, address: &str, api_key: &str) -> Result<Option<Coordinates>, ProviderError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("address", address), ("key", api_key)])
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

        let body: GeocodeResponse = response.json().await.map_err(|e| ProviderError::Decode {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        match body.status.as_str() {
            "OK" => {
                let first = body.results.first();
                if first.is_none() {
                    tracing::warn!(address, "Geocoder returned OK with no results");
                }
                Ok(first.map(|r| Coordinates::new(r.geometry.location.lat, r.geometry.location.lng)))
            }
            "ZERO_RESULTS" => {
                tracing::info!(address, "Geocoder found no match");
                Ok(None)
            }
            other => Err(ProviderError::Decode {
                provider: PROVIDER,
                message: format!(
                    "status {}{}",
                    other,
                    body.error_message
                        .map(|m| format!(": {m}"))
                        .unwrap_or_default()
                ),
            }),
        }
    }
}
