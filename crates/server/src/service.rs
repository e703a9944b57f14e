//! Trial search: geocode the origin, query the registry, normalize results

use serde::Serialize;
use trialfinder_core::registry::StudyLocation;
use trialfinder_core::{Coordinates, SearchQuery, TrialRecord};

use crate::error::ProviderError;
use crate::geocode::{GeocodeCache, GeocodeClient, geocode_all};
use crate::registry::RegistryClient;

/// The location the user searched around
#[derive(Debug, Clone, Serialize)]
pub struct SearchLocation {
    pub query: String,
    pub coordinates: Option<Coordinates>,
}

/// Normalized search results
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub trials: Vec<TrialRecord>,
    pub total_count: u64,
    pub search_location: SearchLocation,
    /// Set when the location could not be resolved and the search ran unfiltered
    pub warning: Option<String>,
}

#[derive(Clone)]
pub struct TrialSearch {
    geocoder: GeocodeClient,
    registry: RegistryClient,
    geocode_concurrency: usize,
}

impl TrialSearch {
    pub fn new(geocoder: GeocodeClient, registry: RegistryClient, geocode_concurrency: usize) -> Self {
        Self {
            geocoder,
            registry,
            geocode_concurrency,
        }
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, ProviderError> {
        let geocoding = self.geocoder.is_configured();
        if !geocoding {
            tracing::warn!("GOOGLE_MAPS_API_KEY not set, skipping geocoding for this search");
        }

        let origin = match query.location.as_deref() {
            Some(location) if geocoding => self.geocoder.geocode(location).await,
            _ => None,
        };

        let warning = match (&query.location, origin) {
            (Some(location), None) => {
                tracing::warn!(location = %location, "Search location not geocoded, searching without distance filter");
                Some(format!(
                    "Could not locate '{location}'; results are not limited by distance"
                ))
            }
            _ => None,
        };

        let page = self.registry.search(query, origin).await?;

        let cache = if geocoding {
            let addresses: Vec<String> = page
                .studies
                .iter()
                .flat_map(|study| &study.protocol_section.contacts_locations_module.locations)
                .map(StudyLocation::geocode_query)
                .collect();
            geocode_all(&self.geocoder, addresses, self.geocode_concurrency).await
        } else {
            GeocodeCache::new()
        };

        let trials: Vec<TrialRecord> = page
            .studies
            .iter()
            .map(|study| TrialRecord::from_study(study, |address| cache.get(address).copied().flatten()))
            .collect();

        tracing::info!(
            returned = trials.len(),
            total = page.total(),
            geocoded_sites = cache.values().filter(|c| c.is_some()).count(),
            "Search complete"
        );

        Ok(SearchResults {
            total_count: page.total(),
            trials,
            search_location: SearchLocation {
                query: query.location.clone().unwrap_or_default(),
                coordinates: origin,
            },
            warning,
        })
    }
}
