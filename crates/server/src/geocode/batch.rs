//! Bounded, per-request memoized geocoding of many addresses

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use trialfinder_core::Coordinates;

use super::client::GeocodeClient;

/// Lookup results keyed by address
pub type GeocodeCache = HashMap<String, Option<Coordinates>>;

/// Geocode every distinct non-blank address, at most `concurrency` at a time.
///
/// Duplicate addresses are looked up once.
pub async fn geocode_all<I>(client: &GeocodeClient, addresses: I, concurrency: usize) -> GeocodeCache
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let unique: Vec<String> = addresses
        .into_iter()
        .filter(|a| !a.trim().is_empty())
        .filter(|a| seen.insert(a.clone()))
        .collect();

    if unique.is_empty() {
        return GeocodeCache::new();
    }

    tracing::debug!(
        addresses = unique.len(),
        concurrency,
        "Geocoding trial locations"
    );

    stream::iter(unique)
        .map(|address| async move {
            let coordinates = client.geocode(&address).await;
            (address, coordinates)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}
