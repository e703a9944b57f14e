//! Address geocoding

pub mod batch;
pub mod client;

pub use batch::{GeocodeCache, geocode_all};
pub use client::GeocodeClient;
