//! Clinical-trials registry access

mod client;

pub use client::RegistryClient;
