//! LLM-backed features

pub mod client;
pub mod summary;

pub use client::OpenAiClient;
