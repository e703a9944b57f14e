//! Server configuration

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_REGISTRY_BASE_URL: &str = "https://clinicaltrials.gov/api/v2";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Startup configuration failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub maps_api_key: Option<String>,
    pub geocode_base_url: String,
    pub registry_base_url: String,
    pub http_timeout_secs: u64,
    pub geocode_concurrency: usize,
    pub max_retries: usize,
    pub rate_limit_rps: u32,
    pub cors_origins: Vec<String>,
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openai_api_key = var("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let bind_address = match (var("BIND_ADDRESS"), var("PORT")) {
            (Some(addr), _) => addr,
            (None, Some(port)) => format!("0.0.0.0:{}", port.trim()),
            (None, None) => "0.0.0.0:8080".to_string(),
        };

        let cors_origins = var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        Ok(Self {
            bind_address,
            openai_api_key,
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into()),
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
            maps_api_key: var("GOOGLE_MAPS_API_KEY"),
            geocode_base_url: var("GEOCODE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODE_BASE_URL.into()),
            registry_base_url: var("REGISTRY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_REGISTRY_BASE_URL.into()),
            http_timeout_secs: parse("HTTP_TIMEOUT_SECS", var("HTTP_TIMEOUT_SECS"), 15)?,
            geocode_concurrency: parse("GEOCODE_CONCURRENCY", var("GEOCODE_CONCURRENCY"), 8)?,
            max_retries: parse("MAX_RETRIES", var("MAX_RETRIES"), 2)?,
            rate_limit_rps: parse("RATE_LIMIT_RPS", var("RATE_LIMIT_RPS"), 100)?,
            cors_origins,
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
        })
    }
}

fn parse<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: v }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_openai_key_is_fatal() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));

        let err = load(&[("OPENAI_API_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert_eq!(config.registry_base_url, DEFAULT_REGISTRY_BASE_URL);
        assert!(config.maps_api_key.is_none());
        assert_eq!(config.http_timeout_secs, 15);
        assert_eq!(config.geocode_concurrency, 8);
        assert_eq!(config.cors_origins, ["*"]);
    }

    #[test]
    fn port_fills_bind_address() {
        let config = load(&[("OPENAI_API_KEY", "sk-test"), ("PORT", "9000")]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:9000");
    }

    #[test]
    fn invalid_number_is_reported() {
        let err = load(&[("OPENAI_API_KEY", "sk-test"), ("MAX_RETRIES", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "MAX_RETRIES", .. }));
    }

    #[test]
    fn cors_origins_are_split() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ])
        .unwrap();
        assert_eq!(config.cors_origins, ["http://a.test", "http://b.test"]);
    }
}
