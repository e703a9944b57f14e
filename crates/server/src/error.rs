//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use trialfinder_core::{ErrorOutcome, TrialError};

/// Failure of an outbound call to the registry, geocoder or LLM provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request timed out")]
    Timeout { provider: &'static str },

    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Billing or quota exhaustion; waiting does not help
    #[error("{provider} quota exhausted: {message}")]
    QuotaExhausted {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned an unexpected response: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Classify a reqwest failure
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout { provider }
        } else if err.is_decode() {
            ProviderError::Decode {
                provider,
                message: err.to_string(),
            }
        } else {
            ProviderError::Transport {
                provider,
                message: err.to_string(),
            }
        }
    }

    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Timeout { .. } | ProviderError::Transport { .. } => true,
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            ProviderError::QuotaExhausted { .. } | ProviderError::Decode { .. } => false,
        }
    }

    /// Short label for the `outcome` metric dimension
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Timeout { .. } => "timeout",
            ProviderError::Transport { .. } => "transport",
            ProviderError::Status { .. } => "status",
            ProviderError::QuotaExhausted { .. } => "quota",
            ProviderError::Decode { .. } => "decode",
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotConfigured(String),
    Provider(ProviderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Provider and configuration failures keep HTTP 200; the frontend
        // branches on the `status` field of the body.
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotConfigured(msg) => (StatusCode::OK, msg),
            AppError::Provider(err) => (StatusCode::OK, err.to_string()),
        };

        (status, Json(ErrorOutcome::new(message))).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

impl From<TrialError> for AppError {
    fn from(err: TrialError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16) -> ProviderError {
        ProviderError::Status {
            provider: "registry",
            status,
            body: String::new(),
        }
    }

    #[test]
    fn server_errors_and_throttling_are_transient() {
        assert!(status_error(500).is_transient());
        assert!(status_error(503).is_transient());
        assert!(status_error(429).is_transient());
        assert!(ProviderError::Timeout { provider: "llm" }.is_transient());
    }

    #[test]
    fn client_errors_and_bad_payloads_are_not_transient() {
        assert!(!status_error(400).is_transient());
        assert!(!status_error(404).is_transient());
        assert!(
            !ProviderError::QuotaExhausted {
                provider: "llm",
                message: "out of credit".into()
            }
            .is_transient()
        );
        assert!(
            !ProviderError::Decode {
                provider: "llm",
                message: "missing field".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn status_error_message_carries_code_and_body() {
        let err = ProviderError::Status {
            provider: "registry",
            status: 400,
            body: "{\"error\":\"bad filter\"}".into(),
        };
        assert_eq!(
            err.to_string(),
            "registry returned HTTP 400: {\"error\":\"bad filter\"}"
        );
    }

    #[test]
    fn provider_errors_render_with_ok_status() {
        let response = AppError::from(status_error(502)).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = AppError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
