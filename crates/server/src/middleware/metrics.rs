//! Prometheus metrics collection
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every inbound request, and `provider_requests_total` for
//! every outbound call to the registry, geocoder and LLM provider.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::error::ProviderError;

/// Normalize request paths to avoid high-cardinality labels.
/// Static assets share one label.
fn normalize_path(path: &str) -> String {
    if path.starts_with("/static/") {
        "/static/*".to_string()
    } else {
        path.to_string()
    }
}

/// Middleware that records request count and duration metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

/// Count one outbound provider call by outcome
pub fn record_provider_call<T>(provider: &'static str, result: &Result<T, ProviderError>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    metrics::counter!(
        "provider_requests_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_assets_share_a_label() {
        assert_eq!(normalize_path("/static/app.js"), "/static/*");
        assert_eq!(normalize_path("/static/css/site.css"), "/static/*");
        assert_eq!(normalize_path("/api/search_trials"), "/api/search_trials");
    }
}
