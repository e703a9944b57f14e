use serde::{Deserialize, Serialize};

/// Top-level `status` field carried by every API response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// `{status: "error", error}` body returned when a request cannot be served
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorOutcome {
    pub status: Status,
    pub error: String,
}

impl ErrorOutcome {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase_status() {
        let value = serde_json::to_value(ErrorOutcome::new("boom")).unwrap();
        assert_eq!(value, serde_json::json!({"status": "error", "error": "boom"}));
    }
}
