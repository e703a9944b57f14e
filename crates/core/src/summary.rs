//! Payload accepted by the summary endpoint

use serde::Deserialize;

use crate::trial::Eligibility;

/// The subset of a trial record needed to write a plain-language summary.
///
/// The frontend posts back whatever record it holds, so every field is
/// optional here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrialDetails {
    pub title: String,
    pub description: String,
    pub condition: String,
    pub eligibility: Eligibility,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_payload_fills_defaults() {
        let details: TrialDetails = serde_json::from_value(json!({
            "title": "Imatinib in CML",
            "eligibility": {"criteria": "Adults only"},
            "locations": []
        }))
        .unwrap();

        assert_eq!(details.title, "Imatinib in CML");
        assert_eq!(details.description, "");
        assert_eq!(details.eligibility.criteria, "Adults only");
        assert_eq!(details.eligibility.gender, "All");
        assert_eq!(details.eligibility.max_age, "N/A");
    }
}
