//! Search input and the registry parameters derived from it

use serde::Deserialize;

use crate::error::TrialError;
use crate::registry::PROJECTED_FIELDS;
use crate::trial::Coordinates;

pub const DEFAULT_RADIUS_MILES: u32 = 50;
pub const PAGE_SIZE: u32 = 50;
pub const RELEVANCE_SORT: &str = "@relevance";

/// Form values arrive as JSON numbers or as the raw text of an input box
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    /// Parse as a finite, non-negative number. Blank text counts as absent.
    fn to_non_negative(&self) -> Result<Option<f64>, String> {
        let value = match self {
            LooseNumber::Number(n) => *n,
            LooseNumber::Text(s) if s.trim().is_empty() => return Ok(None),
            LooseNumber::Text(s) => s.trim().parse::<f64>().map_err(|_| s.clone())?,
        };
        if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
            return Err(value.to_string());
        }
        Ok(Some(value))
    }

    /// Parse as a non-negative whole number
    fn to_whole(&self) -> Result<Option<u32>, String> {
        match self.to_non_negative()? {
            Some(value) if value.fract() != 0.0 => Err(value.to_string()),
            value => Ok(value.map(|v| v as u32)),
        }
    }
}

/// Parse an optional age field; blank or absent means "not given"
pub fn parse_age(age: Option<&LooseNumber>) -> Result<Option<u32>, TrialError> {
    match age {
        Some(age) => age.to_whole().map_err(TrialError::InvalidAge),
        None => Ok(None),
    }
}

/// A user search against the registry
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub condition: String,
    pub location: Option<String>,
    pub radius_miles: u32,
}

impl SearchQuery {
    /// Build a query from raw form input.
    ///
    /// Blank location becomes `None`; absent or blank distance falls back to
    /// [`DEFAULT_RADIUS_MILES`]. A zero radius is rejected; a fractional one
    /// is rounded up to whole miles.
    pub fn from_form(
        condition: Option<&str>,
        location: Option<&str>,
        distance: Option<&LooseNumber>,
    ) -> Result<Self, TrialError> {
        // Fractional miles round up so a small positive radius stays positive
        let radius_miles = match distance {
            Some(d) => d.to_non_negative().map_err(TrialError::InvalidRadius)?,
            None => None,
        }
        .map(|miles| miles.ceil() as u32)
        .unwrap_or(DEFAULT_RADIUS_MILES);

        if radius_miles == 0 {
            return Err(TrialError::InvalidRadius("0".to_string()));
        }

        Ok(Self {
            condition: condition.map(str::trim).unwrap_or_default().to_string(),
            location: location
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            radius_miles,
        })
    }

    /// `distance(lat,lon,Rmi)` with six-decimal coordinates
    pub fn geo_filter(&self, origin: Coordinates) -> String {
        format!(
            "distance({:.6},{:.6},{}mi)",
            origin.latitude, origin.longitude, self.radius_miles
        )
    }

    /// Query-string parameters for `GET /studies`.
    ///
    /// `origin` is the geocoded search location, if any; without it the
    /// search is not geo-filtered.
    pub fn registry_params(&self, origin: Option<Coordinates>) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);

        if !self.condition.is_empty() {
            params.push(("query.term", self.condition.clone()));
        }
        if let Some(origin) = origin {
            params.push(("filter.geo", self.geo_filter(origin)));
        }

        params.push(("fields", PROJECTED_FIELDS.join(",")));
        params.push(("pageSize", PAGE_SIZE.to_string()));
        params.push(("sort", RELEVANCE_SORT.to_string()));
        params.push(("countTotal", "true".to_string()));

        params
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            condition: String::new(),
            location: None,
            radius_miles: DEFAULT_RADIUS_MILES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(params: &[(&'static str, String)]) -> Vec<&'static str> {
        params.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn geo_filter_uses_six_decimals() {
        let query = SearchQuery {
            radius_miles: 25,
            ..Default::default()
        };
        assert_eq!(
            query.geo_filter(Coordinates::new(42.3600826, -71.0588801)),
            "distance(42.360083,-71.058880,25mi)"
        );
    }

    #[test]
    fn empty_query_sends_only_fixed_params() {
        let params = SearchQuery::default().registry_params(None);
        assert_eq!(keys(&params), ["fields", "pageSize", "sort", "countTotal"]);
        assert!(params.contains(&("pageSize", "50".to_string())));
        assert!(params.contains(&("sort", "@relevance".to_string())));
        assert!(params.contains(&("countTotal", "true".to_string())));
    }

    #[test]
    fn condition_and_origin_add_filters() {
        let query = SearchQuery::from_form(
            Some("chronic myeloid leukemia"),
            Some("Boston, MA"),
            Some(&LooseNumber::Number(25.0)),
        )
        .unwrap();
        let params = query.registry_params(Some(Coordinates::new(42.36, -71.06)));

        assert_eq!(
            keys(&params),
            ["query.term", "filter.geo", "fields", "pageSize", "sort", "countTotal"]
        );
        assert_eq!(params[0].1, "chronic myeloid leukemia");
        assert_eq!(params[1].1, "distance(42.360000,-71.060000,25mi)");
    }

    #[test]
    fn from_form_defaults_and_trims() {
        let query = SearchQuery::from_form(Some("  asthma "), Some("   "), None).unwrap();
        assert_eq!(query.condition, "asthma");
        assert!(query.location.is_none());
        assert_eq!(query.radius_miles, DEFAULT_RADIUS_MILES);

        let blank = LooseNumber::Text(String::new());
        let query = SearchQuery::from_form(None, None, Some(&blank)).unwrap();
        assert_eq!(query.radius_miles, DEFAULT_RADIUS_MILES);
    }

    #[test]
    fn from_form_accepts_numeric_text() {
        let query =
            SearchQuery::from_form(None, None, Some(&LooseNumber::Text("100".into()))).unwrap();
        assert_eq!(query.radius_miles, 100);
    }

    #[test]
    fn from_form_rejects_bad_distance() {
        for bad in [
            LooseNumber::Text("far".into()),
            LooseNumber::Number(-5.0),
            LooseNumber::Number(0.0),
            LooseNumber::Text("0".into()),
        ] {
            let err = SearchQuery::from_form(None, None, Some(&bad)).unwrap_err();
            assert!(matches!(err, TrialError::InvalidRadius(_)), "{bad:?}");
        }
    }

    #[test]
    fn fractional_distance_rounds_up() {
        let query =
            SearchQuery::from_form(None, None, Some(&LooseNumber::Text("25.5".into()))).unwrap();
        assert_eq!(query.radius_miles, 26);

        let query = SearchQuery::from_form(None, None, Some(&LooseNumber::Number(0.2))).unwrap();
        assert_eq!(query.radius_miles, 1);
    }

    #[test]
    fn parse_age_handles_blank_and_text() {
        assert_eq!(parse_age(None).unwrap(), None);
        assert_eq!(parse_age(Some(&LooseNumber::Text("".into()))).unwrap(), None);
        assert_eq!(parse_age(Some(&LooseNumber::Text("42".into()))).unwrap(), Some(42));
        assert!(parse_age(Some(&LooseNumber::Text("old".into()))).is_err());
        assert!(parse_age(Some(&LooseNumber::Number(30.5))).is_err());
    }
}
