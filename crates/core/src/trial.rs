//! Normalized trial records served to the frontend

use serde::{Deserialize, Serialize};

use crate::registry::{CentralContact, Study, StudyLocation};

/// Public study page for a registry identifier
pub const STUDY_URL_BASE: &str = "https://clinicaltrials.gov/study";

pub const DEFAULT_STATUS: &str = "Unknown";
pub const DEFAULT_TITLE: &str = "Untitled study";
pub const DEFAULT_GENDER: &str = "All";
pub const DEFAULT_MIN_AGE: &str = "0 Years";
pub const DEFAULT_MAX_AGE: &str = "N/A";

/// A geocoded point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Flat view of a registry study
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialRecord {
    pub id: Option<String>,
    pub url: Option<String>,
    pub title: String,
    pub official_title: Option<String>,
    pub description: String,
    pub condition: String,
    pub status: String,
    pub phase: Option<String>,
    pub eligibility: Eligibility,
    pub locations: Vec<TrialLocation>,
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Eligibility {
    pub gender: String,
    pub min_age: String,
    pub max_age: String,
    pub criteria: String,
}

impl Default for Eligibility {
    fn default() -> Self {
        Self {
            gender: DEFAULT_GENDER.to_string(),
            min_age: DEFAULT_MIN_AGE.to_string(),
            max_age: DEFAULT_MAX_AGE.to_string(),
            criteria: String::new(),
        }
    }
}

/// A trial site. Coordinates are flattened into `latitude`/`longitude`
/// and omitted entirely when the site could not be geocoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialLocation {
    pub facility: Option<String>,
    pub status: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    #[serde(flatten)]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Trim and drop empty strings
fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn join_non_blank(values: &[String]) -> String {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TrialRecord {
    /// Build a record from a raw study.
    ///
    /// `coordinates` resolves a location's geocode query; it is only
    /// consulted for locations whose query is non-blank.
    pub fn from_study<F>(study: &Study, coordinates: F) -> Self
    where
        F: Fn(&str) -> Option<Coordinates>,
    {
        let section = &study.protocol_section;
        let ident = &section.identification_module;
        let eligibility = &section.eligibility_module;

        let id = clean(ident.nct_id.as_deref());
        let url = id.as_ref().map(|id| format!("{STUDY_URL_BASE}/{id}"));

        let phase = Some(join_non_blank(&section.design_module.phases)).filter(|p| !p.is_empty());

        let locations = section
            .contacts_locations_module
            .locations
            .iter()
            .map(|loc| TrialLocation::from_study_location(loc, &coordinates))
            .collect();

        let contacts = section
            .contacts_locations_module
            .central_contacts
            .iter()
            .map(Contact::from)
            .collect();

        Self {
            id,
            url,
            title: clean(ident.brief_title.as_deref()).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            official_title: clean(ident.official_title.as_deref()),
            description: clean(section.description_module.brief_summary.as_deref())
                .unwrap_or_default(),
            condition: join_non_blank(&section.conditions_module.conditions),
            status: clean(section.status_module.overall_status.as_deref())
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            phase,
            eligibility: Eligibility {
                gender: clean(eligibility.sex.as_deref())
                    .unwrap_or_else(|| DEFAULT_GENDER.to_string()),
                min_age: clean(eligibility.minimum_age.as_deref())
                    .unwrap_or_else(|| DEFAULT_MIN_AGE.to_string()),
                max_age: clean(eligibility.maximum_age.as_deref())
                    .unwrap_or_else(|| DEFAULT_MAX_AGE.to_string()),
                criteria: eligibility
                    .eligibility_criteria
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string(),
            },
            locations,
            contacts,
        }
    }
}

impl TrialLocation {
    fn from_study_location<F>(loc: &StudyLocation, coordinates: &F) -> Self
    where
        F: Fn(&str) -> Option<Coordinates>,
    {
        let query = loc.geocode_query();
        let coordinates = if query.is_empty() {
            None
        } else {
            coordinates(&query)
        };

        Self {
            facility: clean(loc.facility.as_deref()),
            status: clean(loc.status.as_deref()),
            city: clean(loc.city.as_deref()),
            state: clean(loc.state.as_deref()),
            zip: clean(loc.zip.as_deref()),
            country: clean(loc.country.as_deref()),
            coordinates,
        }
    }
}

impl From<&CentralContact> for Contact {
    fn from(c: &CentralContact) -> Self {
        Self {
            name: clean(c.name.as_deref()),
            role: clean(c.role.as_deref()),
            phone: clean(c.phone.as_deref()),
            email: clean(c.email.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn study(value: serde_json::Value) -> Study {
        serde_json::from_value(value).unwrap()
    }

    fn no_geocoder(_: &str) -> Option<Coordinates> {
        None
    }

    #[test]
    fn empty_eligibility_module_uses_defaults() {
        let study = study(json!({"protocolSection": {"eligibilityModule": {}}}));
        let record = TrialRecord::from_study(&study, no_geocoder);

        assert_eq!(record.eligibility.gender, "All");
        assert_eq!(record.eligibility.min_age, "0 Years");
        assert_eq!(record.eligibility.max_age, "N/A");
        assert_eq!(record.eligibility.criteria, "");
        assert_eq!(record.status, "Unknown");
        assert_eq!(record.title, DEFAULT_TITLE);
    }

    #[test]
    fn missing_id_yields_no_url() {
        let record = TrialRecord::from_study(&Study::default(), no_geocoder);
        assert!(record.id.is_none());
        assert!(record.url.is_none());

        let blank = study(json!({"protocolSection": {"identificationModule": {"nctId": "  "}}}));
        assert!(TrialRecord::from_study(&blank, no_geocoder).url.is_none());
    }

    #[test]
    fn maps_identification_and_conditions() {
        let study = study(json!({
            "protocolSection": {
                "identificationModule": {
                    "nctId": "NCT01234567",
                    "briefTitle": "Imatinib in CML",
                    "officialTitle": "A Phase 2 Study of Imatinib"
                },
                "statusModule": {"overallStatus": "RECRUITING"},
                "descriptionModule": {"briefSummary": "Tests imatinib."},
                "conditionsModule": {"conditions": ["CML", " ", "Leukemia"]},
                "designModule": {"phases": ["PHASE1", "PHASE2"]},
                "contactsLocationsModule": {
                    "centralContacts": [{"name": "Jane Doe", "role": "CONTACT", "email": "jd@example.org"}]
                }
            }
        }));
        let record = TrialRecord::from_study(&study, no_geocoder);

        assert_eq!(record.id.as_deref(), Some("NCT01234567"));
        assert_eq!(
            record.url.as_deref(),
            Some("https://clinicaltrials.gov/study/NCT01234567")
        );
        assert_eq!(record.condition, "CML, Leukemia");
        assert_eq!(record.status, "RECRUITING");
        assert_eq!(record.phase.as_deref(), Some("PHASE1, PHASE2"));
        assert_eq!(record.contacts.len(), 1);
        assert_eq!(record.contacts[0].name.as_deref(), Some("Jane Doe"));
        assert!(record.contacts[0].phone.is_none());
    }

    #[test]
    fn locations_keep_order_and_skip_blank_queries() {
        let study = study(json!({
            "protocolSection": {
                "contactsLocationsModule": {
                    "locations": [
                        {"facility": "MGH", "city": "Boston", "state": "Massachusetts", "zip": "02114", "country": "United States"},
                        {"facility": "Unknown Site"},
                        {"facility": "MD Anderson", "city": "Houston", "country": "United States"}
                    ]
                }
            }
        }));
        let record = TrialRecord::from_study(&study, |query| match query {
            "Boston Massachusetts 02114 United States" => Some(Coordinates::new(42.36, -71.07)),
            "Houston United States" => Some(Coordinates::new(29.71, -95.40)),
            _ => None,
        });

        let facilities: Vec<_> = record
            .locations
            .iter()
            .map(|l| l.facility.as_deref().unwrap())
            .collect();
        assert_eq!(facilities, ["MGH", "Unknown Site", "MD Anderson"]);
        assert_eq!(
            record.locations[0].coordinates,
            Some(Coordinates::new(42.36, -71.07))
        );
        assert!(record.locations[1].coordinates.is_none());
        assert_eq!(
            record.locations[2].coordinates,
            Some(Coordinates::new(29.71, -95.40))
        );
    }

    #[test]
    fn location_coordinates_serialize_flat() {
        let location = TrialLocation {
            facility: Some("MGH".into()),
            status: None,
            city: Some("Boston".into()),
            state: None,
            zip: None,
            country: None,
            coordinates: Some(Coordinates::new(42.0, -71.0)),
        };
        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value["latitude"], 42.0);
        assert_eq!(value["longitude"], -71.0);

        let bare = TrialLocation {
            coordinates: None,
            ..location
        };
        let value = serde_json::to_value(&bare).unwrap();
        assert!(value.get("latitude").is_none());
    }
}
