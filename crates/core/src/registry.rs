//! Wire schema for the ClinicalTrials.gov v2 `/studies` endpoint.
//!
//! Every field the registry may omit is optional or defaulted here, so
//! downstream code never probes raw JSON for missing keys.

use serde::Deserialize;

/// One page of results from `GET /studies`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub studies: Vec<Study>,
    pub total_count: Option<u64>,
}

impl SearchPage {
    /// Total reported by the registry, falling back to the page length
    pub fn total(&self) -> u64 {
        self.total_count.unwrap_or(self.studies.len() as u64)
    }
}

/// A single study entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    #[serde(default)]
    pub protocol_section: ProtocolSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolSection {
    pub identification_module: IdentificationModule,
    pub status_module: StatusModule,
    pub description_module: DescriptionModule,
    pub conditions_module: ConditionsModule,
    pub design_module: DesignModule,
    pub eligibility_module: EligibilityModule,
    pub contacts_locations_module: ContactsLocationsModule,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentificationModule {
    pub nct_id: Option<String>,
    pub brief_title: Option<String>,
    pub official_title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusModule {
    pub overall_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptionModule {
    pub brief_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionsModule {
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignModule {
    pub phases: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EligibilityModule {
    pub eligibility_criteria: Option<String>,
    pub sex: Option<String>,
    pub minimum_age: Option<String>,
    pub maximum_age: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactsLocationsModule {
    pub central_contacts: Vec<CentralContact>,
    pub locations: Vec<StudyLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CentralContact {
    pub name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudyLocation {
    pub facility: Option<String>,
    pub status: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

impl StudyLocation {
    /// Free-text address handed to the geocoder: "city state zip country".
    ///
    /// Blank parts are skipped; the result is empty when nothing is usable.
    pub fn geocode_query(&self) -> String {
        [&self.city, &self.state, &self.zip, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Field projection requested from the registry.
///
/// Kept in sync with the modules decoded above.
pub const PROJECTED_FIELDS: &[&str] = &[
    "NCTId",
    "BriefTitle",
    "OfficialTitle",
    "BriefSummary",
    "Condition",
    "OverallStatus",
    "Phase",
    "EligibilityCriteria",
    "Sex",
    "MinimumAge",
    "MaximumAge",
    "CentralContactName",
    "CentralContactRole",
    "CentralContactPhone",
    "CentralContactEMail",
    "LocationFacility",
    "LocationStatus",
    "LocationCity",
    "LocationState",
    "LocationZip",
    "LocationCountry",
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_study_with_missing_modules() {
        let page: SearchPage = serde_json::from_value(json!({
            "studies": [
                {"protocolSection": {"identificationModule": {"nctId": "NCT00000001"}}},
                {}
            ]
        }))
        .unwrap();

        assert_eq!(page.studies.len(), 2);
        assert_eq!(page.total(), 2);
        let ident = &page.studies[0].protocol_section.identification_module;
        assert_eq!(ident.nct_id.as_deref(), Some("NCT00000001"));
        assert!(ident.brief_title.is_none());
        assert!(page.studies[1].protocol_section.conditions_module.conditions.is_empty());
    }

    #[test]
    fn total_count_wins_over_page_length() {
        let page: SearchPage =
            serde_json::from_value(json!({"studies": [], "totalCount": 812})).unwrap();
        assert_eq!(page.total(), 812);
    }

    #[test]
    fn geocode_query_skips_blank_parts() {
        let location = StudyLocation {
            city: Some("Boston".into()),
            state: Some("  ".into()),
            zip: Some("02115".into()),
            country: Some("United States".into()),
            ..Default::default()
        };
        assert_eq!(location.geocode_query(), "Boston 02115 United States");

        assert_eq!(StudyLocation::default().geocode_query(), "");
    }
}
