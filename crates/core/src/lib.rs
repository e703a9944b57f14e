//! trialfinder-core: registry wire types and trial normalization
//!
//! This crate holds the typed ClinicalTrials.gov schema, the search query
//! model, the flat trial record served to the frontend, and the response
//! envelope shared by all endpoints.

pub mod error;
pub mod outcome;
pub mod query;
pub mod registry;
pub mod summary;
pub mod trial;

pub use error::TrialError;
pub use outcome::{ErrorOutcome, Status};
pub use query::{DEFAULT_RADIUS_MILES, LooseNumber, PAGE_SIZE, SearchQuery, parse_age};
pub use registry::{SearchPage, Study};
pub use summary::TrialDetails;
pub use trial::{Contact, Coordinates, Eligibility, TrialLocation, TrialRecord};
