use thiserror::Error;

/// Errors raised while interpreting a user's search input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrialError {
    #[error("Invalid distance: {0}")]
    InvalidRadius(String),

    #[error("Invalid age: {0}")]
    InvalidAge(String),
}
