use thiserror::Error;

use crate::services::validation_service::ValidationIssue;

/// Problems loading a draft or writing through a key path.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Invalid draft JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown field path: {0}")]
    UnknownPath(String),

    #[error("Field is read-only: {0}")]
    ReadOnlyPath(String),

    #[error("Invalid value for {path}: {reason}")]
    InvalidValue { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Invalid event ID: {0}")]
    InvalidId(String),

    #[error("Submission rejected: {0}")]
    Rejected(String),
}

impl From<bson::ser::Error> for SinkError {
    fn from(value: bson::ser::Error) -> Self {
        SinkError::Encoding(value.to_string())
    }
}

impl From<bson::de::Error> for SinkError {
    fn from(value: bson::de::Error) -> Self {
        SinkError::Encoding(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Inline field messages; the draft was not sent.
    #[error("Draft has {} validation issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    /// Single banner message; the draft is unchanged so the user can retry.
    #[error("{banner}")]
    Submission { banner: String, source: SinkError },

    #[error("Could not encode draft: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Configuration error: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, DraftError>;
