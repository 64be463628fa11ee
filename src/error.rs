use thiserror::Error;

use crate::domain::error::OddsError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Caller input that is missing or malformed.
///
/// Always recoverable by correcting the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ValidationError {
    /// Shorthand for a single missing field.
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::MissingFields {
            fields: vec![field],
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("tracked suggestion not found: {key}")]
    NotFound { key: String },

    #[error(transparent)]
    InvalidOdds(#[from] OddsError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// True for failures of the persistence collaborator.
    ///
    /// These are surfaced as-is; retrying is left to the caller.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::Database(_) | Error::Parse(_)
        )
    }

    /// True for errors caused by the caller's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::NotFound { .. } | Error::InvalidOdds(_)
        )
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
