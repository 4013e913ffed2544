//! Error types for the growth_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for growth_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more measurements fell outside their plausible range.
    /// Carries every violated rule, not just the first.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The LMS transform was handed a non-positive or non-finite input
    #[error("Computation error: {0}")]
    Computation(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// The list of violated rules, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            Error::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_rule() {
        let err = Error::Validation(vec!["weight too low".into(), "height too high".into()]);
        assert_eq!(
            err.to_string(),
            "Validation failed: weight too low; height too high"
        );
        assert_eq!(err.validation_errors().map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_non_validation_error_has_no_rule_list() {
        let err = Error::Computation("M must be positive".into());
        assert!(err.validation_errors().is_none());
    }
}
