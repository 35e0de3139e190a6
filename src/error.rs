//! Error types for the architecture copilot

use thiserror::Error;

/// Result type alias for copilot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading the corpus, retrieving context or
/// calling the completion service
#[derive(Debug, Error)]
pub enum Error {
    /// A corpus row is missing a required field
    #[error("validation error: row {row} has an empty `{field}` field")]
    Validation {
        /// Zero-based row index in the authored corpus
        row: usize,
        /// Name of the offending column
        field: &'static str,
    },

    /// Caller passed an argument outside the accepted domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Completion service failure (network, auth, rate limit)
    #[error("completion service error: {0}")]
    Service(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_row_and_field() {
        let err = Error::Validation {
            row: 3,
            field: "description",
        };
        assert_eq!(
            err.to_string(),
            "validation error: row 3 has an empty `description` field"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
