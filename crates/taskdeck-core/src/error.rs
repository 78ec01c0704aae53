//! Error types for taskdeck.

use thiserror::Error;

/// Result type alias using taskdeck's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for taskdeck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found, or owned by another user
    #[error("Not found: {0}")]
    NotFound(String),

    /// One or more fields failed validation
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A resource reference that is not a valid identifier
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Structured filter payload could not be parsed
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unique constraint or state conflict
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a single-field validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(vec![message.into()])
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("task 42".to_string());
        assert_eq!(err.to_string(), "Not found: task 42");
    }

    #[test]
    fn test_error_display_validation_joins_messages() {
        let err = Error::Validation(vec![
            "name is required".to_string(),
            "deadline is required".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: name is required; deadline is required"
        );
    }

    #[test]
    fn test_error_validation_shorthand() {
        match Error::validation("title is required") {
            Error::Validation(msgs) => assert_eq!(msgs, vec!["title is required"]),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_error_display_invalid_id() {
        let err = Error::InvalidId("not-a-uuid".to_string());
        assert_eq!(err.to_string(), "Invalid identifier: not-a-uuid");
    }

    #[test]
    fn test_error_display_invalid_filter() {
        let err = Error::InvalidFilter("expected a JSON object".to_string());
        assert_eq!(err.to_string(), "Invalid filter: expected a JSON object");
    }

    #[test]
    fn test_error_display_unauthorized() {
        let err = Error::Unauthorized("invalid token".to_string());
        assert_eq!(err.to_string(), "Unauthorized: invalid token");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
