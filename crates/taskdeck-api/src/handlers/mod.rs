//! Route handlers, one module per resource.

pub mod auth;
pub mod health;
pub mod projects;
pub mod search;
pub mod settings;
pub mod stats;
pub mod tasks;

use serde::Serialize;
use utoipa::ToSchema;

use crate::ApiError;

/// `{success: true, message}`
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Check the optional `limit` query parameter; it must be at least 1.
pub(crate) fn parse_limit(limit: Option<i64>) -> Result<Option<usize>, ApiError> {
    match limit {
        None => Ok(None),
        Some(n) if n >= 1 => Ok(Some(usize::try_from(n).unwrap_or(usize::MAX))),
        Some(n) => Err(ApiError::BadRequest(format!(
            "limit must be a positive integer, got {}",
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), None);
        assert_eq!(parse_limit(Some(1)).unwrap(), Some(1));
        assert_eq!(parse_limit(Some(250)).unwrap(), Some(250));
        assert!(matches!(parse_limit(Some(0)), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_limit(Some(-5)), Err(ApiError::BadRequest(_))));
    }
}
