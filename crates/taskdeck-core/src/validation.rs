//! Field validation helpers.
//!
//! Request types validate every field and report all problems at once, so a
//! client fixing a form sees the complete list of messages in one response.

use std::str::FromStr;

use crate::error::{Error, Result};

/// Maximum length of a task title or project name.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length of a description.
pub const MAX_DESCRIPTION_LEN: usize = 10_000;

/// Allowed username length range.
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;

/// Minimum password length.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Accumulates per-field messages.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Parse an optional enum field, recording a message on failure.
    pub fn parse_enum<T: FromStr<Err = String>>(
        &mut self,
        field: &str,
        value: Option<&str>,
    ) -> Option<T> {
        let raw = value?;
        match raw.parse::<T>() {
            Ok(v) => Some(v),
            Err(e) => {
                self.push(format!("{}: {}", field, e));
                None
            }
        }
    }

    /// Check a required, bounded text field and return it trimmed.
    pub fn required_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        max: usize,
    ) -> Option<String> {
        match value.map(str::trim) {
            None | Some("") => {
                self.push(format!("{} is required", field));
                None
            }
            Some(s) if s.chars().count() > max => {
                self.push(format!("{} must be at most {} characters", field, max));
                None
            }
            Some(s) => Some(s.to_string()),
        }
    }

    /// Check an optional bounded text field.
    pub fn bounded_text(&mut self, field: &str, value: Option<&str>, max: usize) -> Option<String> {
        let s = value?;
        if s.chars().count() > max {
            self.push(format!("{} must be at most {} characters", field, max));
            return None;
        }
        Some(s.to_string())
    }

    /// Consume the collector, yielding `value` only if nothing was recorded.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T> {
        if self.messages.is_empty() {
            Ok(value())
        } else {
            Err(Error::Validation(self.messages))
        }
    }
}

/// Validate and normalize an email address (lowercased, trimmed).
pub fn validate_email(errors: &mut ValidationErrors, email: &str) -> String {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.push("email must be a valid email address");
    }
    email
}

/// Validate a username: 3–32 characters of letters, digits, `_`, `.` or `-`.
pub fn validate_username(errors: &mut ValidationErrors, username: &str) -> String {
    let username = username.trim().to_string();
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        errors.push(format!(
            "username must be between {} and {} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        ));
    } else if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        errors.push("username may only contain letters, digits, '_', '.' and '-'");
    }
    username
}

/// Validate a new password.
pub fn validate_password(errors: &mut ValidationErrors, password: &str) {
    if password.chars().count() < PASSWORD_MIN_LEN {
        errors.push(format!(
            "password must be at least {} characters",
            PASSWORD_MIN_LEN
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    #[test]
    fn test_finish_ok_when_empty() {
        let errors = ValidationErrors::new();
        assert_eq!(errors.finish(|| 5).unwrap(), 5);
    }

    #[test]
    fn test_finish_collects_all_messages() {
        let mut errors = ValidationErrors::new();
        errors.required_text("name", None, 10);
        errors.required_text("title", Some("   "), 10);
        match errors.finish(|| ()) {
            Err(Error::Validation(msgs)) => {
                assert_eq!(msgs, vec!["name is required", "title is required"])
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_required_text_enforces_max() {
        let mut errors = ValidationErrors::new();
        assert!(errors.required_text("name", Some("abcdef"), 3).is_none());
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_parse_enum_records_field_name() {
        let mut errors = ValidationErrors::new();
        let parsed: Option<Priority> = errors.parse_enum("priority", Some("asap"));
        assert!(parsed.is_none());
        match errors.finish(|| ()) {
            Err(Error::Validation(msgs)) => assert!(msgs[0].starts_with("priority: ")),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_enum_absent_is_silent() {
        let mut errors = ValidationErrors::new();
        let parsed: Option<Priority> = errors.parse_enum("priority", None);
        assert!(parsed.is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_email_validation() {
        let mut errors = ValidationErrors::new();
        assert_eq!(validate_email(&mut errors, " Ada@Example.COM "), "ada@example.com");
        assert!(errors.is_empty());

        for bad in ["ada", "ada@", "@example.com", "ada@example", "ada@.com", "a da@x.io"] {
            let mut errors = ValidationErrors::new();
            validate_email(&mut errors, bad);
            assert!(!errors.is_empty(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_username_validation() {
        let mut errors = ValidationErrors::new();
        validate_username(&mut errors, "ada.lovelace_1");
        assert!(errors.is_empty());

        let too_long = "x".repeat(33);
        for bad in ["ab", "has space", "semi;colon", too_long.as_str()] {
            let mut errors = ValidationErrors::new();
            validate_username(&mut errors, bad);
            assert!(!errors.is_empty(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_password_validation() {
        let mut errors = ValidationErrors::new();
        validate_password(&mut errors, "short");
        assert!(!errors.is_empty());

        let mut errors = ValidationErrors::new();
        validate_password(&mut errors, "long enough");
        assert!(errors.is_empty());
    }
}
