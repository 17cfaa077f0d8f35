//! Credential input validation
//!
//! Syntactic checks applied before any credential touches the store.

use crate::core::error::{LiftlogError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Local part, a single @, and a dotted domain; no whitespace anywhere
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Normalize an email for storage and lookup
///
/// Uniqueness is case-insensitive, so every email is trimmed and lowercased
/// before it reaches the credential store.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email syntax
pub fn validate_email(email: &str) -> Result<()> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(LiftlogError::ValidationError(
            "invalid email address".to_string(),
        ))
    }
}

/// Validate password strength
///
/// At least 8 characters, containing a lowercase letter, an uppercase
/// letter, and a digit.
pub fn validate_password(password: &str) -> Result<()> {
    let long_enough = password.chars().count() >= 8;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_lower && has_upper && has_digit {
        Ok(())
    } else {
        Err(LiftlogError::ValidationError(
            "password must be at least 8 characters and contain lowercase, uppercase, and numeric characters"
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("user0@test.net").is_ok());
        assert!(validate_email("first.last@sub.example.co").is_ok());
        assert!(validate_email("  padded@test.net  ").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(validate_email("asdf").is_err());
        assert!(validate_email("no-at.test.net").is_err());
        assert!(validate_email("@test.net").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("two words@test.net").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(normalize_email(" User0@Test.NET "), "user0@test.net");
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("asdfASDF1234!@#$").is_ok());
        assert!(validate_password("asdfASDF12").is_ok());

        // Too short
        assert!(validate_password("pass").is_err());
        assert!(validate_password("aB1").is_err());
        // Missing a character class
        assert!(validate_password("alllowercase1").is_err());
        assert!(validate_password("ALLUPPERCASE1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
    }

    #[test]
    fn test_policy_errors_are_validation_errors() {
        assert!(matches!(
            validate_email("asdf").unwrap_err(),
            LiftlogError::ValidationError(_)
        ));
        assert!(matches!(
            validate_password("pass").unwrap_err(),
            LiftlogError::ValidationError(_)
        ));
    }
}
