//! Request validation utilities for the manual trigger.

use std::fmt;

/// Validation error type.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate that a string is not empty or whitespace only.
///
/// # Example
/// ```
/// use seatsweep::server::validation::validate_not_empty;
///
/// assert!(validate_not_empty("hello", "name").is_ok());
/// assert!(validate_not_empty("   ", "name").is_err());
/// ```
pub fn validate_not_empty(value: &str, field_name: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        Err(ValidationError {
            field: field_name.to_string(),
            message: "cannot be empty".to_string(),
        })
    } else {
        Ok(())
    }
}

/// Normalize a directory lookup key.
///
/// The key is matched case-insensitively against the directory, so any
/// non-blank value is accepted; an email address is the usual form.
///
/// # Example
/// ```
/// use seatsweep::server::validation::normalize_lookup_key;
///
/// assert_eq!(normalize_lookup_key(" svc-bot ", "email").unwrap(), "svc-bot");
/// assert!(normalize_lookup_key("  ", "email").is_err());
/// ```
pub fn normalize_lookup_key<'a>(value: &'a str, field_name: &str) -> ValidationResult<&'a str> {
    validate_not_empty(value, field_name)?;
    Ok(value.trim())
}
