//! Validation of raw dispatcher strings
//!
//! The dispatcher hands every field over as text. These helpers turn that
//! text into typed values or an `InputError` before anything is bound.

use crate::errors::InputError;

/// Parse an integer field, rejecting anything that is not a plain integer
///
/// # Errors
/// `InputError::NotAnInteger` when the trimmed text does not parse as `i64`.
pub fn parse_integer(field: &str, raw: &str) -> Result<i64, InputError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| InputError::NotAnInteger {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Require a non-blank field and return it trimmed
///
/// # Errors
/// `InputError::MissingValue` when the text is empty or whitespace.
pub fn require_value<'a>(field: &str, raw: &'a str) -> Result<&'a str, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingValue {
            field: field.to_string(),
        });
    }
    Ok(trimmed)
}

/// Treat blank input as "not supplied"
pub fn optional_value(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
