//! Form input validation shared by the admin console and storefront.

use thiserror::Error;

/// A form field failed validation before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was missing or blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// A field had a value that could not be accepted.
    #[error("{field} is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Trim `value` and reject it if nothing is left.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] naming `field` when the trimmed value is empty.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Trim an optional form value, mapping blanks to `None`.
#[must_use]
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Shoes "), Ok("Shoes".to_string()));
        assert_eq!(required("name", "   "), Err(ValidationError::Required("name")));
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(None), None);
        assert_eq!(optional(Some(" x ")), Some("x".to_string()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ValidationError::Required("name").to_string(), "name is required");
        let err = ValidationError::Invalid {
            field: "date",
            reason: "not a date".to_string(),
        };
        assert_eq!(err.to_string(), "date is invalid: not a date");
    }
}
