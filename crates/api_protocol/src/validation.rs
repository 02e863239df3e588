//! Request validation.

use thiserror::Error;

/// A request field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Checks a decoded request before it reaches the store.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Rejects empty or whitespace-only text.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

/// Like [`require_text`] for optional fields: absent is fine, blank is not.
pub fn optional_text(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| require_text(field, v))
}

/// Rejects text longer than `max` characters.
pub fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// Rejects numbers outside `min..=max`.
pub fn require_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), ValidationError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("title", "Run").is_ok());
        let err = require_text("title", "   ").unwrap_err();
        assert_eq!(err.to_string(), "title: must not be empty");
    }

    #[test]
    fn test_optional_text() {
        assert!(optional_text("notes", None).is_ok());
        assert!(optional_text("notes", Some("")).is_err());
    }

    #[test]
    fn test_require_range() {
        assert!(require_range("energyLevel", 1u8, 1, 10).is_ok());
        assert!(require_range("energyLevel", 10u8, 1, 10).is_ok());
        assert!(require_range("energyLevel", 0u8, 1, 10).is_err());
        assert!(require_range("energyLevel", 11u8, 1, 10).is_err());
    }

    #[test]
    fn test_max_chars() {
        assert!(max_chars("content", "héllo", 5).is_ok());
        assert!(max_chars("content", "héllo!", 5).is_err());
    }
}
