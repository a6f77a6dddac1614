//! Validation utilities for dumbbell-core
//!
//! Small, composable checks used by the configuration layer. Every check
//! names the offending field so a rejected config points straight at the
//! key that needs fixing.

use std::fmt::Display;
use std::net::SocketAddr;
use thiserror::Error;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of valid range
    #[error("Field '{field}' value '{value}' is out of range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    /// Required field missing or blank
    #[error("Required field '{0}' is missing")]
    RequiredFieldMissing(String),

    /// Invalid field format
    #[error("Field '{field}' has invalid format '{value}', expected {expected}")]
    InvalidFormat {
        field: String,
        value: String,
        expected: String,
    },

    /// Numeric value is NaN or infinite
    #[error("Field '{0}' must be a finite number")]
    NotFinite(String),
}

/// Check that `value` lies inside the inclusive range `[min, max]`.
pub fn validate_range<T>(field: &str, value: T, min: T, max: T) -> ValidationResult<()>
where
    T: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Like [`validate_range`] but also rejects NaN and infinities.
pub fn validate_finite_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field.to_string()));
    }
    validate_range(field, value, min, max)
}

/// Reject values that are `<= 0.0`, NaN or infinite, or above `max`.
pub fn validate_positive(field: &str, value: f64, max: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field.to_string()));
    }
    if value <= 0.0 || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: "0 (exclusive)".to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Reject empty or whitespace-only strings.
pub fn validate_non_empty(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing(field.to_string()));
    }
    Ok(())
}

/// Parse a `host:port` socket address.
pub fn validate_socket_addr(field: &str, value: &str) -> ValidationResult<SocketAddr> {
    value.parse::<SocketAddr>().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        value: value.to_string(),
        expected: "a socket address such as 0.0.0.0:12345".to_string(),
    })
}

/// Parse an absolute `http` or `https` URL.
pub fn validate_http_url(field: &str, value: &str) -> ValidationResult<reqwest::Url> {
    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        value: value.to_string(),
        expected: "an http:// or https:// URL".to_string(),
    };

    let url = reqwest::Url::parse(value).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert!(validate_range("reps", 1u32, 1, 10).is_ok());
        assert!(validate_range("reps", 10u32, 1, 10).is_ok());

        let err = validate_range("reps", 11u32, 1, 10).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "reps"));
    }

    #[test]
    fn test_finite_checks() {
        assert!(matches!(
            validate_finite_range("weight", f64::NAN, 0.0, 1.0),
            Err(ValidationError::NotFinite(_))
        ));
        assert!(validate_positive("rep_duration", 0.0, 10.0).is_err());
        assert!(validate_positive("rep_duration", 3.0, 10.0).is_ok());
        assert!(validate_positive("rep_duration", f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(validate_non_empty("device.id", "abc").is_ok());
        assert_eq!(
            validate_non_empty("device.id", "   "),
            Err(ValidationError::RequiredFieldMissing("device.id".to_string()))
        );
    }

    #[test]
    fn test_socket_addr_and_url() {
        assert!(validate_socket_addr("listen", "127.0.0.1:12345").is_ok());
        assert!(validate_socket_addr("listen", "localhost").is_err());

        assert!(validate_http_url("collector", "http://localhost:5000").is_ok());
        assert!(validate_http_url("collector", "ftp://localhost").is_err());
        assert!(validate_http_url("collector", "not a url").is_err());
    }
}
