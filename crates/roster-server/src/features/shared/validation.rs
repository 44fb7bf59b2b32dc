//! Shared validation utilities
//!
//! Common validation functions for request data across commands and queries.
//!
//! # Examples
//!
//! ```rust,ignore
//! use roster_server::features::shared::validation::{validate_text, validate_email, validate_url};
//!
//! validate_text("Ada Lovelace", "name", 2, 100)?;
//! validate_email("ada@example.com", 100)?;
//! if let Some(url) = &photo_url {
//!     validate_url(url, "photoUrl")?;
//! }
//! ```

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur during field validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("email must be a valid address")]
    EmailFormat,

    #[error("{field} URL is invalid: must start with http:// or https://")]
    UrlFormat { field: &'static str },
}

// Syntactic check only: one @, no whitespace, dotted domain.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

/// Validate a free-text field
///
/// # Rules
/// - Must not be empty after trimming whitespace
/// - Trimmed length must be within `min..=max` characters
pub fn validate_text(
    value: &str,
    field: &'static str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }

    let length = trimmed.chars().count();
    if length < min || length > max {
        return Err(ValidationError::Length { field, min, max });
    }

    Ok(())
}

/// Validate an email address
///
/// # Rules
/// - Must not be empty after trimming whitespace
/// - Must not exceed `max` characters
/// - Must match the syntactic email pattern
pub fn validate_email(value: &str, max: usize) -> Result<(), ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "email" });
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::Length {
            field: "email",
            min: 1,
            max,
        });
    }

    if !email_pattern().is_match(trimmed) {
        return Err(ValidationError::EmailFormat);
    }

    Ok(())
}

/// Validate a URL field
///
/// # Rules
/// - Must start with `http://` or `https://`
pub fn validate_url(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::UrlFormat { field })
    }
}
