//! Input validation and sanitization utilities
//!
//! This module provides utilities for validating user input and
//! configuration values before they reach the network or the database.

use crate::error::{CliError, ConfigError};

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    // Basic URL validation - must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::InvalidValue {
            field: "url".to_string(),
            value: url.to_string(),
            reason: "URL must start with http:// or https://".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Reject empty required flag values, naming the flag in the message
pub fn validate_required(value: &str, field: &str, flag: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(CliError::InvalidArguments(format!(
            "{} cannot be empty; please provide it using the {} flag",
            field, flag
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;

    #[test]
    fn test_validate_url_accepts_valid_urls() {
        assert!(validate_url("http://localhost:3000").is_ok());
        assert!(validate_url("https://dblyser.example.com/v1/data").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_invalid_urls() {
        assert!(validate_url("").is_err());
        assert!(validate_url("localhost:3000").is_err());
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("user@example.com", "email", "--email or -e").is_ok());

        let err = validate_required("  ", "email", "--email or -e").unwrap_err();
        assert_eq!(
            err.to_string(),
            "CliError: Invalid arguments: email cannot be empty; please provide it using the --email or -e flag"
        );
    }
}
