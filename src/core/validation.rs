//! Validation helpers for configuration values

use std::fmt;

/// A configuration value failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, ValidationError> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err(ValidationError::new("Value must be greater than 0")),
        Ok(n) => Ok(n),
        Err(_) => Err(ValidationError::new(format!(
            "'{}' is not a valid positive integer",
            value
        ))),
    }
}

/// Normalise a file extension: trim, strip a leading dot, lowercase
pub fn validate_extension(ext: &str) -> Result<String, ValidationError> {
    let trimmed = ext.trim();
    let cleaned = trimmed.strip_prefix('.').unwrap_or(trimmed);

    if cleaned.is_empty() {
        return Err(ValidationError::new("Extension cannot be empty"));
    }

    if cleaned.contains('/') || cleaned.contains('\\') || cleaned.contains(char::is_whitespace) {
        return Err(ValidationError::new(format!(
            "Extension '{}' cannot contain path separators or whitespace",
            ext
        )));
    }

    Ok(cleaned.to_lowercase())
}

/// Split comma-separated values, trimming and dropping empties and repeats
///
/// Order of first appearance is kept.
pub fn split_comma_separated(values: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter(|part| seen.insert(part.to_string()))
        .map(str::to_string)
        .collect()
}

/// Parse a chat/user identifier as a signed integer
pub fn validate_user_id(value: &str) -> Result<i64, ValidationError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::new(format!("'{}' is not a valid numeric id", value)))
}
