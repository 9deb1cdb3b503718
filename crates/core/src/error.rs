//! Domain error model.

use thiserror::Error;

/// Result type used across the metrics layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic data failures (schema, validation).
/// Calculators never return it: they fall back to documented defaults instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required column was blank in a record.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A calendar date or timestamp could not be parsed.
    #[error("invalid date in {field}: {value:?}")]
    InvalidDate { field: String, value: String },
}

impl DomainError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn invalid_date(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            DomainError::missing_field("planned_date").to_string(),
            "missing field: planned_date"
        );
        assert_eq!(
            DomainError::invalid_date("date", "31-31-2024").to_string(),
            "invalid date in date: \"31-31-2024\""
        );
    }
}
