//! Error types for schema compilation and validation

use serde_json::Value;
use thiserror::Error;

use crate::report::{ErrorDetail, Report};

/// Fatal error raised while building or compiling a validator.
///
/// Per-value violations are never surfaced through this type; they are
/// returned as data (see [`crate::report::Validity`] and
/// [`crate::report::Rejection`]). A `ValidationError` always signals a
/// malformed schema or misconfigured validator, not a bad input value.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema document cannot back a validator
    #[error("invalid schema: {reason}")]
    InvalidSchema {
        /// Why the schema was rejected
        reason: String,
    },

    /// The schema's declared type has no registered low-level checker
    #[error("no type handler registered for `{type_name}`")]
    UnknownType {
        /// The offending `type` tag
        type_name: String,
    },

    /// Keyword names must be non-empty and free of whitespace
    #[error("invalid keyword name {name:?}")]
    InvalidKeywordName {
        /// The rejected name
        name: String,
    },

    /// The schema's own `default` value failed validation
    #[error("Invalid default value {value}")]
    InvalidDefault {
        /// JSON rendering of the invalid default
        value: String,
        /// The violations the default produced
        report: Report,
    },

    /// A deferred type check settled to a mismatch or pre-formed report
    #[error("Invalid type input")]
    InvalidTypeInput {
        /// Structured report carried by the failure
        report: Report,
    },

    /// Free-form fatal error, raised by compile steps
    #[error("{message}")]
    Fatal {
        /// Human-readable description
        message: String,
    },
}

/// Result type alias for validator operations
pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

impl ValidationError {
    /// Create a new invalid-schema error
    #[must_use]
    pub fn invalid_schema(reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            reason: reason.into(),
        }
    }

    /// Create a new unknown-type error
    #[must_use]
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// Create a new invalid-keyword-name error
    #[must_use]
    pub fn invalid_keyword_name(name: impl Into<String>) -> Self {
        Self::InvalidKeywordName { name: name.into() }
    }

    /// Create the fatal compile error for an invalid schema default
    #[must_use]
    pub fn invalid_default(value: &Value, violations: Vec<ErrorDetail>) -> Self {
        Self::InvalidDefault {
            value: value.to_string(),
            report: Report::Details(violations),
        }
    }

    /// Create the wrapped error surfaced by the deferred type check
    #[must_use]
    pub fn invalid_type_input(report: Report) -> Self {
        Self::InvalidTypeInput { report }
    }

    /// Create a free-form fatal error
    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    /// Structured report carried by this error, if any
    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::InvalidDefault { report, .. } | Self::InvalidTypeInput { report } => Some(report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = ValidationError::invalid_default(&json!({"a": 1}), Vec::new());
        assert_eq!(err.to_string(), r#"Invalid default value {"a":1}"#);

        let err = ValidationError::unknown_type("string");
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn test_report_accessor() {
        let err = ValidationError::invalid_type_input(Report::Detail(ErrorDetail::bare("type")));
        let report = err.report().expect("type errors carry a report");
        assert_eq!(report.details().len(), 1);

        assert!(ValidationError::fatal("boom").report().is_none());
    }
}
