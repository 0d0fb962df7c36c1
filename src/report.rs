//! Violation reporting structures
//!
//! Everything a validation pass hands back to callers is data: an ordered
//! sequence of [`ErrorDetail`] records, each tagged with the keyword that
//! produced it. Only schema compilation raises
//! [`ValidationError`](crate::error::ValidationError) as a fatal error.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;

/// Message attached to a keyword violation that supplied no detail of its own
pub const GENERIC_MESSAGE: &str = "invalid input data";

/// A single recorded violation
///
/// Carries the failing keyword plus either a human-readable `message` or a
/// nested `errors` list (for keywords that wrap other validators).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Name of the failing keyword
    pub keyword: String,
    /// Human-readable description of the violation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Violations reported by nested validators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
}

impl ErrorDetail {
    /// A violation carrying the generic message
    #[must_use]
    pub fn generic(keyword: impl Into<String>) -> Self {
        Self::message(keyword, GENERIC_MESSAGE)
    }

    /// A violation with a specific message
    #[must_use]
    pub fn message(keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            message: Some(message.into()),
            errors: None,
        }
    }

    /// A violation wrapping the violations of a nested validator
    #[must_use]
    pub fn nested(keyword: impl Into<String>, errors: Vec<ErrorDetail>) -> Self {
        Self {
            keyword: keyword.into(),
            message: None,
            errors: Some(errors),
        }
    }

    /// A keyword tag with no message, as carried by wrapped type errors
    #[must_use]
    pub fn bare(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            message: None,
            errors: None,
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.errors) {
            (Some(message), _) => write!(f, "{}: {}", self.keyword, message),
            (None, Some(errors)) => write!(f, "{}: {} nested error(s)", self.keyword, errors.len()),
            (None, None) => write!(f, "{}", self.keyword),
        }
    }
}

/// Result of a keyword handler
///
/// The tagged union behind every registered keyword: success, generic
/// failure, failure with a specific message, or failure with sub-errors
/// collected from nested validators. The engine tags the resulting
/// [`ErrorDetail`] with the keyword's own name.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Constraint satisfied
    Valid,
    /// Constraint violated; the engine supplies the generic message
    Invalid,
    /// Constraint violated with a specific message
    Message(String),
    /// Constraint violated with nested details
    Nested(Vec<ErrorDetail>),
}

impl From<bool> for Outcome {
    fn from(satisfied: bool) -> Self {
        if satisfied { Self::Valid } else { Self::Invalid }
    }
}

/// Result of an immediate-mode validation pass
#[derive(Debug, Clone, PartialEq)]
pub enum Validity {
    /// The value satisfies the schema
    Valid,
    /// Ordered violations, in collection order
    Invalid(Vec<ErrorDetail>),
}

impl Validity {
    /// Whether the pass produced zero violations
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The recorded violations; empty when valid
    #[must_use]
    pub fn errors(&self) -> &[ErrorDetail] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Consume the result, yielding the violations
    #[must_use]
    pub fn into_errors(self) -> Vec<ErrorDetail> {
        match self {
            Self::Valid => Vec::new(),
            Self::Invalid(errors) => errors,
        }
    }
}

/// Structured report carried by a fatal error
///
/// Deferred type-check failures wrap a *single* detail, while invalid
/// defaults carry the full violation list; the two shapes are kept distinct
/// on purpose (inherited asymmetry with the immediate pipeline).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    /// One wrapped detail
    Detail(ErrorDetail),
    /// An ordered detail sequence
    Details(Vec<ErrorDetail>),
}

impl Report {
    /// View the report as a detail slice
    #[must_use]
    pub fn details(&self) -> &[ErrorDetail] {
        match self {
            Self::Detail(detail) => std::slice::from_ref(detail),
            Self::Details(details) => details,
        }
    }
}

/// Failure payload of a deferred validation pass
///
/// Rejection is the signaling channel of deferred mode, but it still carries
/// structured data: either a single wrapped type error or the plain ordered
/// violation sequence from the keyword loop.
#[derive(Debug, Error)]
pub enum Rejection {
    /// The type check failed; a single wrapped error
    #[error(transparent)]
    Fatal(#[from] ValidationError),
    /// The keyword loop collected violations
    #[error("validation failed with {} violation(s)", .0.len())]
    Violations(Vec<ErrorDetail>),
}

impl Rejection {
    /// Keyword violations, when the rejection is not a wrapped type error
    #[must_use]
    pub fn violations(&self) -> Option<&[ErrorDetail]> {
        match self {
            Self::Fatal(_) => None,
            Self::Violations(errors) => Some(errors),
        }
    }
}
