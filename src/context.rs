//! Validation context
//!
//! The context is the per-call holder of the value under validation. It
//! exists so the `default` keyword can substitute a value before the type
//! check and before the other keywords run, all within a single pass. It is
//! created fresh for every validate call and discarded afterwards, never
//! shared across calls or across concurrent validations.

use serde_json::Value;

/// Mutable holder of the value currently being validated
///
/// `None` models an *absent* input; JSON `null` is an ordinary present
/// value and is never treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationContext {
    value: Option<Value>,
}

impl ValidationContext {
    /// Wrap an input value, or the absent input
    #[must_use]
    pub fn new(value: Option<Value>) -> Self {
        Self { value }
    }

    /// The absent input
    #[must_use]
    pub fn absent() -> Self {
        Self { value: None }
    }

    /// The value under validation, if present
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether no value is present
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    /// Replace the value under validation
    pub fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }

    /// Consume the context, yielding the (possibly substituted) value
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        self.value
    }
}
