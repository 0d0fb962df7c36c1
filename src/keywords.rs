//! Keyword registry and the global generic keywords
//!
//! A keyword is a named constraint backed by a handler function. Each
//! validator resolves its own registry at construction: the global set
//! (`default` and `required` only), replaced wholesale by a type-specific
//! registry when the configuration declares one.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::Scope;
use crate::context::ValidationContext;
use crate::error::{Result, ValidationError};
use crate::report::Outcome;

/// Handler backing a registered keyword
///
/// Invoked with the keyword's declared schema value, the mutable validation
/// context, and the read-only [`Scope`] view.
pub type KeywordFn =
    Arc<dyn Fn(&Value, &mut ValidationContext, Scope<'_>) -> Outcome + Send + Sync>;

/// Validated keyword identifier
///
/// Keywords are dispatched by schema field name; names are checked once at
/// registration so lookups never deal with malformed identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeywordName(String);

impl KeywordName {
    /// Validate a keyword name: non-empty, no whitespace or control characters
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::invalid_keyword_name(name));
        }
        Ok(Self(name))
    }

    /// The name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Built-in names are vetted at compile time.
    fn known(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for KeywordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for KeywordName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for KeywordName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolved mapping of keyword name to handler for one validator
#[derive(Clone, Default)]
pub struct KeywordRegistry {
    handlers: IndexMap<KeywordName, KeywordFn>,
}

impl KeywordRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The global set: exactly `default` and `required`
    #[must_use]
    pub fn global() -> Self {
        let mut registry = Self::new();
        registry
            .handlers
            .insert(KeywordName::known("default"), Arc::new(apply_default) as KeywordFn);
        registry
            .handlers
            .insert(KeywordName::known("required"), Arc::new(check_required) as KeywordFn);
        registry
    }

    /// Register a handler, overwriting any same-named entry
    pub fn register(
        &mut self,
        name: &str,
        handler: impl Fn(&Value, &mut ValidationContext, Scope<'_>) -> Outcome + Send + Sync + 'static,
    ) -> Result<()> {
        let name = KeywordName::new(name)?;
        self.handlers.insert(name, Arc::new(handler));
        Ok(())
    }

    /// Insert an already-validated name and shared handler
    pub fn insert(&mut self, name: KeywordName, handler: KeywordFn) {
        self.handlers.insert(name, handler);
    }

    /// Merge another registry in; later entries overwrite same-named ones
    pub fn extend(&mut self, other: KeywordRegistry) {
        for (name, handler) in other.handlers {
            self.handlers.insert(name, handler);
        }
    }

    /// Look up a handler by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&KeywordFn> {
        self.handlers.get(name)
    }

    /// Whether a handler is registered under the given name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(KeywordName::as_str)
    }

    /// Number of registered handlers
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for KeywordRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// The global `default` keyword: substitute the declared value when the
/// input is absent; always succeeds.
///
/// Runs outside the keyword loop, before the type check.
pub fn apply_default(declared: &Value, ctx: &mut ValidationContext, _scope: Scope<'_>) -> Outcome {
    if ctx.is_absent() {
        ctx.set_value(declared.clone());
    }
    Outcome::Valid
}

/// The global `required` keyword: fails only when declared exactly `true`
/// and the input is absent; any other declared value always passes.
pub fn check_required(declared: &Value, ctx: &mut ValidationContext, _scope: Scope<'_>) -> Outcome {
    if declared == &Value::Bool(true) {
        return Outcome::from(!ctx.is_absent());
    }
    Outcome::Valid
}
