//! Validator configuration
//!
//! The configuration is a process-supplied object shared by every validator
//! built from it: execution mode, per-type keyword registries, per-type
//! compile steps, per-type low-level checkers, and an opaque `generic`
//! payload that keyword handlers and compile steps may read.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::engine::Validator;
use crate::error::Result;
use crate::keywords::KeywordRegistry;
use crate::schema::Schema;
use crate::typecheck::TypeHandler;

/// Execution mode, fixed per configuration at construction time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Blocking pipeline: `compile` / `validate`
    #[default]
    Immediate,
    /// Suspending pipeline: `compile_deferred` / `validate_deferred`
    Deferred,
}

/// One-time preparation routine run per validator before repeated use
///
/// Steps receive the validator mutably so they can register closure
/// keywords wrapping precompiled nested validators; a step's own fatal
/// error aborts the remaining sequence.
pub type CompileStep = Arc<dyn Fn(&mut Validator) -> Result<()> + Send + Sync>;

/// Shared configuration for a family of validators
#[derive(Default)]
pub struct ValidatorConfig {
    mode: ExecutionMode,
    types: HashMap<String, Arc<dyn TypeHandler>>,
    keywords: HashMap<String, KeywordRegistry>,
    compile_steps: HashMap<String, Vec<CompileStep>>,
    generic: Value,
}

impl ValidatorConfig {
    /// Create an empty configuration for the given mode
    #[must_use]
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Create an empty immediate-mode configuration
    #[must_use]
    pub fn immediate() -> Self {
        Self::new(ExecutionMode::Immediate)
    }

    /// Create an empty deferred-mode configuration
    #[must_use]
    pub fn deferred() -> Self {
        Self::new(ExecutionMode::Deferred)
    }

    /// Register the low-level checker for a schema type
    #[must_use]
    pub fn with_type(
        mut self,
        type_name: impl Into<String>,
        handler: impl TypeHandler + 'static,
    ) -> Self {
        self.types.insert(type_name.into(), Arc::new(handler));
        self
    }

    /// Register the keyword registry for a schema type
    ///
    /// A type-specific registry replaces the global set wholesale;
    /// `default` and `required` must be re-declared in it to stay active.
    #[must_use]
    pub fn with_keywords(mut self, type_name: impl Into<String>, registry: KeywordRegistry) -> Self {
        self.keywords.insert(type_name.into(), registry);
        self
    }

    /// Append a compile step for a schema type
    #[must_use]
    pub fn with_compile_step(
        mut self,
        type_name: impl Into<String>,
        step: impl Fn(&mut Validator) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.compile_steps
            .entry(type_name.into())
            .or_default()
            .push(Arc::new(step));
        self
    }

    /// Attach the opaque passthrough payload
    #[must_use]
    pub fn with_generic(mut self, generic: Value) -> Self {
        self.generic = generic;
        self
    }

    /// The configured execution mode
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// The opaque passthrough payload
    #[must_use]
    pub fn generic(&self) -> &Value {
        &self.generic
    }

    pub(crate) fn type_handler(&self, type_name: &str) -> Option<Arc<dyn TypeHandler>> {
        self.types.get(type_name).cloned()
    }

    pub(crate) fn keywords_for(&self, type_name: &str) -> Option<&KeywordRegistry> {
        self.keywords.get(type_name)
    }

    pub(crate) fn compile_steps_for(&self, type_name: &str) -> Vec<CompileStep> {
        self.compile_steps
            .get(type_name)
            .cloned()
            .unwrap_or_default()
    }
}

impl fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("mode", &self.mode)
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("keywords", &self.keywords.keys().collect::<Vec<_>>())
            .field(
                "compile_steps",
                &self.compile_steps.keys().collect::<Vec<_>>(),
            )
            .field("generic", &self.generic)
            .finish()
    }
}

/// Narrow read-only view handed to keyword handlers and type checks
///
/// The schema and configuration are passed explicitly instead of being
/// reachable through an implicit receiver, so handlers cannot mutate
/// validator state from inside the loop.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    /// The schema owned by the running validator
    pub schema: &'a Schema,
    /// The shared configuration
    pub config: &'a ValidatorConfig,
}

impl<'a> Scope<'a> {
    /// The opaque passthrough payload
    #[must_use]
    pub fn generic(self) -> &'a Value {
        self.config.generic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_defaults_to_immediate() {
        let config = ValidatorConfig::default();
        assert_eq!(config.mode(), ExecutionMode::Immediate);
        assert_eq!(ValidatorConfig::deferred().mode(), ExecutionMode::Deferred);
    }

    #[test]
    fn test_compile_steps_accumulate_in_order() {
        let config = ValidatorConfig::immediate()
            .with_compile_step("object", |_| Ok(()))
            .with_compile_step("object", |_| Ok(()));
        assert_eq!(config.compile_steps_for("object").len(), 2);
        assert!(config.compile_steps_for("string").is_empty());
    }

    #[test]
    fn test_scope_exposes_generic() {
        let config = ValidatorConfig::immediate().with_generic(json!({"locale": "en"}));
        let schema = Schema::new("string");
        let scope = Scope {
            schema: &schema,
            config: &config,
        };
        assert_eq!(scope.generic(), &json!({"locale": "en"}));
    }
}
