//! Validation engine
//!
//! One [`Validator`] wraps one schema node. Construction resolves the
//! keyword registry and binds the low-level type checker; `compile` runs
//! the one-time lifecycle; `validate` / `validate_deferred` are then called
//! arbitrarily often. Both pipelines share the same default-substitution
//! and keyword-loop core, so the immediate and deferred paths cannot drift
//! apart; only the type-check step and the error surfacing differ.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{CompileStep, ExecutionMode, Scope, ValidatorConfig};
use crate::context::ValidationContext;
use crate::error::{Result, ValidationError};
use crate::keywords::KeywordRegistry;
use crate::report::{ErrorDetail, Outcome, Rejection, Report, Validity};
use crate::schema::Schema;
use crate::typecheck::{CheckOutcome, CheckResult, TypeHandler};

/// Per-schema validator instance
pub struct Validator {
    schema: Schema,
    config: Arc<ValidatorConfig>,
    keywords: KeywordRegistry,
    compile_steps: Vec<CompileStep>,
    type_handler: Arc<dyn TypeHandler>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Build a validator for one schema node
    ///
    /// The keyword registry starts as the global set (`default`,
    /// `required`) and is replaced wholesale when the configuration carries
    /// a registry for the schema's declared type.
    ///
    /// # Errors
    ///
    /// Returns an error when the schema's `type` tag is unusable or no
    /// type handler is registered for it.
    pub fn new(schema: Schema, config: Arc<ValidatorConfig>) -> Result<Self> {
        let type_name = schema.type_name().to_string();
        if type_name.is_empty() {
            return Err(ValidationError::invalid_schema(
                "`type` must be a non-empty string",
            ));
        }
        let type_handler = config
            .type_handler(&type_name)
            .ok_or_else(|| ValidationError::unknown_type(&type_name))?;
        let keywords = config
            .keywords_for(&type_name)
            .cloned()
            .unwrap_or_else(KeywordRegistry::global);
        let compile_steps = config.compile_steps_for(&type_name);
        debug!(
            %type_name,
            keywords = keywords.len(),
            compile_steps = compile_steps.len(),
            "validator constructed"
        );

        Ok(Self {
            schema,
            config,
            keywords,
            compile_steps,
            type_handler,
        })
    }

    /// The wrapped schema
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The shared configuration
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The configured execution mode
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.config.mode()
    }

    /// The resolved keyword registry
    #[must_use]
    pub fn keywords(&self) -> &KeywordRegistry {
        &self.keywords
    }

    /// The resolved compile-step sequence
    #[must_use]
    pub fn compile_steps(&self) -> &[CompileStep] {
        &self.compile_steps
    }

    /// The opaque passthrough payload
    #[must_use]
    pub fn generic(&self) -> &Value {
        self.config.generic()
    }

    /// Register one keyword handler, overwriting any same-named entry
    ///
    /// The registry may only be extended before `compile`; once any
    /// validation may be in flight it is treated as immutable.
    ///
    /// # Errors
    ///
    /// Returns an error when the keyword name is invalid.
    pub fn add_keyword(
        &mut self,
        name: &str,
        handler: impl Fn(&Value, &mut ValidationContext, Scope<'_>) -> Outcome
        + Send
        + Sync
        + 'static,
    ) -> Result<()> {
        self.keywords.register(name, handler)
    }

    /// Merge a registry into the resolved one; later entries win
    pub fn extend_keywords(&mut self, registry: KeywordRegistry) {
        self.keywords.extend(registry);
    }

    fn scope(&self) -> Scope<'_> {
        Scope {
            schema: &self.schema,
            config: &self.config,
        }
    }

    /// Run the `default` substitution, outside the keyword loop and before
    /// the type check. A no-op unless the schema declares a `default` and a
    /// `default` handler survived registry resolution.
    fn apply_default(&self, ctx: &mut ValidationContext) {
        let Some(declared) = self.schema.default_value() else {
            return;
        };
        let Some(handler) = self.keywords.get("default") else {
            return;
        };
        handler(declared, ctx, self.scope());
    }

    /// Run every registered keyword declared in the schema, in declaration
    /// order, excluding `type` and `default`. Declared keywords with no
    /// registered handler are skipped.
    fn run_keywords(&self, ctx: &mut ValidationContext) -> Vec<ErrorDetail> {
        let mut errors = Vec::new();
        for (name, declared) in self.schema.iter() {
            if name == "type" || name == "default" {
                continue;
            }
            let Some(handler) = self.keywords.get(name) else {
                continue;
            };
            match handler(declared, ctx, self.scope()) {
                Outcome::Valid => {}
                Outcome::Invalid => errors.push(ErrorDetail::generic(name)),
                Outcome::Message(message) => errors.push(ErrorDetail::message(name, message)),
                Outcome::Nested(nested) => errors.push(ErrorDetail::nested(name, nested)),
            }
        }
        errors
    }

    /// Immediate-mode validation
    ///
    /// Never signals ordinary invalid input through an error channel; all
    /// violations come back as data so callers can present them at once.
    pub fn validate(&self, value: impl Into<Option<Value>>) -> Validity {
        let mut ctx = ValidationContext::new(value.into());
        self.apply_default(&mut ctx);

        match self.type_handler.check(&ctx, self.scope()) {
            CheckResult::Valid => {}
            CheckResult::Invalid => {
                return Validity::Invalid(vec![ErrorDetail::message("type", "invalid type input")]);
            }
            CheckResult::Detail(detail) => return Validity::Invalid(vec![detail]),
            CheckResult::Details(details) => return Validity::Invalid(details),
        }

        let errors = self.run_keywords(&mut ctx);
        if errors.is_empty() {
            Validity::Valid
        } else {
            trace!(violations = errors.len(), "validation collected violations");
            Validity::Invalid(errors)
        }
    }

    /// Deferred-mode validation
    ///
    /// The type check is the single suspension point; the keyword loop runs
    /// without suspending once it settles. A type-check failure (settled or
    /// pre-formed) rejects with a *single* wrapped error, while keyword
    /// violations reject with the plain ordered sequence. The asymmetry with
    /// the immediate pipeline is inherited behavior, kept intact.
    pub async fn validate_deferred(
        &self,
        value: impl Into<Option<Value>>,
    ) -> Result<(), Rejection> {
        let mut ctx = ValidationContext::new(value.into());
        self.apply_default(&mut ctx);

        let settled = match self.type_handler.check_deferred(&ctx, self.scope()) {
            CheckOutcome::Ready(result) => result,
            CheckOutcome::Deferred(pending) => {
                trace!("type check suspended");
                pending.await
            }
        };

        match settled {
            CheckResult::Valid => {}
            CheckResult::Invalid => {
                return Err(Rejection::Fatal(ValidationError::invalid_type_input(
                    Report::Detail(ErrorDetail::bare("type")),
                )));
            }
            CheckResult::Detail(detail) => {
                return Err(Rejection::Fatal(ValidationError::invalid_type_input(
                    Report::Detail(detail),
                )));
            }
            CheckResult::Details(details) => {
                return Err(Rejection::Fatal(ValidationError::invalid_type_input(
                    Report::Details(details),
                )));
            }
        }

        let errors = self.run_keywords(&mut ctx);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Rejection::Violations(errors))
        }
    }

    /// Immediate-mode compile lifecycle
    ///
    /// With a declared `default`, the default value is validated against
    /// the schema itself: an invalid default aborts compilation fatally,
    /// and a valid one short-circuits compilation successfully *without*
    /// running any compile step. Compile steps run only when no `default`
    /// is declared. The short-circuit is inherited behavior, kept intact.
    ///
    /// # Errors
    ///
    /// Returns an error when the declared default violates the schema or a
    /// compile step raises its own fatal error.
    pub fn compile(&mut self) -> Result<()> {
        if let Some(default) = self.schema.default_value().cloned() {
            return match self.validate(default.clone()) {
                Validity::Valid => {
                    debug!("schema default is valid; compile steps skipped");
                    Ok(())
                }
                Validity::Invalid(errors) => {
                    Err(ValidationError::invalid_default(&default, errors))
                }
            };
        }
        self.run_compile_steps()
    }

    /// Deferred-mode compile lifecycle
    ///
    /// With a declared `default`, the deferred default-check result is
    /// surfaced directly, success or rejection, and compile steps are
    /// bypassed either way, mirroring the immediate short-circuit.
    ///
    /// # Errors
    ///
    /// Rejects when the declared default violates the schema or a compile
    /// step raises its own fatal error.
    pub async fn compile_deferred(&mut self) -> Result<(), Rejection> {
        if let Some(default) = self.schema.default_value().cloned() {
            return self.validate_deferred(default).await;
        }
        self.run_compile_steps()?;
        Ok(())
    }

    fn run_compile_steps(&mut self) -> Result<()> {
        let steps = self.compile_steps.clone();
        trace!(steps = steps.len(), "running compile steps");
        for step in &steps {
            step(self)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::typecheck::check_fn;

    fn any_value(_ctx: &ValidationContext, _scope: Scope<'_>) -> CheckResult {
        CheckResult::Valid
    }

    fn string_only(ctx: &ValidationContext, _scope: Scope<'_>) -> CheckResult {
        CheckResult::from(matches!(ctx.value(), Some(v) if v.is_string()))
    }

    fn number_only(ctx: &ValidationContext, _scope: Scope<'_>) -> CheckResult {
        CheckResult::from(matches!(ctx.value(), Some(v) if v.is_number()))
    }

    fn object_report(_ctx: &ValidationContext, _scope: Scope<'_>) -> CheckResult {
        CheckResult::Detail(ErrorDetail::message("type", "expected an object"))
    }

    fn base_config() -> ValidatorConfig {
        ValidatorConfig::immediate()
            .with_type("any", check_fn(any_value))
            .with_type("string", check_fn(string_only))
            .with_type("number", check_fn(number_only))
    }

    #[test]
    fn test_construction_rejects_unknown_type() {
        let config = Arc::new(base_config());
        let err = Validator::new(Schema::new("date"), config).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownType { .. }));
    }

    #[test]
    fn test_global_registry_resolved_by_default() {
        let config = Arc::new(base_config());
        let validator = Validator::new(Schema::new("string"), config).expect("known type");
        assert!(validator.keywords().contains("default"));
        assert!(validator.keywords().contains("required"));
        assert_eq!(validator.keywords().len(), 2);
    }

    #[test]
    fn test_type_specific_registry_replaces_global_set() {
        let mut registry = KeywordRegistry::new();
        registry
            .register("minimum", |_, _, _| Outcome::Valid)
            .expect("valid name");
        let config = Arc::new(base_config().with_keywords("number", registry));

        let validator = Validator::new(Schema::new("number"), config).expect("known type");
        assert!(validator.keywords().contains("minimum"));
        // No merging: the global pair is gone unless re-declared.
        assert!(!validator.keywords().contains("default"));
        assert!(!validator.keywords().contains("required"));
    }

    #[test]
    fn test_type_mismatch_detail() {
        let config = Arc::new(base_config());
        let validator = Validator::new(Schema::new("string"), config).expect("known type");

        let result = validator.validate(json!(42));
        assert_eq!(
            result,
            Validity::Invalid(vec![ErrorDetail::message("type", "invalid type input")])
        );
    }

    #[test]
    fn test_preformed_type_report_is_passed_through() {
        let config =
            Arc::new(ValidatorConfig::immediate().with_type("object", check_fn(object_report)));
        let validator = Validator::new(Schema::new("object"), config).expect("known type");

        let result = validator.validate(json!(1));
        assert_eq!(
            result,
            Validity::Invalid(vec![ErrorDetail::message("type", "expected an object")])
        );
    }

    #[test]
    fn test_keyword_errors_follow_declaration_order() {
        let config = Arc::new(base_config());
        let schema = Schema::new("number")
            .with("maximum", 1)
            .with("minimum", 5)
            .with("unhandled", true);
        let mut validator = Validator::new(schema, config).expect("known type");
        validator
            .add_keyword("minimum", |declared, ctx, _| {
                let below = match (declared.as_f64(), ctx.value().and_then(Value::as_f64)) {
                    (Some(min), Some(value)) => value < min,
                    _ => false,
                };
                Outcome::from(!below)
            })
            .expect("valid name");
        validator
            .add_keyword("maximum", |declared, ctx, _| {
                let above = match (declared.as_f64(), ctx.value().and_then(Value::as_f64)) {
                    (Some(max), Some(value)) => value > max,
                    _ => false,
                };
                Outcome::from(!above)
            })
            .expect("valid name");

        let result = validator.validate(json!(3));
        // `maximum` was declared first, so it is reported first; the
        // unregistered `unhandled` keyword is skipped.
        assert_eq!(
            result.errors(),
            &[
                ErrorDetail::generic("maximum"),
                ErrorDetail::generic("minimum"),
            ]
        );
    }

    #[test]
    fn test_default_substitutes_before_type_check() {
        let config = Arc::new(base_config());
        let schema = Schema::new("string").with("default", "x");
        let validator = Validator::new(schema, config).expect("known type");

        // Absent input takes the default and passes the string check.
        assert!(validator.validate(None).is_valid());
        // A present value of the wrong type is not replaced.
        assert!(!validator.validate(json!(7)).is_valid());
    }

    #[test]
    fn test_default_handler_removed_means_no_substitution() {
        let mut registry = KeywordRegistry::new();
        registry
            .register("required", crate::keywords::check_required)
            .expect("valid name");
        let config = Arc::new(base_config().with_keywords("string", registry));

        let schema = Schema::new("string").with("default", "x");
        let validator = Validator::new(schema, config).expect("known type");

        // Without a `default` handler the absent value stays absent and
        // fails the type check.
        assert!(!validator.validate(None).is_valid());
    }

    #[test]
    fn test_compile_rejects_invalid_default() {
        let config = Arc::new(base_config());
        let schema = Schema::new("string").with("default", 42);
        let mut validator = Validator::new(schema, config).expect("known type");

        let err = validator.compile().unwrap_err();
        match err {
            ValidationError::InvalidDefault { value, report } => {
                assert_eq!(value, "42");
                assert_eq!(
                    report.details(),
                    &[ErrorDetail::message("type", "invalid type input")]
                );
            }
            other => panic!("expected InvalidDefault, got {other:?}"),
        }
    }

    #[test]
    fn test_compile_step_failure_aborts_sequence() {
        let config = Arc::new(
            base_config()
                .with_compile_step("any", |_| Err(ValidationError::fatal("step failed")))
                .with_compile_step("any", |validator| {
                    validator.add_keyword("never", |_, _, _| Outcome::Invalid)
                }),
        );
        let mut validator = Validator::new(Schema::new("any"), config).expect("known type");

        let err = validator.compile().unwrap_err();
        assert!(matches!(err, ValidationError::Fatal { .. }));
        // The second step never ran.
        assert!(!validator.keywords().contains("never"));
    }
}
