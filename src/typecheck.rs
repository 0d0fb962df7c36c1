//! Low-level type checking seam
//!
//! Concrete per-type checkers live outside this crate; the engine only
//! depends on the [`TypeHandler`] trait. A handler decides whether the
//! context value is of the schema's declared type and may answer with a
//! plain verdict, a pre-formed report, or (in deferred mode) a future,
//! for instance when the check recurses into nested deferred validators.

use futures::future::BoxFuture;

use crate::config::Scope;
use crate::context::ValidationContext;
use crate::report::ErrorDetail;

/// Settled answer of a low-level type check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    /// The value is of the declared type
    Valid,
    /// Outright mismatch; the engine reports a generic `type` error
    Invalid,
    /// Pre-formed single detail
    Detail(ErrorDetail),
    /// Pre-formed detail sequence, e.g. collected from nested validators
    Details(Vec<ErrorDetail>),
}

impl From<bool> for CheckResult {
    fn from(matched: bool) -> Self {
        if matched { Self::Valid } else { Self::Invalid }
    }
}

/// A type check that may suspend before settling
pub enum CheckOutcome {
    /// The check settled without suspending
    Ready(CheckResult),
    /// The check suspends; the pipeline resumes once the future settles
    Deferred(BoxFuture<'static, CheckResult>),
}

/// Per-type specialization point for the low-level check
///
/// One handler is bound per validator at construction, selected by the
/// schema's `type` tag. Handlers read the context and the [`Scope`] view
/// (schema, configuration, generic data) but never mutate either.
pub trait TypeHandler: Send + Sync {
    /// Blocking type check, used by the immediate pipeline
    fn check(&self, ctx: &ValidationContext, scope: Scope<'_>) -> CheckResult;

    /// Deferred type check, used by the deferred pipeline
    ///
    /// Defaults to the blocking check with no suspension.
    fn check_deferred(&self, ctx: &ValidationContext, scope: Scope<'_>) -> CheckOutcome {
        CheckOutcome::Ready(self.check(ctx, scope))
    }
}

/// Adapter turning a plain function into a [`TypeHandler`]
pub struct CheckFn<F>(F);

/// Wrap a blocking check function as a [`TypeHandler`]
pub fn check_fn<F>(f: F) -> CheckFn<F>
where
    F: Fn(&ValidationContext, Scope<'_>) -> CheckResult + Send + Sync,
{
    CheckFn(f)
}

impl<F> TypeHandler for CheckFn<F>
where
    F: Fn(&ValidationContext, Scope<'_>) -> CheckResult + Send + Sync,
{
    fn check(&self, ctx: &ValidationContext, scope: Scope<'_>) -> CheckResult {
        (self.0)(ctx, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use crate::schema::Schema;

    fn accept_strings(ctx: &ValidationContext, _scope: Scope<'_>) -> CheckResult {
        CheckResult::from(matches!(ctx.value(), Some(v) if v.is_string()))
    }

    #[test]
    fn test_check_fn_adapter() {
        let handler = check_fn(accept_strings);
        let schema = Schema::new("string");
        let config = ValidatorConfig::immediate();
        let scope = Scope {
            schema: &schema,
            config: &config,
        };

        let ctx = ValidationContext::new(Some(serde_json::json!("hello")));
        assert_eq!(handler.check(&ctx, scope), CheckResult::Valid);

        let ctx = ValidationContext::new(Some(serde_json::json!(42)));
        assert_eq!(handler.check(&ctx, scope), CheckResult::Invalid);
    }

    #[test]
    fn test_default_deferred_check_is_ready() {
        let handler = check_fn(accept_strings);
        let schema = Schema::new("string");
        let config = ValidatorConfig::immediate();
        let scope = Scope {
            schema: &schema,
            config: &config,
        };

        let ctx = ValidationContext::absent();
        match handler.check_deferred(&ctx, scope) {
            CheckOutcome::Ready(result) => assert_eq!(result, CheckResult::Invalid),
            CheckOutcome::Deferred(_) => panic!("default impl must not suspend"),
        }
    }
}
