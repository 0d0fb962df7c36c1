//! schemakit: keyword-driven data validation
//!
//! Every schema node carries a `type` tag plus an ordered set of keyword
//! declarations. A [`Validator`] binds one [`Schema`] to a shared
//! [`ValidatorConfig`], resolving a per-type [`KeywordRegistry`] and a
//! low-level [`TypeHandler`] at construction time. Validation runs in three
//! phases: `default` substitution for absent input, the type check, then
//! every registered keyword in declaration order with violations collected
//! rather than short-circuited.
//!
//! Two pipelines share that core. [`Validator::validate`] settles
//! immediately and returns a [`Validity`]; [`Validator::validate_deferred`]
//! awaits a suspended type check and rejects through [`Rejection`]. The
//! [`Validator::compile`] lifecycle self-checks a declared `default` value
//! and skips the registered compile steps when one exists.
//!
//! ```
//! use schemakit::{Schema, Validator, ValidatorConfig, check_fn, CheckResult, Validity};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let config = Arc::new(ValidatorConfig::immediate().with_type(
//!     "string",
//!     check_fn(|ctx, _scope| {
//!         CheckResult::from(matches!(ctx.value(), Some(v) if v.is_string()))
//!     }),
//! ));
//! let schema = Schema::new("string").with("default", "fallback");
//! let validator = Validator::new(schema, config)?;
//!
//! assert!(validator.validate(json!("hello")).is_valid());
//! assert!(validator.validate(None).is_valid()); // default substituted
//! assert!(matches!(validator.validate(json!(3)), Validity::Invalid(_)));
//! # Ok::<(), schemakit::ValidationError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod report;
pub mod schema;
pub mod typecheck;

pub use config::{CompileStep, ExecutionMode, Scope, ValidatorConfig};
pub use context::ValidationContext;
pub use engine::Validator;
pub use error::{Result, ValidationError};
pub use keywords::{KeywordFn, KeywordName, KeywordRegistry, apply_default, check_required};
pub use report::{ErrorDetail, GENERIC_MESSAGE, Outcome, Rejection, Report, Validity};
pub use schema::Schema;
pub use typecheck::{CheckFn, CheckOutcome, CheckResult, TypeHandler, check_fn};

/// Convenience re-exports for downstream callers
pub mod prelude {
    pub use crate::config::{ExecutionMode, Scope, ValidatorConfig};
    pub use crate::context::ValidationContext;
    pub use crate::engine::Validator;
    pub use crate::error::{Result, ValidationError};
    pub use crate::keywords::{KeywordName, KeywordRegistry};
    pub use crate::report::{ErrorDetail, Outcome, Rejection, Validity};
    pub use crate::schema::Schema;
    pub use crate::typecheck::{CheckOutcome, CheckResult, TypeHandler, check_fn};
}
