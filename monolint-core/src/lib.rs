//! Rule-execution engine for monolint.
//!
//! A run resolves the configured rules against a [`RuleRegistry`], opens
//! the workspace root as a [`Context`], creates a child context per member
//! package and invokes each applicable rule's `check`. Rules only observe
//! state through the context and only report through
//! [`Context::add_error`] / [`Context::add_warning`]; fixes are attached to
//! findings as data and applied by the [`Engine`] in fix mode.

pub mod config;
pub mod context;
pub mod diff;
pub mod engine;
pub mod error;
pub mod finding;
pub mod manifest;
pub mod pattern;
pub mod rule;

pub use config::{
    LintConfig, PackageScope, ResolvedConfig, RuleConfig, RuleEntry, RunSettings, resolve_config,
};
pub use context::Context;
pub use engine::{Engine, RunOutcome};
pub use error::{ConfigError, RuleError};
pub use finding::{Finding, FixOp, Fixer, ReportedFinding};
pub use manifest::{DependencyKind, PackageJson};
pub use pattern::PatternSet;
pub use rule::{BoundRule, RuleDescription, RuleMeta, RuleModule, RuleRegistry, bind, bind_with};
