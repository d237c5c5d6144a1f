//! Built-in monolint rules.
//!
//! Each rule is a [`RuleModule`](monolint_core::RuleModule) registered by
//! name in [`builtin_registry`]. Rules read package state through the
//! context and attach fixers to their findings; they never write files
//! themselves.

mod banned_dependencies;
mod consistent_dependencies;
mod file_contents;
mod generator;
mod standard_tsconfig;

pub use banned_dependencies::{
    BannedDependencies, BannedDependenciesOptions, retained_dependencies,
};
pub use consistent_dependencies::{ConsistentDependencies, expected_dependencies};
pub use file_contents::{ContentSource, FileContents, FileContentsOptions};
pub use generator::Generator;
pub use standard_tsconfig::{
    StandardTsconfig, StandardTsconfigOptions, TSCONFIG_FILE, TsconfigSource, render_tsconfig,
};

use monolint_core::{RuleMeta, RuleRegistry};

/// Registry holding every built-in rule.
pub fn builtin_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(|| ConsistentDependencies);
    registry.register(|| BannedDependencies);
    registry.register(|| FileContents);
    registry.register(|| StandardTsconfig);
    registry
}

pub fn builtin_rule_metas() -> Vec<RuleMeta> {
    builtin_registry().metas()
}
