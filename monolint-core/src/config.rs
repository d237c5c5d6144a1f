//! Lint configuration and its resolution against a rule registry.

use crate::error::ConfigError;
use crate::pattern::PatternSet;
use crate::rule::{BoundRule, RuleRegistry};
use camino::Utf8PathBuf;
use monolint_types::{FailureKind, RuleFailureRecord};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Rule list as written by the user, before options are validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub rule: String,
    pub options: Option<Value>,
    pub include_packages: Vec<String>,
    pub exclude_packages: Vec<String>,
    pub include_workspace_root: bool,
}

/// Which packages a configured rule runs against.
#[derive(Debug, Clone, Default)]
pub struct PackageScope {
    include: PatternSet,
    exclude: PatternSet,
    include_workspace_root: bool,
}

impl PackageScope {
    pub fn new(
        include: PatternSet,
        exclude: PatternSet,
        include_workspace_root: bool,
    ) -> Self {
        Self {
            include,
            exclude,
            include_workspace_root,
        }
    }

    /// Members only.
    pub fn all_members() -> Self {
        Self::default()
    }

    /// Whether a member named `name` is in scope. Unnamed members only
    /// match an empty include list.
    pub fn applies_to_member(&self, name: Option<&str>) -> bool {
        match name {
            Some(name) => {
                (self.include.is_empty() || self.include.matches_any(name))
                    && !self.exclude.matches_any(name)
            }
            None => self.include.is_empty(),
        }
    }

    pub fn applies_to_root(&self) -> bool {
        self.include_workspace_root
    }
}

/// A bound rule ready to run.
pub struct RuleEntry {
    pub name: String,
    pub rule: Box<dyn BoundRule>,
    pub scope: PackageScope,
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Run-wide switches.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub fix: bool,
    /// When non-empty, only these member directories are checked.
    pub paths: Vec<Utf8PathBuf>,
}

/// Configuration shared read-only by every context of a run.
#[derive(Debug, Default)]
pub struct ResolvedConfig {
    pub rules: Vec<RuleEntry>,
    pub settings: RunSettings,
    /// Rules that could not be bound; reported and skipped.
    pub failures: Vec<RuleFailureRecord>,
}

impl ResolvedConfig {
    pub fn new(settings: RunSettings) -> Self {
        Self {
            rules: Vec::new(),
            settings,
            failures: Vec::new(),
        }
    }

    pub fn with_rule(mut self, entry: RuleEntry) -> Self {
        self.rules.push(entry);
        self
    }

    pub fn applies_to_root(&self) -> bool {
        self.rules.iter().any(|r| r.scope.applies_to_root())
    }
}

/// Bind every configured rule in order.
pub fn resolve_config(
    config: &LintConfig,
    registry: &RuleRegistry,
    settings: RunSettings,
) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::new(settings);
    for rc in &config.rules {
        match resolve_entry(rc, registry) {
            Ok(entry) => {
                debug!(rule = %entry.name, "rule configured");
                resolved.rules.push(entry);
            }
            Err(err) => {
                warn!(rule = %rc.rule, error = %err, "rule skipped");
                resolved.failures.push(RuleFailureRecord {
                    rule: rc.rule.clone(),
                    package_dir: None,
                    kind: FailureKind::Config,
                    message: err.to_string(),
                });
            }
        }
    }
    resolved
}

fn resolve_entry(rc: &RuleConfig, registry: &RuleRegistry) -> Result<RuleEntry, ConfigError> {
    let rule = registry.bind(&rc.rule, rc.options.as_ref())?;
    let scope = PackageScope::new(
        PatternSet::new(&rc.include_packages)?,
        PatternSet::new(&rc.exclude_packages)?,
        rc.include_workspace_root,
    );
    Ok(RuleEntry {
        name: rc.rule.clone(),
        rule,
        scope,
    })
}
