//! The check/fix pipeline over one workspace.
//!
//! All filesystem access goes through the [`FileSystem`] port, so a run
//! over an in-memory tree behaves exactly like one over disk.

use crate::config::{ResolvedConfig, RuleEntry};
use crate::context::Context;
use crate::error::RuleError;
use anyhow::Context as _;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use monolint_fs::FileSystem;
use monolint_types::{
    FailureKind, FindingRecord, LintReport, RuleFailureRecord, RunInfo, RunMode, Severity,
    ToolInfo,
};
use tracing::{debug, info, warn};

/// Pseudo rule name for failures that belong to no configured rule.
pub const WORKSPACE_FAILURE: &str = "workspace";

pub struct Engine<'a> {
    config: &'a ResolvedConfig,
    fs: &'a dyn FileSystem,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub mode: RunMode,
    pub findings: Vec<FindingRecord>,
    pub failures: Vec<RuleFailureRecord>,
    pub packages_checked: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn into_report(self, tool: ToolInfo) -> LintReport {
        let mut report = LintReport::new(tool, self.mode);
        let duration_ms = (self.ended_at - self.started_at).num_milliseconds().max(0) as u64;
        report.run = RunInfo {
            started_at: Some(self.started_at),
            ended_at: Some(self.ended_at),
            duration_ms: Some(duration_ms),
        };
        report.summary.packages_checked = self.packages_checked;
        report.findings = self.findings;
        report.failures = self.failures;
        report.recompute();
        report
    }
}

struct Collector {
    fix: bool,
    findings: Vec<FindingRecord>,
    failures: Vec<RuleFailureRecord>,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a ResolvedConfig, fs: &'a dyn FileSystem) -> Self {
        Self { config, fs }
    }

    /// Check (and in fix mode, repair) the workspace rooted at `root`.
    ///
    /// Only failure to open the workspace itself is an `Err`; rule
    /// failures are collected in the outcome.
    pub fn run(&self, root: &Utf8Path) -> anyhow::Result<RunOutcome> {
        let started_at = Utc::now();
        let settings = &self.config.settings;
        let mode = if settings.fix { RunMode::Fix } else { RunMode::Check };
        info!(root = %root, mode = ?mode, rules = self.config.rules.len(), "lint run started");

        let mut collector = Collector {
            fix: settings.fix,
            findings: Vec::new(),
            failures: self.config.failures.clone(),
        };
        let mut packages_checked = 0u64;

        let mut root_ctx = Context::workspace(root, self.config, self.fs)
            .with_context(|| format!("open workspace {}", root))?;

        if self.config.applies_to_root() {
            packages_checked += 1;
            for entry in self.config.rules.iter().filter(|r| r.scope.applies_to_root()) {
                collector.run_rule(&mut root_ctx, entry);
            }
        }

        let dirs = root_ctx
            .workspace_package_dirs()
            .with_context(|| format!("enumerate workspace packages under {}", root))?
            .to_vec();
        let dirs = self.select(root, dirs);
        debug!(count = dirs.len(), "member packages selected");

        for dir in dirs {
            let mut child = match root_ctx.create_child_context(dir.clone()) {
                Ok(child) => child,
                Err(err) => {
                    collector.workspace_failure(&dir, FailureKind::Config, err.to_string());
                    continue;
                }
            };
            let name = match child.package_json() {
                Ok(pj) => pj.name().map(str::to_string),
                Err(err) => {
                    collector.workspace_failure(&dir, FailureKind::Config, err.to_string());
                    continue;
                }
            };
            packages_checked += 1;

            for entry in self
                .config
                .rules
                .iter()
                .filter(|r| r.scope.applies_to_member(name.as_deref()))
            {
                collector.run_rule(&mut child, entry);
            }
        }

        let ended_at = Utc::now();
        info!(
            packages = packages_checked,
            findings = collector.findings.len(),
            failures = collector.failures.len(),
            "lint run finished"
        );

        Ok(RunOutcome {
            mode,
            findings: collector.findings,
            failures: collector.failures,
            packages_checked,
            started_at,
            ended_at,
        })
    }

    fn select(&self, root: &Utf8Path, dirs: Vec<Utf8PathBuf>) -> Vec<Utf8PathBuf> {
        let paths = &self.config.settings.paths;
        if paths.is_empty() {
            return dirs;
        }
        let wanted: Vec<Utf8PathBuf> = paths
            .iter()
            .map(|p| {
                let full = if p.is_absolute() { p.clone() } else { root.join(p) };
                lexical_normalize(&full)
            })
            .collect();
        for path in &wanted {
            if !dirs.contains(path) {
                warn!(path = %path, "requested path is not a workspace package");
            }
        }
        dirs.into_iter().filter(|d| wanted.contains(d)).collect()
    }
}

/// `path` with `.` dropped, `..` folded into its parent and no trailing
/// separator. Symlinks are not resolved.
fn lexical_normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

impl Collector {
    fn run_rule(&mut self, ctx: &mut Context<'_>, entry: &RuleEntry) {
        debug!(rule = %entry.name, package = %ctx.package_dir(), "checking");
        let result = entry.rule.check(ctx);

        let fs = ctx.file_system();
        let package_dir = ctx.package_dir().to_path_buf();
        let mut applied = false;

        for reported in ctx.take_findings() {
            let finding = reported.finding;
            let mut record = FindingRecord {
                rule: entry.name.clone(),
                severity: reported.severity,
                package_dir: package_dir.clone(),
                file: finding.file.clone(),
                message: finding.message.clone(),
                long_message: finding.long_message.clone(),
                fixable: finding.fixer.is_some(),
                fixed: false,
                fix_error: None,
            };

            if self.fix
                && reported.severity == Severity::Error
                && let Some(fixer) = &finding.fixer
            {
                match fixer.apply(fs) {
                    Ok(()) => {
                        info!(rule = %entry.name, file = %finding.file, "fixed");
                        record.fixed = true;
                        applied = true;
                    }
                    Err(err) => {
                        warn!(rule = %entry.name, file = %finding.file, error = %format!("{err:#}"), "fix failed");
                        record.fix_error = Some(format!("{err:#}"));
                    }
                }
            }
            self.findings.push(record);
        }

        if applied {
            ctx.invalidate_package_json();
        }

        if let Err(err) = result {
            let kind = match &err {
                RuleError::Config(_) => FailureKind::Config,
                RuleError::Runtime(_) => FailureKind::Runtime,
            };
            warn!(rule = %entry.name, package = %package_dir, error = %err, "rule failed");
            self.failures.push(RuleFailureRecord {
                rule: entry.name.clone(),
                package_dir: Some(package_dir),
                kind,
                message: err.to_string(),
            });
        }
    }

    fn workspace_failure(&mut self, dir: &Utf8Path, kind: FailureKind, message: String) {
        warn!(dir = %dir, error = %message, "package skipped");
        self.failures.push(RuleFailureRecord {
            rule: WORKSPACE_FAILURE.to_string(),
            package_dir: Some(dir.to_path_buf()),
            kind,
            message,
        });
    }
}
