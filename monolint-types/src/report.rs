use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The full result of one lint run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub mode: RunMode,
    pub verdict: Verdict,
    pub summary: ReportSummary,

    #[serde(default)]
    pub findings: Vec<FindingRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RuleFailureRecord>,
}

impl LintReport {
    pub fn new(tool: ToolInfo, mode: RunMode) -> Self {
        Self {
            schema: crate::schema::MONOLINT_REPORT_V1.to_string(),
            tool,
            run: RunInfo::default(),
            mode,
            verdict: Verdict::default(),
            summary: ReportSummary::default(),
            findings: vec![],
            failures: vec![],
        }
    }

    /// Recompute `summary` and `verdict` from `findings` and `failures`.
    ///
    /// `packages_checked` is left untouched; only the engine knows it.
    pub fn recompute(&mut self) {
        let mut summary = ReportSummary {
            packages_checked: self.summary.packages_checked,
            ..ReportSummary::default()
        };

        for f in &self.findings {
            match f.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
            }
            if f.fixed {
                summary.fixed += 1;
            }
            if f.fix_error.is_some() {
                summary.fix_failures += 1;
            }
        }
        summary.failures = self.failures.len() as u64;

        let mut reasons = Vec::new();
        let unfixed = summary.unfixed_errors();
        if unfixed > 0 {
            reasons.push(format!("{} unfixed error finding(s)", unfixed));
        }
        if summary.failures > 0 {
            reasons.push(format!("{} rule failure(s)", summary.failures));
        }

        let status = if !reasons.is_empty() {
            VerdictStatus::Fail
        } else if summary.warnings > 0 {
            VerdictStatus::Warn
        } else {
            VerdictStatus::Pass
        };

        self.summary = summary;
        self.verdict = Verdict { status, reasons };
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Whether fixers were invoked during the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Check,
    Fix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    #[default]
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub packages_checked: u64,
    pub errors: u64,
    pub warnings: u64,
    pub fixed: u64,

    #[serde(default)]
    pub fix_failures: u64,

    #[serde(default)]
    pub failures: u64,
}

impl ReportSummary {
    /// Error findings still standing after the run.
    pub fn unfixed_errors(&self) -> u64 {
        self.errors.saturating_sub(self.fixed)
    }
}

/// A lint finding, as reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingRecord {
    pub rule: String,
    pub severity: Severity,
    pub package_dir: Utf8PathBuf,
    pub file: Utf8PathBuf,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_message: Option<String>,

    #[serde(default)]
    pub fixable: bool,

    #[serde(default)]
    pub fixed: bool,

    /// Set when the fixer ran and failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Malformed options, missing workspace, unresolvable generator, ...
    Config,
    /// I/O or parse failure while the rule was reading package state.
    Runtime,
}

/// A rule that could not run for a package (or at all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleFailureRecord {
    pub rule: String,

    /// `None` when the rule failed before any package was visited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_dir: Option<Utf8PathBuf>,

    pub kind: FailureKind,
    pub message: String,
}
