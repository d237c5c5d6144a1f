//! Shared DTOs (schemas-as-code) for the monolint workspace.
//!
//! # Design constraints
//! - These types are serialized for `--format json` and by embedders.
//! - Prefer adding optional fields over changing semantics.

pub mod report;

pub use report::{
    FailureKind, FindingRecord, LintReport, ReportSummary, RuleFailureRecord, RunInfo, RunMode,
    Severity, ToolInfo, Verdict, VerdictStatus,
};

/// Schema identifiers.
pub mod schema {
    pub const MONOLINT_REPORT_V1: &str = "monolint.report.v1";
}
