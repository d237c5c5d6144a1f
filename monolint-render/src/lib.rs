//! Rendering helpers for human-readable and machine-readable reports.

use camino::Utf8Path;
use monolint_types::{FailureKind, FindingRecord, LintReport, RunMode, Severity, VerdictStatus};

/// Terminal listing grouped by file, followed by rule failures and a
/// summary line. Long messages are only shown when `verbose` is set.
pub fn render_text(report: &LintReport, verbose: bool) -> String {
    let mut out = String::new();

    for (file, findings) in group_by_file(&report.findings) {
        out.push_str(&format!("{}\n", file));
        for f in findings {
            out.push_str(&format!(
                "  {:<7} [{}] {}{}\n",
                f.severity.label(),
                f.rule,
                f.message,
                fix_suffix(f)
            ));
            if verbose && let Some(long) = &f.long_message {
                for line in long.lines() {
                    out.push_str(&format!("      {}\n", line));
                }
            }
        }
        out.push('\n');
    }

    if !report.failures.is_empty() {
        out.push_str("rule failures\n");
        for failure in &report.failures {
            let at = failure
                .package_dir
                .as_ref()
                .map(|p| format!(" ({})", p))
                .unwrap_or_default();
            out.push_str(&format!(
                "  {:<7} [{}]{} {}\n",
                kind_label(failure.kind),
                failure.rule,
                at,
                failure.message
            ));
        }
        out.push('\n');
    }

    let s = &report.summary;
    out.push_str(&format!(
        "{} package(s) checked: {} error(s), {} warning(s), {} fixed, {} rule failure(s) -> {}\n",
        s.packages_checked,
        s.errors,
        s.warnings,
        s.fixed,
        s.failures,
        verdict_label(report.verdict.status)
    ));
    let fixable = report.findings.iter().any(|f| f.fixable && !f.fixed);
    if report.mode == RunMode::Check && fixable {
        out.push_str("run with --fix to apply the available fixes\n");
    }
    out
}

pub fn render_markdown(report: &LintReport) -> String {
    let mut out = String::new();
    out.push_str("# monolint report\n\n");
    out.push_str(&format!(
        "- Verdict: `{}`\n",
        verdict_label(report.verdict.status)
    ));
    out.push_str(&format!("- Mode: `{}`\n", mode_label(report.mode)));
    out.push_str(&format!(
        "- Packages checked: {}\n",
        report.summary.packages_checked
    ));
    out.push_str(&format!(
        "- Errors: {} (fixed {}, fix failures {})\n- Warnings: {}\n- Rule failures: {}\n",
        report.summary.errors,
        report.summary.fixed,
        report.summary.fix_failures,
        report.summary.warnings,
        report.summary.failures
    ));
    for reason in &report.verdict.reasons {
        out.push_str(&format!("- Reason: {}\n", reason));
    }
    out.push('\n');

    out.push_str("## Findings\n\n");
    if report.findings.is_empty() {
        out.push_str("_No findings._\n");
    }
    for (i, f) in report.findings.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n\n", i + 1, f.message));
        out.push_str(&format!("- Rule: `{}`\n", f.rule));
        out.push_str(&format!("- Severity: `{}`\n", f.severity.label()));
        out.push_str(&format!("- File: `{}`\n", f.file));
        out.push_str(&format!(
            "- Fix: {}\n",
            match (f.fixed, &f.fix_error, f.fixable) {
                (true, _, _) => "applied".to_string(),
                (false, Some(err), _) => format!("failed ({})", err),
                (false, None, true) => "available".to_string(),
                (false, None, false) => "none".to_string(),
            }
        ));
        if let Some(long) = &f.long_message {
            out.push_str("\n```diff\n");
            out.push_str(long);
            if !long.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push('\n');
    }

    if !report.failures.is_empty() {
        out.push_str("## Rule failures\n\n");
        for failure in &report.failures {
            let at = failure
                .package_dir
                .as_ref()
                .map(|p| format!(" in `{}`", p))
                .unwrap_or_default();
            out.push_str(&format!(
                "- `{}`{} ({}): {}\n",
                failure.rule,
                at,
                kind_label(failure.kind),
                failure.message
            ));
        }
    }

    out
}

/// The report as pretty JSON with a trailing newline.
pub fn render_json(report: &LintReport) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}

/// Findings grouped by file, in order of first appearance.
fn group_by_file(findings: &[FindingRecord]) -> Vec<(&Utf8Path, Vec<&FindingRecord>)> {
    let mut groups: Vec<(&Utf8Path, Vec<&FindingRecord>)> = Vec::new();
    for f in findings {
        match groups.iter_mut().find(|(file, _)| *file == f.file.as_path()) {
            Some((_, list)) => list.push(f),
            None => groups.push((f.file.as_path(), vec![f])),
        }
    }
    groups
}

fn fix_suffix(f: &FindingRecord) -> String {
    if f.fixed {
        " (fixed)".to_string()
    } else if let Some(err) = &f.fix_error {
        format!(" (fix failed: {})", err)
    } else if f.fixable && f.severity == Severity::Error {
        " (fixable)".to_string()
    } else {
        String::new()
    }
}

fn verdict_label(s: VerdictStatus) -> &'static str {
    match s {
        VerdictStatus::Pass => "pass",
        VerdictStatus::Warn => "warn",
        VerdictStatus::Fail => "fail",
    }
}

fn mode_label(m: RunMode) -> &'static str {
    match m {
        RunMode::Check => "check",
        RunMode::Fix => "fix",
    }
}

fn kind_label(k: FailureKind) -> &'static str {
    match k {
        FailureKind::Config => "config",
        FailureKind::Runtime => "runtime",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monolint_types::{RuleFailureRecord, ToolInfo};
    use pretty_assertions::assert_eq;

    fn finding(file: &str, rule: &str, severity: Severity) -> FindingRecord {
        FindingRecord {
            rule: rule.to_string(),
            severity,
            package_dir: "/repo/packages/a".into(),
            file: file.into(),
            message: format!("{rule} message"),
            long_message: Some("-old\n+new\n".to_string()),
            fixable: true,
            fixed: false,
            fix_error: None,
        }
    }

    fn report() -> LintReport {
        let mut report = LintReport::new(
            ToolInfo {
                name: "monolint".to_string(),
                version: None,
            },
            RunMode::Check,
        );
        report.summary.packages_checked = 2;
        let manifest = "/repo/packages/a/package.json";
        report.findings = vec![
            finding(manifest, "consistent-dependencies", Severity::Error),
            finding("/repo/packages/a/tsconfig.json", "standard-tsconfig", Severity::Error),
            finding(manifest, "banned-dependencies", Severity::Error),
        ];
        report.failures = vec![RuleFailureRecord {
            rule: "file-contents".to_string(),
            package_dir: Some("/repo/packages/b".into()),
            kind: FailureKind::Config,
            message: "no workspace".to_string(),
        }];
        report.recompute();
        report
    }

    #[test]
    fn text_groups_findings_by_file() {
        let text = render_text(&report(), false);
        let expected = "\
/repo/packages/a/package.json
  error   [consistent-dependencies] consistent-dependencies message (fixable)
  error   [banned-dependencies] banned-dependencies message (fixable)

/repo/packages/a/tsconfig.json
  error   [standard-tsconfig] standard-tsconfig message (fixable)

rule failures
  config  [file-contents] (/repo/packages/b) no workspace

2 package(s) checked: 3 error(s), 0 warning(s), 0 fixed, 1 rule failure(s) -> fail
run with --fix to apply the available fixes
";
        assert_eq!(text, expected);
    }

    #[test]
    fn verbose_text_indents_long_messages() {
        let text = render_text(&report(), true);
        assert!(text.contains("\n      -old\n      +new\n"));
    }

    #[test]
    fn markdown_has_summary_and_diff_blocks() {
        let md = render_markdown(&report());
        assert!(md.starts_with("# monolint report\n\n- Verdict: `fail`\n"));
        assert!(md.contains("### 2. standard-tsconfig message"));
        assert!(md.contains("```diff\n-old\n+new\n```\n"));
        assert!(md.contains("- `file-contents` in `/repo/packages/b` (config): no workspace"));
    }

    #[test]
    fn empty_report_renders_cleanly() {
        let mut r = LintReport::new(
            ToolInfo {
                name: "monolint".to_string(),
                version: None,
            },
            RunMode::Fix,
        );
        r.recompute();
        assert_eq!(
            render_text(&r, false),
            "0 package(s) checked: 0 error(s), 0 warning(s), 0 fixed, 0 rule failure(s) -> pass\n"
        );
        assert!(render_markdown(&r).contains("_No findings._"));
        let json = render_json(&r).expect("json");
        assert!(json.ends_with("}\n"));
        assert!(json.contains("\"schema\": \"monolint.report.v1\""));
    }
}
