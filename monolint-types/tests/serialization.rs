use camino::Utf8PathBuf;
use monolint_types::{
    FailureKind, FindingRecord, LintReport, RuleFailureRecord, RunMode, Severity, ToolInfo,
    VerdictStatus,
};
use pretty_assertions::assert_eq;

fn tool() -> ToolInfo {
    ToolInfo {
        name: "monolint".to_string(),
        version: Some("0.0.0-test".to_string()),
    }
}

#[test]
fn enums_serialize_snake_case() {
    assert_eq!(
        serde_json::to_value(Severity::Warning).expect("serialize"),
        serde_json::json!("warning")
    );
    assert_eq!(
        serde_json::to_value(RunMode::Fix).expect("serialize"),
        serde_json::json!("fix")
    );
    assert_eq!(
        serde_json::to_value(FailureKind::Runtime).expect("serialize"),
        serde_json::json!("runtime")
    );
    assert_eq!(
        serde_json::to_value(VerdictStatus::Fail).expect("serialize"),
        serde_json::json!("fail")
    );
}

#[test]
fn report_omits_empty_failures_and_optional_fields() {
    let mut report = LintReport::new(tool(), RunMode::Check);
    report.findings.push(FindingRecord {
        rule: "consistent-dependencies".to_string(),
        severity: Severity::Error,
        package_dir: Utf8PathBuf::from("/repo/packages/a"),
        file: Utf8PathBuf::from("/repo/packages/a/package.json"),
        message: "Inconsistent dependencies with root in package.json".to_string(),
        long_message: None,
        fixable: true,
        fixed: false,
        fix_error: None,
    });
    report.recompute();

    let value = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(value["schema"], serde_json::json!("monolint.report.v1"));
    assert!(value.get("failures").is_none());
    assert!(value["findings"][0].get("long_message").is_none());
    assert!(value["findings"][0].get("fix_error").is_none());
    assert!(value["run"].get("started_at").is_none());
    assert_eq!(value["verdict"]["status"], serde_json::json!("fail"));
}

#[test]
fn report_parses_back_with_failures() {
    let mut report = LintReport::new(tool(), RunMode::Fix);
    report.failures.push(RuleFailureRecord {
        rule: "standard-tsconfig".to_string(),
        package_dir: Some(Utf8PathBuf::from("/repo/packages/b")),
        kind: FailureKind::Config,
        message: "expected exactly one of generator, template, template_file".to_string(),
    });
    report.recompute();

    let s = serde_json::to_string_pretty(&report).expect("serialize");
    let parsed: LintReport = serde_json::from_str(&s).expect("parse");
    assert_eq!(parsed.mode, RunMode::Fix);
    assert_eq!(parsed.failures, report.failures);
    assert_eq!(parsed.summary, report.summary);
}
