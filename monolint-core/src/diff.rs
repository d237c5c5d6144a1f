//! Long-message diffs between expected and actual state.

use diffy::create_patch;

/// Unified diff from `actual` to `expected`.
///
/// `-` lines are what is on disk, `+` lines are what the rule expects.
/// `None` stands for a missing file or expected deletion.
pub fn text_diff(expected: Option<&str>, actual: Option<&str>) -> String {
    let mut out = String::new();
    match (expected, actual) {
        (Some(_), None) => out.push_str("file does not exist\n"),
        (None, Some(_)) => out.push_str("file should not exist\n"),
        _ => {}
    }
    let patch = create_patch(actual.unwrap_or(""), expected.unwrap_or(""));
    out.push_str(&patch.to_string());
    out
}

/// Unified diff between two JSON values rendered as canonical text.
pub fn json_diff(expected: &serde_json::Value, actual: &serde_json::Value) -> String {
    let expected = monolint_fs::to_json_string(expected).unwrap_or_default();
    let actual = monolint_fs::to_json_string(actual).unwrap_or_default();
    text_diff(Some(&expected), Some(&actual))
}
