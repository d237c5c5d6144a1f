//! Long-form guidance for `monolint explain`.
//!
//! Rule metadata and option schemas come from the registry; this module
//! adds the parts only a human writes: what the rule checks in detail,
//! how the fix behaves and a config snippet to start from.

/// Extra documentation for one built-in rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleGuide {
    pub name: &'static str,
    pub details: &'static str,
    pub fix_behavior: &'static str,
    pub example: &'static str,
}

pub const RULE_GUIDES: &[RuleGuide] = &[
    RuleGuide {
        name: "consistent-dependencies",
        details: "Compares the `dependencies` and `devDependencies` blocks of each package \
                  with the same blocks in the workspace root package.json. Only names \
                  declared on both sides are compared; the root never adds dependencies \
                  to a package. A block missing on either side is skipped.",
        fix_behavior: "Rewrites the offending block with the root's versions, keeping the \
                       package's key order. Other package.json fields are untouched.",
        example: r#"[[rules]]
rule = "consistent-dependencies""#,
    },
    RuleGuide {
        name: "banned-dependencies",
        details: "Flags `dependencies`, `devDependencies` and `peerDependencies` entries \
                  whose name matches any configured glob. `*` does not cross `/`, so \
                  `@scope/*` bans every package in a scope.",
        fix_behavior: "Removes the banned entries from each block, keeping the rest in order.",
        example: r#"[[rules]]
rule = "banned-dependencies"
[rules.options]
banned_dependencies = ["left-pad", "@legacy/*"]"#,
    },
    RuleGuide {
        name: "file-contents",
        details: "Compares a file inside each package with a template string or with a \
                  template file read from the workspace root. A missing file is \
                  reported as an error with the full expected content.",
        fix_behavior: "Writes the expected content, creating parent directories as needed.",
        example: r#"[[rules]]
rule = "file-contents"
exclude_packages = ["@scope/docs"]
[rules.options]
file = ".npmignore"
template_file = "templates/npmignore""#,
    },
    RuleGuide {
        name: "standard-tsconfig",
        details: "Renders the package's tsconfig.json from a shared template plus a \
                  `references` entry for every workspace package it depends on \
                  through dependencies or devDependencies, then compares \
                  the rendered text with the file on disk. Packages named in \
                  `excluded_references` are never referenced.",
        fix_behavior: "Writes the rendered tsconfig.json.",
        example: r#"[[rules]]
rule = "standard-tsconfig"
[rules.options]
template_file = "templates/tsconfig.json"
excluded_references = ["@scope/tooling-*"]"#,
    },
];

/// Look up a rule guide by name. Matching ignores case and treats `_` as `-`.
pub fn lookup_guide(query: &str) -> Option<&'static RuleGuide> {
    let normalized = normalize_rule_name(query);
    RULE_GUIDES.iter().find(|g| g.name == normalized)
}

pub fn normalize_rule_name(query: &str) -> String {
    query.trim().to_lowercase().replace('_', "-")
}
