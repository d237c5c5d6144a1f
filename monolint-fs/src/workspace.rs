//! Workspace package discovery.
//!
//! Member directories come from the root manifest's `workspaces` field,
//! either `["packages/*", ...]` or `{ "packages": ["packages/*", ...] }`.
//! Patterns prefixed with `!` remove directories matched by earlier ones.

use crate::ports::FileSystem;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// The manifest file every package directory contains.
pub const MANIFEST_FILE: &str = "package.json";

/// `pattern` anchored at `root`, with glob metacharacters in `root`
/// escaped so only the pattern part matches.
pub fn rooted_pattern(root: &Utf8Path, pattern: &str) -> String {
    let root = Pattern::escape(root.as_str());
    let pattern = pattern.trim_end_matches('/');
    if root.ends_with('/') {
        format!("{root}{pattern}")
    } else {
        format!("{root}/{pattern}")
    }
}

/// Workspace glob declarations of a root manifest, in declaration order.
pub fn workspace_globs(manifest: &serde_json::Value) -> Vec<String> {
    let decl = match manifest.get("workspaces") {
        Some(serde_json::Value::Object(obj)) => obj.get("packages"),
        other => other,
    };

    decl.and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Ordered member package directories of the workspace rooted at `root`.
///
/// Each pattern's matches are sorted; patterns keep declaration order;
/// duplicates keep their first position. Directories without a manifest
/// are skipped.
pub fn workspace_package_dirs(
    fs: &dyn FileSystem,
    root: &Utf8Path,
) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let manifest_path = root.join(MANIFEST_FILE);
    let manifest = fs
        .read_json(&manifest_path)
        .with_context(|| format!("read workspace manifest {}", manifest_path))?;

    let globs = workspace_globs(&manifest);
    if globs.is_empty() {
        debug!(root = %root, "workspace declares no packages");
    }

    let mut out: Vec<Utf8PathBuf> = Vec::new();
    for pattern in &globs {
        if let Some(negated) = pattern.strip_prefix('!') {
            let full = rooted_pattern(root, negated);
            let pat = Pattern::new(&full)
                .with_context(|| format!("invalid workspace glob {}", pattern))?;
            out.retain(|dir| !pat.matches_with(dir.as_str(), separator_literal()));
            continue;
        }

        for dir in fs.glob_dirs(root, pattern)? {
            if out.contains(&dir) {
                continue;
            }
            if !fs.exists(&dir.join(MANIFEST_FILE)) {
                debug!(dir = %dir, "skipping directory without {}", MANIFEST_FILE);
                continue;
            }
            out.push(dir);
        }
    }

    Ok(out)
}

/// Mapping from declared package name to directory for the given members.
///
/// Members whose manifest cannot be read or has no name are left out; the
/// first directory wins for a duplicated name.
pub fn package_name_to_dir(
    fs: &dyn FileSystem,
    dirs: &[Utf8PathBuf],
) -> BTreeMap<String, Utf8PathBuf> {
    let mut out = BTreeMap::new();
    for dir in dirs {
        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = match fs.read_json(&manifest_path) {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!(dir = %dir, error = %format!("{err:#}"), "skipping unreadable package manifest");
                continue;
            }
        };
        let Some(name) = manifest.get("name").and_then(|v| v.as_str()) else {
            debug!(dir = %dir, "package has no name");
            continue;
        };
        if let Some(existing) = out.get(name) {
            warn!(name, first = %existing, second = %dir, "duplicate package name, keeping first");
            continue;
        }
        out.insert(name.to_string(), dir.clone());
    }
    out
}

fn separator_literal() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}
