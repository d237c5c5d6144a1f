//! Property-based tests for the dependency rules and tsconfig rendering.
//!
//! These tests verify that:
//! - Root versions win exactly for the names both sides declare
//! - Banned filtering keeps precisely the names no pattern matches
//! - Rendering a tsconfig is deterministic and canonical

use monolint_core::{Context, PatternSet, ResolvedConfig, RunSettings};
use monolint_fs::InMemoryFileSystem;
use monolint_rules::{expected_dependencies, render_tsconfig, retained_dependencies};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

fn arb_block() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::vec(("[a-e]{1,2}", "[0-9]\\.[0-9]"), 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(name, version)| (name, Value::String(version)))
            .collect()
    })
}

fn arb_member_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,6}", 1..6).prop_map(|names| names.into_iter().collect())
}

proptest! {
    #[test]
    fn merge_law(package in arb_block(), root in arb_block()) {
        let expected = expected_dependencies(&package, &root);

        let keys: Vec<_> = expected.keys().collect();
        let package_keys: Vec<_> = package.keys().collect();
        prop_assert_eq!(keys, package_keys);

        for (name, version) in &expected {
            let want = root.get(name).or_else(|| package.get(name));
            prop_assert_eq!(Some(version), want);
        }

        // Applying the merge to its own output changes nothing.
        prop_assert_eq!(expected_dependencies(&expected, &root), expected.clone());
    }

    #[test]
    fn banned_filter_keeps_unmatched_names(
        block in arb_block(),
        banned in prop::collection::vec("[a-e]\\*?", 0..3),
    ) {
        let patterns = PatternSet::new(&banned).expect("patterns");
        let retained = retained_dependencies(&block, &patterns);

        for name in block.keys() {
            let hit = patterns.matches_any(name);
            prop_assert_eq!(retained.contains_key(name), !hit, "name {}", name);
        }
        prop_assert_eq!(retained_dependencies(&retained, &patterns), retained.clone());
    }

    #[test]
    fn tsconfig_rendering_is_deterministic(
        names in arb_member_names(),
        depend_on in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
    ) {
        let mut fs = InMemoryFileSystem::new().with_json(
            "/repo/package.json",
            json!({ "name": "root", "workspaces": ["packages/*"] }),
        );
        for name in &names {
            fs = fs.with_json(
                format!("/repo/packages/{name}/package.json"),
                json!({ "name": name }),
            );
        }
        let deps: Map<String, Value> = depend_on
            .iter()
            .map(|i| (i.get(&names).clone(), json!("1.0.0")))
            .collect();
        fs = fs.with_json(
            "/repo/app/package.json",
            json!({ "name": "app", "dependencies": deps }),
        );

        let config = ResolvedConfig::new(RunSettings::default());
        let root = Context::workspace("/repo", &config, &fs).expect("root");
        let app = root.create_child_context("/repo/app").expect("child");
        let template = json!({ "compilerOptions": { "strict": true } });
        let template = template.as_object().expect("object");

        let first = render_tsconfig(&app, template, &PatternSet::default()).expect("render");
        let second = render_tsconfig(&app, template, &PatternSet::default()).expect("render");
        prop_assert_eq!(&first, &second);
        prop_assert!(first.ends_with("}\n"), "output must end with closing brace and newline");
        prop_assert!(!first.ends_with("\n\n"));

        let parsed: Value = serde_json::from_str(&first).expect("json");
        prop_assert_eq!(monolint_fs::to_json_string(&parsed).expect("text"), first.clone());

        let paths: Vec<String> = parsed["references"]
            .as_array()
            .expect("references")
            .iter()
            .map(|r| r["path"].as_str().unwrap_or_default().to_string())
            .collect();
        let want: Vec<String> = deps.keys().map(|n| format!("../packages/{n}")).collect();
        prop_assert_eq!(paths, want);
    }
}
