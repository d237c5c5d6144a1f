//! Workspace discovery against both filesystem implementations.

use camino::Utf8PathBuf;
use monolint_fs::{
    FileSystem, FsFileSystem, InMemoryFileSystem, package_name_to_dir, rooted_pattern,
    workspace_package_dirs,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn memory_workspace() -> InMemoryFileSystem {
    InMemoryFileSystem::new()
        .with_json(
            "/repo/package.json",
            serde_json::json!({
                "name": "root",
                "private": true,
                "workspaces": ["packages/*", "tools/cli", "!packages/ignored"]
            }),
        )
        .with_json("/repo/packages/b/package.json", serde_json::json!({ "name": "@s/b" }))
        .with_json("/repo/packages/a/package.json", serde_json::json!({ "name": "@s/a" }))
        .with_json("/repo/packages/ignored/package.json", serde_json::json!({ "name": "ignored" }))
        .with_file("/repo/packages/no-manifest/README.md", "x")
        .with_json("/repo/tools/cli/package.json", serde_json::json!({ "name": "cli" }))
}

#[test]
fn member_dirs_follow_declaration_order_and_skip_non_packages() {
    let fs = memory_workspace();
    let dirs = workspace_package_dirs(&fs, "/repo".as_ref()).expect("discover");
    assert_eq!(
        dirs,
        vec![
            Utf8PathBuf::from("/repo/packages/a"),
            Utf8PathBuf::from("/repo/packages/b"),
            Utf8PathBuf::from("/repo/tools/cli"),
        ]
    );
}

#[test]
fn name_to_dir_maps_every_member() {
    let fs = memory_workspace();
    let dirs = workspace_package_dirs(&fs, "/repo".as_ref()).expect("discover");
    let map = package_name_to_dir(&fs, &dirs);
    assert_eq!(map.len(), 3);
    assert_eq!(map["@s/a"], Utf8PathBuf::from("/repo/packages/a"));
    assert_eq!(map["cli"], Utf8PathBuf::from("/repo/tools/cli"));
    assert!(!map.contains_key("ignored"));
}

#[test]
fn name_to_dir_skips_unreadable_manifests() {
    let fs = memory_workspace().with_file("/repo/packages/a/package.json", "{ not json");
    let dirs = workspace_package_dirs(&fs, "/repo".as_ref()).expect("discover");
    assert_eq!(dirs.len(), 3);

    let map = package_name_to_dir(&fs, &dirs);
    let names: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["@s/b", "cli"]);
}

#[test]
fn root_metacharacters_are_literal() {
    assert_eq!(rooted_pattern("/ws[1]".as_ref(), "packages/*/"), "/ws[[]1[]]/packages/*");
    assert_eq!(rooted_pattern("/".as_ref(), "packages/*"), "/packages/*");

    let fs = InMemoryFileSystem::new()
        .with_json(
            "/ws[1]/package.json",
            serde_json::json!({ "workspaces": ["packages/*", "!packages/skip"] }),
        )
        .with_json("/ws[1]/packages/a/package.json", serde_json::json!({ "name": "a" }))
        .with_json("/ws[1]/packages/skip/package.json", serde_json::json!({ "name": "skip" }))
        .with_json("/ws1/packages/other/package.json", serde_json::json!({ "name": "other" }));

    let dirs = workspace_package_dirs(&fs, "/ws[1]".as_ref()).expect("discover");
    assert_eq!(dirs, vec![Utf8PathBuf::from("/ws[1]/packages/a")]);
}

#[test]
fn disk_root_with_brackets_finds_members() {
    let temp = tempfile::Builder::new()
        .prefix("ws[1]")
        .tempdir()
        .expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
    let fs = FsFileSystem::new();

    fs.write_json(
        &root.join("package.json"),
        &serde_json::json!({ "name": "root", "workspaces": ["packages/*"] }),
    )
    .expect("write root");
    let dir = root.join("packages/a");
    fs.mkdir(&dir, true).expect("mkdir");
    fs.write_json(&dir.join("package.json"), &serde_json::json!({ "name": "a" }))
        .expect("write member");

    let dirs = workspace_package_dirs(&fs, &root).expect("discover");
    assert_eq!(dirs, vec![dir]);
}

#[test]
fn missing_root_manifest_is_an_error() {
    let fs = InMemoryFileSystem::new();
    let err = workspace_package_dirs(&fs, "/repo".as_ref()).expect_err("no manifest");
    assert!(err.to_string().contains("workspace manifest"));
}

#[test]
fn disk_workspace_discovery_matches_memory() {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
    let fs = FsFileSystem::new();

    fs.write_json(
        &root.join("package.json"),
        &serde_json::json!({ "name": "root", "workspaces": { "packages": ["packages/*"] } }),
    )
    .expect("write root");
    for name in ["b", "a"] {
        let dir = root.join("packages").join(name);
        fs.mkdir(&dir, true).expect("mkdir");
        fs.write_json(&dir.join("package.json"), &serde_json::json!({ "name": name }))
            .expect("write member");
    }

    let dirs = workspace_package_dirs(&fs, &root).expect("discover");
    assert_eq!(dirs, vec![root.join("packages/a"), root.join("packages/b")]);
}
