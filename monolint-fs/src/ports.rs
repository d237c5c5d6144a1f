use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};

/// Storage access used by contexts, rules and fixers.
///
/// Paths are absolute. Writes are atomic only at whatever single-file
/// granularity the implementation provides. Implementations are shared
/// by every context of a run, across threads if the caller chooses.
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Utf8Path) -> bool;

    fn read_file(&self, path: &Utf8Path) -> anyhow::Result<String>;

    fn write_file(&self, path: &Utf8Path, contents: &str) -> anyhow::Result<()>;

    fn mkdir(&self, path: &Utf8Path, recursive: bool) -> anyhow::Result<()>;

    fn unlink(&self, path: &Utf8Path) -> anyhow::Result<()>;

    /// Directories under `root` matching `pattern`, sorted. `root` is taken
    /// literally; only `pattern` is a glob.
    fn glob_dirs(&self, root: &Utf8Path, pattern: &str) -> anyhow::Result<Vec<Utf8PathBuf>>;

    fn read_json(&self, path: &Utf8Path) -> anyhow::Result<serde_json::Value> {
        let contents = self.read_file(path)?;
        serde_json::from_str(&contents).with_context(|| format!("parse json {}", path))
    }

    fn write_json(&self, path: &Utf8Path, value: &serde_json::Value) -> anyhow::Result<()> {
        let contents = to_json_string(value)?;
        self.write_file(path, &contents)
    }
}

/// Canonical JSON text: two-space indentation and a single trailing newline.
pub fn to_json_string(value: &serde_json::Value) -> anyhow::Result<String> {
    let mut s = serde_json::to_string_pretty(value).context("serialize json")?;
    s.push('\n');
    Ok(s)
}
