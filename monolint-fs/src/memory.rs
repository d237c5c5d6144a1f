use crate::ports::FileSystem;
use crate::workspace::rooted_pattern;
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

/// In-memory `FileSystem` for embedding and testing.
///
/// Directories exist when created explicitly or when they are an ancestor
/// of a stored file. `/` always exists.
#[derive(Debug, Default)]
pub struct InMemoryFileSystem {
    state: Mutex<State>,
}

#[derive(Debug, Default, Clone)]
struct State {
    files: BTreeMap<Utf8PathBuf, String>,
    dirs: BTreeSet<Utf8PathBuf>,
}

impl State {
    fn dir_exists(&self, path: &Utf8Path) -> bool {
        if path.parent().is_none() || self.dirs.contains(path) {
            return true;
        }
        self.files.keys().any(|f| f != path && f.starts_with(path))
            || self.dirs.iter().any(|d| d.starts_with(path))
    }

    fn all_dirs(&self) -> BTreeSet<Utf8PathBuf> {
        let mut out = BTreeSet::new();
        for d in &self.dirs {
            out.extend(d.ancestors().map(Utf8Path::to_path_buf));
        }
        for f in self.files.keys() {
            if let Some(parent) = f.parent() {
                out.extend(parent.ancestors().map(Utf8Path::to_path_buf));
            }
        }
        out
    }
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        self.lock().files.insert(path.into(), contents.into());
        self
    }

    pub fn with_json(self, path: impl Into<Utf8PathBuf>, value: serde_json::Value) -> Self {
        let contents = crate::to_json_string(&value).unwrap_or_default();
        self.with_file(path, contents)
    }

    /// Snapshot of a file's contents, if present.
    pub fn contents(&self, path: impl AsRef<Utf8Path>) -> Option<String> {
        self.lock().files.get(path.as_ref()).cloned()
    }

    /// Snapshot of all stored files.
    pub fn files(&self) -> BTreeMap<Utf8PathBuf, String> {
        self.lock().files.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave `State` half-updated.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FileSystem for InMemoryFileSystem {
    fn exists(&self, path: &Utf8Path) -> bool {
        let state = self.lock();
        state.files.contains_key(path) || state.dir_exists(path)
    }

    fn read_file(&self, path: &Utf8Path) -> anyhow::Result<String> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("read {}: no such file", path))
    }

    fn write_file(&self, path: &Utf8Path, contents: &str) -> anyhow::Result<()> {
        let mut state = self.lock();
        if let Some(parent) = path.parent()
            && !state.dir_exists(parent)
        {
            anyhow::bail!("write {}: parent directory does not exist", path);
        }
        if state.dirs.contains(path) {
            anyhow::bail!("write {}: is a directory", path);
        }
        state.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn mkdir(&self, path: &Utf8Path, recursive: bool) -> anyhow::Result<()> {
        let mut state = self.lock();
        if state.files.contains_key(path) {
            anyhow::bail!("create {}: file exists", path);
        }
        if !recursive {
            if let Some(parent) = path.parent()
                && !state.dir_exists(parent)
            {
                anyhow::bail!("create {}: parent directory does not exist", path);
            }
            if state.dir_exists(path) {
                anyhow::bail!("create {}: directory exists", path);
            }
        }
        state.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn unlink(&self, path: &Utf8Path) -> anyhow::Result<()> {
        match self.lock().files.remove(path) {
            Some(_) => Ok(()),
            None => anyhow::bail!("remove {}: no such file", path),
        }
    }

    fn glob_dirs(&self, root: &Utf8Path, pattern: &str) -> anyhow::Result<Vec<Utf8PathBuf>> {
        let full = rooted_pattern(root, pattern);
        let pat = Pattern::new(&full)
            .map_err(|e| anyhow::anyhow!("invalid glob {}: {}", full, e))?;
        let opts = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        Ok(self
            .lock()
            .all_dirs()
            .into_iter()
            .filter(|d| pat.matches_with(d.as_str(), opts))
            .collect())
    }
}
