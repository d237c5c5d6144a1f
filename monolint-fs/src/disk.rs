use crate::ports::FileSystem;
use crate::workspace::rooted_pattern;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use tracing::debug;

/// File-system backed `FileSystem`.
#[derive(Debug, Clone, Default)]
pub struct FsFileSystem;

impl FsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for FsFileSystem {
    fn exists(&self, path: &Utf8Path) -> bool {
        path.exists()
    }

    fn read_file(&self, path: &Utf8Path) -> anyhow::Result<String> {
        fs::read_to_string(path).with_context(|| format!("read {}", path))
    }

    fn write_file(&self, path: &Utf8Path, contents: &str) -> anyhow::Result<()> {
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn mkdir(&self, path: &Utf8Path, recursive: bool) -> anyhow::Result<()> {
        if recursive {
            fs::create_dir_all(path).with_context(|| format!("create {}", path))
        } else {
            fs::create_dir(path).with_context(|| format!("create {}", path))
        }
    }

    fn unlink(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::remove_file(path).with_context(|| format!("remove {}", path))
    }

    fn glob_dirs(&self, root: &Utf8Path, pattern: &str) -> anyhow::Result<Vec<Utf8PathBuf>> {
        let full = rooted_pattern(root, pattern);
        debug!(pattern = %full, "expanding directory glob");

        let mut out = Vec::new();
        for entry in glob(&full).with_context(|| format!("glob {}", full))? {
            let path = entry.map_err(|e| anyhow::anyhow!("glob error: {e}"))?;
            if !path.is_dir() {
                continue;
            }
            match Utf8PathBuf::from_path_buf(path) {
                Ok(p) => out.push(p),
                Err(p) => debug!(path = %p.display(), "skipping non-utf8 path"),
            }
        }

        out.sort();
        Ok(out)
    }
}
