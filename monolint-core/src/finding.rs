use camino::{Utf8Path, Utf8PathBuf};
use monolint_fs::FileSystem;
use monolint_types::Severity;
use tracing::debug;

/// A lint finding registered by a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub file: Utf8PathBuf,
    pub message: String,
    pub long_message: Option<String>,
    pub fixer: Option<Fixer>,
}

impl Finding {
    pub fn new(file: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
            long_message: None,
            fixer: None,
        }
    }

    pub fn with_long_message(mut self, long_message: impl Into<String>) -> Self {
        self.long_message = Some(long_message.into());
        self
    }

    pub fn with_fixer(mut self, fixer: Fixer) -> Self {
        self.fixer = Some(fixer);
        self
    }
}

/// A finding together with the severity it was registered under.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedFinding {
    pub severity: Severity,
    pub finding: Finding,
}

/// One filesystem mutation performed by a fixer.
#[derive(Debug, Clone, PartialEq)]
pub enum FixOp {
    WriteJson {
        path: Utf8PathBuf,
        value: serde_json::Value,
    },
    /// Set one top-level key of a JSON object file, read at apply time.
    /// An existing key keeps its position.
    SetJsonKey {
        path: Utf8PathBuf,
        key: String,
        value: serde_json::Value,
    },
    WriteFile {
        path: Utf8PathBuf,
        contents: String,
    },
    CreateDirAll {
        path: Utf8PathBuf,
    },
    RemoveFile {
        path: Utf8PathBuf,
    },
}

impl FixOp {
    pub fn path(&self) -> &Utf8Path {
        match self {
            FixOp::WriteJson { path, .. }
            | FixOp::SetJsonKey { path, .. }
            | FixOp::WriteFile { path, .. }
            | FixOp::CreateDirAll { path }
            | FixOp::RemoveFile { path } => path,
        }
    }

    fn apply(&self, fs: &dyn FileSystem) -> anyhow::Result<()> {
        match self {
            FixOp::WriteJson { path, value } => fs.write_json(path, value),
            FixOp::SetJsonKey { path, key, value } => {
                let mut doc = fs.read_json(path)?;
                let obj = doc
                    .as_object_mut()
                    .ok_or_else(|| anyhow::anyhow!("{} is not a JSON object", path))?;
                obj.insert(key.clone(), value.clone());
                fs.write_json(path, &doc)
            }
            FixOp::WriteFile { path, contents } => fs.write_file(path, contents),
            FixOp::CreateDirAll { path } => {
                if fs.exists(path) {
                    return Ok(());
                }
                fs.mkdir(path, true)
            }
            FixOp::RemoveFile { path } => {
                if !fs.exists(path) {
                    return Ok(());
                }
                fs.unlink(path)
            }
        }
    }
}

/// The remedy attached to a finding.
///
/// Rules describe the mutation; the engine decides whether to run it.
/// Every op converges on a fixed end state, so applying a fixer twice
/// leaves the same files as applying it once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fixer {
    ops: Vec<FixOp>,
}

impl Fixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, op: FixOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn write_json(path: impl Into<Utf8PathBuf>, value: serde_json::Value) -> Self {
        Self::new().then(FixOp::WriteJson {
            path: path.into(),
            value,
        })
    }

    pub fn set_json_key(
        path: impl Into<Utf8PathBuf>,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self::new().then(FixOp::SetJsonKey {
            path: path.into(),
            key: key.into(),
            value,
        })
    }

    pub fn write_file(path: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self::new().then(FixOp::WriteFile {
            path: path.into(),
            contents: contents.into(),
        })
    }

    pub fn remove_file(path: impl Into<Utf8PathBuf>) -> Self {
        Self::new().then(FixOp::RemoveFile { path: path.into() })
    }

    pub fn ops(&self) -> &[FixOp] {
        &self.ops
    }

    /// Run every op in order, stopping at the first failure.
    pub fn apply(&self, fs: &dyn FileSystem) -> anyhow::Result<()> {
        for op in &self.ops {
            debug!(path = %op.path(), op = op_label(op), "applying fix op");
            op.apply(fs)?;
        }
        Ok(())
    }
}

fn op_label(op: &FixOp) -> &'static str {
    match op {
        FixOp::WriteJson { .. } => "write_json",
        FixOp::SetJsonKey { .. } => "set_json_key",
        FixOp::WriteFile { .. } => "write_file",
        FixOp::CreateDirAll { .. } => "create_dir_all",
        FixOp::RemoveFile { .. } => "remove_file",
    }
}
