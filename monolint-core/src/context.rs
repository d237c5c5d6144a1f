//! Per-package state handed to rules.
//!
//! A [`Context`] is the only channel through which a rule observes project
//! state and reports findings. The workspace root's context additionally
//! carries a workspace capability (member enumeration and child creation);
//! member contexts hold a borrowed link back to it.

use crate::config::ResolvedConfig;
use crate::error::{ConfigError, RuleError};
use crate::finding::{Finding, ReportedFinding};
use crate::manifest::PackageJson;
use camino::{Utf8Path, Utf8PathBuf};
use monolint_fs::{FileSystem, MANIFEST_FILE};
use monolint_types::Severity;
use std::sync::OnceLock;
use std::collections::BTreeMap;
use tracing::debug;

/// Workspace-only operations, cached per run. The caches are filled at most
/// once, so member contexts on other threads may share the root.
#[derive(Debug, Default)]
struct WorkspaceCapability {
    package_dirs: OnceLock<Vec<Utf8PathBuf>>,
    name_to_dir: OnceLock<BTreeMap<String, Utf8PathBuf>>,
}

pub struct Context<'a> {
    package_dir: Utf8PathBuf,
    config: &'a ResolvedConfig,
    fs: &'a dyn FileSystem,
    parent: Option<&'a Context<'a>>,
    workspace: Option<WorkspaceCapability>,
    package_json: OnceLock<PackageJson>,
    findings: Vec<ReportedFinding>,
}

impl<'a> Context<'a> {
    /// Context for a workspace root.
    pub fn workspace(
        package_dir: impl Into<Utf8PathBuf>,
        config: &'a ResolvedConfig,
        fs: &'a dyn FileSystem,
    ) -> Result<Self, ConfigError> {
        Self::build(
            package_dir.into(),
            config,
            fs,
            None,
            Some(WorkspaceCapability::default()),
        )
    }

    /// Context for a standalone package with no workspace above it.
    pub fn package(
        package_dir: impl Into<Utf8PathBuf>,
        config: &'a ResolvedConfig,
        fs: &'a dyn FileSystem,
    ) -> Result<Self, ConfigError> {
        Self::build(package_dir.into(), config, fs, None, None)
    }

    fn build(
        package_dir: Utf8PathBuf,
        config: &'a ResolvedConfig,
        fs: &'a dyn FileSystem,
        parent: Option<&'a Context<'a>>,
        workspace: Option<WorkspaceCapability>,
    ) -> Result<Self, ConfigError> {
        if !fs.exists(&package_dir.join(MANIFEST_FILE)) {
            return Err(ConfigError::MissingManifest { package_dir });
        }
        Ok(Self {
            package_dir,
            config,
            fs,
            parent,
            workspace,
            package_json: OnceLock::new(),
            findings: Vec::new(),
        })
    }

    pub fn package_dir(&self) -> &Utf8Path {
        &self.package_dir
    }

    pub fn resolved_config(&self) -> &'a ResolvedConfig {
        self.config
    }

    pub fn file_system(&self) -> &'a dyn FileSystem {
        self.fs
    }

    pub fn parent(&self) -> Option<&'a Context<'a>> {
        self.parent
    }

    pub fn is_workspace_root(&self) -> bool {
        self.workspace.is_some()
    }

    pub fn package_json_path(&self) -> Utf8PathBuf {
        self.package_dir.join(MANIFEST_FILE)
    }

    /// The parsed manifest, read on first access and cached.
    pub fn package_json(&self) -> Result<&PackageJson, ConfigError> {
        if let Some(pj) = self.package_json.get() {
            return Ok(pj);
        }
        let loaded = self.load_package_json()?;
        Ok(self.package_json.get_or_init(|| loaded))
    }

    fn load_package_json(&self) -> Result<PackageJson, ConfigError> {
        let path = self.package_json_path();
        if !self.fs.exists(&path) {
            return Err(ConfigError::MissingManifest {
                package_dir: self.package_dir.clone(),
            });
        }
        let value = self
            .fs
            .read_json(&path)
            .map_err(|e| ConfigError::InvalidManifest {
                path: path.clone(),
                message: format!("{e:#}"),
            })?;
        PackageJson::from_value(value).map_err(|message| ConfigError::InvalidManifest { path, message })
    }

    /// Drop the cached manifest so the next access rereads it.
    pub fn invalidate_package_json(&mut self) {
        self.package_json.take();
    }

    /// The nearest context (this one included) that is a workspace root.
    pub fn workspace_context(&self) -> Result<&Context<'a>, ConfigError> {
        let mut current: &Context<'a> = self;
        loop {
            if current.workspace.is_some() {
                return Ok(current);
            }
            match current.parent {
                Some(parent) => current = parent,
                None => {
                    return Err(ConfigError::NoWorkspace {
                        package_dir: self.package_dir.clone(),
                    });
                }
            }
        }
    }

    fn capability(&self) -> Result<&WorkspaceCapability, ConfigError> {
        self.workspace
            .as_ref()
            .ok_or_else(|| ConfigError::NotAWorkspace {
                package_dir: self.package_dir.clone(),
            })
    }

    /// Member package directories, in enumeration order.
    pub fn workspace_package_dirs(&self) -> Result<&[Utf8PathBuf], RuleError> {
        let cap = self.capability()?;
        if let Some(dirs) = cap.package_dirs.get() {
            return Ok(dirs);
        }
        let dirs = monolint_fs::workspace_package_dirs(self.fs, &self.package_dir)?;
        debug!(root = %self.package_dir, count = dirs.len(), "enumerated workspace packages");
        Ok(cap.package_dirs.get_or_init(|| dirs))
    }

    /// Package name to directory, for every member.
    pub fn package_name_to_dir(&self) -> Result<&BTreeMap<String, Utf8PathBuf>, RuleError> {
        let cap = self.capability()?;
        if let Some(map) = cap.name_to_dir.get() {
            return Ok(map);
        }
        let map = monolint_fs::package_name_to_dir(self.fs, self.workspace_package_dirs()?);
        Ok(cap.name_to_dir.get_or_init(|| map))
    }

    /// A member context whose parent is this workspace root.
    pub fn create_child_context(
        &self,
        package_dir: impl Into<Utf8PathBuf>,
    ) -> Result<Context<'_>, ConfigError> {
        self.capability()?;
        Context::build(package_dir.into(), self.config, self.fs, Some(self), None)
    }

    pub fn add_error(&mut self, finding: Finding) {
        self.push(Severity::Error, finding);
    }

    pub fn add_warning(&mut self, finding: Finding) {
        self.push(Severity::Warning, finding);
    }

    fn push(&mut self, severity: Severity, finding: Finding) {
        debug!(
            package = %self.package_dir,
            file = %finding.file,
            severity = severity.label(),
            message = %finding.message,
            "finding"
        );
        self.findings.push(ReportedFinding { severity, finding });
    }

    pub fn findings(&self) -> &[ReportedFinding] {
        &self.findings
    }

    /// Hand accumulated findings to the caller.
    pub fn take_findings(&mut self) -> Vec<ReportedFinding> {
        std::mem::take(&mut self.findings)
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("package_dir", &self.package_dir)
            .field("workspace_root", &self.is_workspace_root())
            .field("parent", &self.parent.map(|p| p.package_dir.as_str()))
            .field("findings", &self.findings.len())
            .finish()
    }
}
