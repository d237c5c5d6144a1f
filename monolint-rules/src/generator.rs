//! Programmatic content generators and workspace-relative templates.

use anyhow::Context as _;
use camino::{Utf8Path, Utf8PathBuf};
use monolint_core::{ConfigError, Context, RuleError};
use std::fmt;
use std::sync::Arc;

type GenerateFn = dyn Fn(&Context<'_>) -> anyhow::Result<Option<String>> + Send + Sync;

/// Expected file content computed from a package's context.
///
/// `Ok(None)` means the file should not exist (for `file-contents`) or the
/// package opts out (for `standard-tsconfig`).
#[derive(Clone)]
pub struct Generator(Arc<GenerateFn>);

impl Generator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context<'_>) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn generate(&self, ctx: &Context<'_>) -> anyhow::Result<Option<String>> {
        (self.0)(ctx)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Generator(..)")
    }
}

/// Resolve `relative` against the workspace root above `ctx`.
pub(crate) fn workspace_path(
    ctx: &Context<'_>,
    relative: &Utf8Path,
) -> Result<Utf8PathBuf, ConfigError> {
    let ws = ctx.workspace_context()?;
    Ok(ws.package_dir().join(relative))
}

/// Read a template file named relative to the workspace root.
pub(crate) fn read_template_file(
    ctx: &Context<'_>,
    relative: &Utf8Path,
) -> Result<String, RuleError> {
    let path = workspace_path(ctx, relative)?;
    let contents = ctx
        .file_system()
        .read_file(&path)
        .with_context(|| format!("read template {}", path))?;
    Ok(contents)
}
