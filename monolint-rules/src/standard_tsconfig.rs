//! `standard-tsconfig`: every package's `tsconfig.json` is a shared
//! template plus project references to the workspace packages it depends
//! on.
//!
//! References are computed from the merged `dependencies` and
//! `devDependencies` names in first-occurrence order, keeping only names
//! that resolve to a workspace member and match no excluded pattern. The
//! reference path is relative to the package directory and always uses
//! `/`.

use crate::generator::{Generator, workspace_path};
use anyhow::{Context as _, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use monolint_core::diff::text_diff;
use monolint_core::rule::parse_with_serde;
use monolint_core::{
    ConfigError, Context, DependencyKind, Finding, Fixer, PatternSet, RuleError, RuleMeta,
    RuleModule,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

pub const TSCONFIG_FILE: &str = "tsconfig.json";

pub struct StandardTsconfig;

impl StandardTsconfig {
    pub const NAME: &'static str = "standard-tsconfig";
}

#[derive(Debug, Clone)]
pub enum TsconfigSource {
    /// Only reachable from code. `Ok(None)` excludes the package with a
    /// warning.
    Generator(Generator),
    Template(Map<String, Value>),
    /// JSON file relative to the workspace root.
    TemplateFile(Utf8PathBuf),
}

#[derive(Debug, Clone)]
pub struct StandardTsconfigOptions {
    pub source: TsconfigSource,
    pub excluded_references: PatternSet,
}

impl StandardTsconfigOptions {
    pub fn new(source: TsconfigSource) -> Self {
        Self {
            source,
            excluded_references: PatternSet::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptions {
    template: Option<Value>,
    template_file: Option<Utf8PathBuf>,
    #[serde(default)]
    excluded_references: PatternSet,
}

fn template_object(origin: &str, value: Value) -> Result<Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::InvalidTemplate {
            origin: origin.to_string(),
            message: "tsconfig template must be a JSON object".to_string(),
        }),
    }
}

fn parse_template(value: Value) -> Result<Map<String, Value>, ConfigError> {
    match value {
        Value::String(text) => {
            let parsed = serde_json::from_str(&text).map_err(|e| ConfigError::InvalidTemplate {
                origin: "template".to_string(),
                message: e.to_string(),
            })?;
            template_object("template", parsed)
        }
        other => template_object("template", other),
    }
}

/// `to`, relative to `from`, with forward slashes.
fn reference_path(from: &Utf8Path, to: &Utf8Path) -> anyhow::Result<String> {
    let rel = pathdiff::diff_paths(to.as_std_path(), from.as_std_path())
        .ok_or_else(|| anyhow!("cannot express {} relative to {}", to, from))?;
    let rel = rel
        .to_str()
        .ok_or_else(|| anyhow!("non UTF-8 reference path for {}", to))?;
    Ok(rel.replace('\\', "/"))
}

/// Render `template` for the package behind `ctx`.
pub fn render_tsconfig(
    ctx: &Context<'_>,
    template: &Map<String, Value>,
    excluded: &PatternSet,
) -> Result<String, RuleError> {
    let ws = ctx.workspace_context()?;
    let name_to_dir = ws.package_name_to_dir()?;
    let names = ctx
        .package_json()?
        .dependency_names(&[DependencyKind::Dependencies, DependencyKind::DevDependencies]);

    let mut references = Vec::new();
    for name in names {
        let Some(dir) = name_to_dir.get(&name) else {
            continue;
        };
        if excluded.matches_any(&name) {
            debug!(package = %ctx.package_dir(), reference = %name, "reference excluded");
            continue;
        }
        references.push(json!({ "path": reference_path(ctx.package_dir(), dir)? }));
    }

    let mut tsconfig = template.clone();
    tsconfig.insert("references".to_string(), Value::Array(references));
    Ok(monolint_fs::to_json_string(&Value::Object(tsconfig))?)
}

impl TsconfigSource {
    fn expected(
        &self,
        ctx: &Context<'_>,
        excluded: &PatternSet,
    ) -> Result<Option<String>, RuleError> {
        match self {
            TsconfigSource::Generator(g) => Ok(g.generate(ctx)?),
            TsconfigSource::Template(t) => render_tsconfig(ctx, t, excluded).map(Some),
            TsconfigSource::TemplateFile(rel) => {
                let path = workspace_path(ctx, rel)?;
                let value = ctx
                    .file_system()
                    .read_json(&path)
                    .with_context(|| format!("read tsconfig template {}", path))?;
                let template = template_object(path.as_str(), value)?;
                render_tsconfig(ctx, &template, excluded).map(Some)
            }
        }
    }
}

impl RuleModule for StandardTsconfig {
    type Options = StandardTsconfigOptions;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            name: Self::NAME,
            title: "Standard tsconfig",
            description: "Each package's tsconfig.json must equal the shared template with \
                          project references to the workspace packages it depends on.",
            fixable: true,
        }
    }

    fn options_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "template": { "type": ["object", "string"] },
                "template_file": { "type": "string" },
                "excluded_references": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "additionalProperties": false,
            "oneOf": [
                { "required": ["template"] },
                { "required": ["template_file"] }
            ]
        })
    }

    fn parse_options(&self, raw: &Value) -> Result<Self::Options, ConfigError> {
        let raw: RawOptions = parse_with_serde(Self::NAME, raw)?;
        let source = match (raw.template, raw.template_file) {
            (Some(t), None) => TsconfigSource::Template(parse_template(t)?),
            (None, Some(f)) => TsconfigSource::TemplateFile(f),
            _ => {
                return Err(ConfigError::InvalidOptions {
                    rule: Self::NAME.to_string(),
                    errors: vec!["expected exactly one of template, template_file".to_string()],
                });
            }
        };
        Ok(StandardTsconfigOptions {
            source,
            excluded_references: raw.excluded_references,
        })
    }

    fn check(&self, ctx: &mut Context<'_>, options: &Self::Options) -> Result<(), RuleError> {
        let full_path = ctx.package_dir().join(TSCONFIG_FILE);
        let Some(expected) = options.source.expected(ctx, &options.excluded_references)? else {
            ctx.add_warning(Finding::new(full_path, "Excluding from standard-tsconfig"));
            return Ok(());
        };

        let fs = ctx.file_system();
        let actual = if fs.exists(&full_path) {
            Some(fs.read_file(&full_path)?)
        } else {
            None
        };
        if actual.as_deref() == Some(expected.as_str()) {
            return Ok(());
        }

        ctx.add_error(
            Finding::new(full_path.clone(), "Expect file contents to match")
                .with_long_message(text_diff(Some(&expected), actual.as_deref()))
                .with_fixer(Fixer::write_file(full_path, expected)),
        );
        Ok(())
    }
}
