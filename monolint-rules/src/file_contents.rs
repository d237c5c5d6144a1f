use crate::generator::{Generator, read_template_file};
use camino::Utf8PathBuf;
use monolint_core::diff::text_diff;
use monolint_core::rule::parse_with_serde;
use monolint_core::{ConfigError, Context, Finding, FixOp, Fixer, RuleError, RuleMeta, RuleModule};
use serde::Deserialize;
use serde_json::{Value, json};

/// A package file must hold generated or templated content.
pub struct FileContents;

impl FileContents {
    pub const NAME: &'static str = "file-contents";
}

/// Where the expected content comes from.
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// Only reachable from code, never from configuration.
    Generator(Generator),
    Template(String),
    /// Relative to the workspace root.
    TemplateFile(Utf8PathBuf),
}

#[derive(Debug, Clone)]
pub struct FileContentsOptions {
    /// Relative to the package directory.
    pub file: Utf8PathBuf,
    pub source: ContentSource,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptions {
    file: Utf8PathBuf,
    template: Option<String>,
    template_file: Option<Utf8PathBuf>,
}

impl ContentSource {
    pub(crate) fn expected(&self, ctx: &Context<'_>) -> Result<Option<String>, RuleError> {
        match self {
            ContentSource::Generator(g) => Ok(g.generate(ctx)?),
            ContentSource::Template(t) => Ok(Some(t.clone())),
            ContentSource::TemplateFile(rel) => Ok(Some(read_template_file(ctx, rel)?)),
        }
    }
}

impl RuleModule for FileContents {
    type Options = FileContentsOptions;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            name: Self::NAME,
            title: "File contents",
            description: "A file inside each package must match a template string, a \
                          template file from the workspace root, or a generator.",
            fixable: true,
        }
    }

    fn options_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file": { "type": "string" },
                "template": { "type": "string" },
                "template_file": { "type": "string" }
            },
            "required": ["file"],
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
            (Some(t), None) => ContentSource::Template(t),
            (None, Some(f)) => ContentSource::TemplateFile(f),
            _ => {
                return Err(ConfigError::InvalidOptions {
                    rule: Self::NAME.to_string(),
                    errors: vec!["expected exactly one of template, template_file".to_string()],
                });
            }
        };
        Ok(FileContentsOptions {
            file: raw.file,
            source,
        })
    }

    fn check(&self, ctx: &mut Context<'_>, options: &Self::Options) -> Result<(), RuleError> {
        let full_path = ctx.package_dir().join(&options.file);
        let expected = options.source.expected(ctx)?;

        let fs = ctx.file_system();
        let exists = fs.exists(&full_path);
        let actual = if exists {
            Some(fs.read_file(&full_path)?)
        } else {
            None
        };
        if actual == expected {
            return Ok(());
        }

        let fixer = match &expected {
            None => Fixer::remove_file(full_path.clone()),
            Some(contents) => {
                let mut fixer = Fixer::new();
                if let Some(parent) = full_path.parent() {
                    fixer = fixer.then(FixOp::CreateDirAll {
                        path: parent.to_path_buf(),
                    });
                }
                fixer.then(FixOp::WriteFile {
                    path: full_path.clone(),
                    contents: contents.clone(),
                })
            }
        };

        ctx.add_error(
            Finding::new(full_path, "Expect file contents to match")
                .with_long_message(text_diff(expected.as_deref(), actual.as_deref()))
                .with_fixer(fixer),
        );
        Ok(())
    }
}
