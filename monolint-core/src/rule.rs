//! The rule protocol and the registry of named rules.

use crate::context::Context;
use crate::error::{ConfigError, RuleError};
use jsonschema::Draft;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Static description of a rule, used by `list-rules` and `explain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMeta {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub fixable: bool,
}

/// A pluggable check-and-optionally-fix unit.
///
/// Options flow through two gates: the raw value must satisfy
/// [`RuleModule::options_schema`], then [`RuleModule::parse_options`]
/// turns it into the typed record `check` receives.
pub trait RuleModule: Send + Sync {
    type Options: fmt::Debug + Send + Sync + 'static;

    fn meta(&self) -> RuleMeta;

    /// JSON Schema (draft 2020-12) for the raw options value.
    fn options_schema(&self) -> Value;

    /// Build typed options from a raw value that already passed the schema.
    fn parse_options(&self, raw: &Value) -> Result<Self::Options, ConfigError>;

    fn check(&self, ctx: &mut Context<'_>, options: &Self::Options) -> Result<(), RuleError>;
}

/// Validate `raw` against `schema`, collecting every violation.
pub fn validate_against_schema(rule: &str, schema: &Value, raw: &Value) -> Result<(), ConfigError> {
    let validator = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(schema)
        .map_err(|e| ConfigError::InvalidOptions {
            rule: rule.to_string(),
            errors: vec![format!("options schema does not compile: {e}")],
        })?;

    let errors: Vec<String> = validator
        .iter_errors(raw)
        .map(|e| {
            let at = e.instance_path().to_string();
            if at.is_empty() {
                e.to_string()
            } else {
                format!("{at}: {e}")
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::InvalidOptions {
            rule: rule.to_string(),
            errors,
        })
    }
}

/// Deserialize options that already passed schema validation.
pub fn parse_with_serde<T: DeserializeOwned>(rule: &str, raw: &Value) -> Result<T, ConfigError> {
    serde_json::from_value(raw.clone()).map_err(|e| ConfigError::InvalidOptions {
        rule: rule.to_string(),
        errors: vec![e.to_string()],
    })
}

/// A rule paired with its validated options, type-erased for the engine.
pub trait BoundRule: Send + Sync {
    fn meta(&self) -> RuleMeta;
    fn check(&self, ctx: &mut Context<'_>) -> Result<(), RuleError>;
}

struct Bound<R: RuleModule> {
    rule: R,
    options: R::Options,
}

impl<R: RuleModule> BoundRule for Bound<R> {
    fn meta(&self) -> RuleMeta {
        self.rule.meta()
    }

    fn check(&self, ctx: &mut Context<'_>) -> Result<(), RuleError> {
        self.rule.check(ctx, &self.options)
    }
}

/// Validate and parse `raw` for `rule`. Missing options are `null`.
pub fn bind<R: RuleModule + 'static>(
    rule: R,
    raw: Option<&Value>,
) -> Result<Box<dyn BoundRule>, ConfigError> {
    let raw = raw.cloned().unwrap_or(Value::Null);
    let name = rule.meta().name;
    validate_against_schema(name, &rule.options_schema(), &raw)?;
    let options = rule.parse_options(&raw)?;
    Ok(bind_with(rule, options))
}

/// Pair a rule with options built in code, bypassing the schema.
///
/// This is how programmatic generators reach `file-contents` and
/// `standard-tsconfig`.
pub fn bind_with<R: RuleModule + 'static>(rule: R, options: R::Options) -> Box<dyn BoundRule> {
    Box::new(Bound { rule, options })
}

type Binder = Box<dyn Fn(Option<&Value>) -> Result<Box<dyn BoundRule>, ConfigError> + Send + Sync>;

struct RegisteredRule {
    meta: RuleMeta,
    schema: Value,
    binder: Binder,
}

/// Rule description for `explain`.
#[derive(Debug, Clone, Serialize)]
pub struct RuleDescription {
    #[serde(flatten)]
    pub meta: RuleMeta,
    pub options_schema: Value,
}

/// Named rules available to configuration.
#[derive(Default)]
pub struct RuleRegistry {
    rules: BTreeMap<&'static str, RegisteredRule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule factory under its meta name. Later registrations win.
    pub fn register<R, F>(&mut self, factory: F)
    where
        R: RuleModule + 'static,
        F: Fn() -> R + Send + Sync + 'static,
    {
        let sample = factory();
        let meta = sample.meta();
        let schema = sample.options_schema();
        let binder: Binder = Box::new(move |raw| bind(factory(), raw));
        self.rules.insert(
            meta.name,
            RegisteredRule {
                meta,
                schema,
                binder,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn bind(&self, name: &str, raw: Option<&Value>) -> Result<Box<dyn BoundRule>, ConfigError> {
        let entry = self.rules.get(name).ok_or_else(|| ConfigError::UnknownRule {
            name: name.to_string(),
        })?;
        (entry.binder)(raw)
    }

    /// Metas sorted by name.
    pub fn metas(&self) -> Vec<RuleMeta> {
        self.rules.values().map(|r| r.meta.clone()).collect()
    }

    pub fn describe(&self, name: &str) -> Option<RuleDescription> {
        self.rules.get(name).map(|r| RuleDescription {
            meta: r.meta.clone(),
            options_schema: r.schema.clone(),
        })
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Finding;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Opts {
        word: String,
    }

    struct Echo;

    impl RuleModule for Echo {
        type Options = Opts;

        fn meta(&self) -> RuleMeta {
            RuleMeta {
                name: "echo",
                title: "Echo",
                description: "reports its option",
                fixable: false,
            }
        }

        fn options_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": { "word": { "type": "string" } },
                "required": ["word"],
                "additionalProperties": false
            })
        }

        fn parse_options(&self, raw: &Value) -> Result<Opts, ConfigError> {
            parse_with_serde("echo", raw)
        }

        fn check(&self, ctx: &mut Context<'_>, options: &Opts) -> Result<(), RuleError> {
            let path = ctx.package_json_path();
            ctx.add_warning(Finding::new(path, options.word.clone()));
            Ok(())
        }
    }

    #[test]
    fn schema_rejects_missing_and_extra_keys() {
        let err = bind(Echo, Some(&json!({ "other": 1 }))).err().expect("invalid");
        match err {
            ConfigError::InvalidOptions { rule, errors } => {
                assert_eq!(rule, "echo");
                assert!(errors.len() >= 2, "{errors:?}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_options_are_null() {
        let err = bind(Echo, None).err().expect("null is not an object");
        assert!(matches!(err, ConfigError::InvalidOptions { .. }));
    }

    #[test]
    fn registry_binds_by_name() {
        let mut reg = RuleRegistry::new();
        reg.register(|| Echo);
        assert!(reg.contains("echo"));
        assert!(reg.bind("echo", Some(&json!({ "word": "hi" }))).is_ok());
        assert!(matches!(
            reg.bind("nope", None).err(),
            Some(ConfigError::UnknownRule { .. })
        ));
        let desc = reg.describe("echo").expect("described");
        assert_eq!(desc.options_schema["required"], json!(["word"]));
        assert_eq!(reg.metas().len(), 1);
    }
}
