use monolint_core::diff::json_diff;
use monolint_core::rule::parse_with_serde;
use monolint_core::{
    ConfigError, Context, DependencyKind, Finding, Fixer, PatternSet, RuleError, RuleMeta,
    RuleModule,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Packages must not depend on names matching a banned glob.
pub struct BannedDependencies;

impl BannedDependencies {
    pub const NAME: &'static str = "banned-dependencies";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BannedDependenciesOptions {
    pub banned_dependencies: PatternSet,
}

/// Entries of `block` whose name matches none of `banned`, in block order.
pub fn retained_dependencies(block: &Map<String, Value>, banned: &PatternSet) -> Map<String, Value> {
    block
        .iter()
        .filter(|(name, _)| !banned.matches_any(name))
        .map(|(name, version)| (name.clone(), version.clone()))
        .collect()
}

impl RuleModule for BannedDependencies {
    type Options = BannedDependenciesOptions;

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            name: Self::NAME,
            title: "Banned dependencies",
            description: "Removes dependencies, devDependencies and peerDependencies whose \
                          name matches any of the configured glob patterns.",
            fixable: true,
        }
    }

    fn options_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "banned_dependencies": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["banned_dependencies"],
            "additionalProperties": false
        })
    }

    fn parse_options(&self, raw: &Value) -> Result<Self::Options, ConfigError> {
        parse_with_serde(Self::NAME, raw)
    }

    fn check(&self, ctx: &mut Context<'_>, options: &Self::Options) -> Result<(), RuleError> {
        let manifest = ctx.package_json()?.clone();
        let path = ctx.package_json_path();

        for kind in DependencyKind::ALL {
            let Some(actual) = manifest.dependencies(kind) else {
                continue;
            };
            let retained = retained_dependencies(actual, &options.banned_dependencies);
            if retained.len() == actual.len() {
                continue;
            }

            let diff = json_diff(&Value::Object(retained.clone()), &Value::Object(actual.clone()));
            ctx.add_error(
                Finding::new(
                    path.clone(),
                    format!("Banned dependencies in {} in package.json", kind.key()),
                )
                .with_long_message(diff)
                .with_fixer(Fixer::set_json_key(
                    path.clone(),
                    kind.key(),
                    Value::Object(retained),
                )),
            );
        }
        Ok(())
    }
}
