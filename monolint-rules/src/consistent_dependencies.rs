use monolint_core::diff::json_diff;
use monolint_core::{
    ConfigError, Context, DependencyKind, Finding, Fixer, RuleError, RuleMeta, RuleModule,
};
use serde_json::{Map, Value, json};

/// Member dependency versions must match the workspace root's.
///
/// Only names declared by both sides are compared; the root never adds
/// dependencies to a member. Peer dependencies are left alone.
pub struct ConsistentDependencies;

impl ConsistentDependencies {
    pub const NAME: &'static str = "consistent-dependencies";

    const BLOCKS: [DependencyKind; 2] = [
        DependencyKind::Dependencies,
        DependencyKind::DevDependencies,
    ];
}

/// The member block with every version the root also declares replaced by
/// the root's. Key order follows the member block.
pub fn expected_dependencies(
    package: &Map<String, Value>,
    root: &Map<String, Value>,
) -> Map<String, Value> {
    package
        .iter()
        .map(|(name, version)| {
            let version = root.get(name).unwrap_or(version).clone();
            (name.clone(), version)
        })
        .collect()
}

impl RuleModule for ConsistentDependencies {
    type Options = ();

    fn meta(&self) -> RuleMeta {
        RuleMeta {
            name: Self::NAME,
            title: "Consistent dependency versions",
            description: "Every dependency or devDependency a package shares with the \
                          workspace root must use the root's version.",
            fixable: true,
        }
    }

    fn options_schema(&self) -> Value {
        json!({ "type": "null" })
    }

    fn parse_options(&self, _raw: &Value) -> Result<(), ConfigError> {
        Ok(())
    }

    fn check(&self, ctx: &mut Context<'_>, _options: &()) -> Result<(), RuleError> {
        let root_manifest = ctx.workspace_context()?.package_json()?.clone();
        let manifest = ctx.package_json()?.clone();
        let path = ctx.package_json_path();

        for kind in Self::BLOCKS {
            let (Some(actual), Some(root)) =
                (manifest.dependencies(kind), root_manifest.dependencies(kind))
            else {
                continue;
            };

            let expected = expected_dependencies(actual, root);
            let expected_text = serde_json::to_string(&expected).map_err(anyhow::Error::from)?;
            let actual_text = serde_json::to_string(actual).map_err(anyhow::Error::from)?;
            if expected_text == actual_text {
                continue;
            }

            let diff = json_diff(&Value::Object(expected.clone()), &Value::Object(actual.clone()));
            ctx.add_error(
                Finding::new(
                    path.clone(),
                    format!("Inconsistent {} with root in package.json", kind.key()),
                )
                .with_long_message(diff)
                .with_fixer(Fixer::set_json_key(
                    path.clone(),
                    kind.key(),
                    Value::Object(expected),
                )),
            );
        }
        Ok(())
    }
}
