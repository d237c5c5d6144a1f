//! Configuration file loading for monolint.
//!
//! Discovers and loads `monolint.toml` from the workspace root and merges
//! it with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use monolint_core::{LintConfig, RuleConfig, RunSettings};
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "monolint.toml";

/// Top-level configuration from monolint.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonolintConfig {
    /// Run-wide switches.
    pub settings: SettingsConfig,

    /// Configured rules, checked in order.
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Apply fixes for error findings.
    pub fix: bool,

    /// Show long messages and debug logs.
    pub verbose: bool,
}

/// Discover the monolint.toml config file in the workspace root.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a monolint.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<MonolintConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<MonolintConfig> {
    let config: MonolintConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the workspace root, or return the default if absent.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<MonolintConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(MonolintConfig::default()),
    }
}

/// Config file and CLI arguments combined into what the engine consumes.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    pub lint: LintConfig,
    pub settings: RunSettings,
    pub verbose: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: MonolintConfig,
}

impl ConfigMerger {
    pub fn new(config: MonolintConfig) -> Self {
        Self { config }
    }

    /// Merge with check command CLI arguments.
    ///
    /// Boolean flags override the file when set. Relative `paths` are
    /// resolved against `root`; paths that exist are canonicalized so they
    /// compare equal to discovered member directories.
    pub fn merge_check_args(
        self,
        root: &Utf8Path,
        cli_fix: bool,
        cli_verbose: bool,
        cli_paths: &[Utf8PathBuf],
    ) -> MergedConfig {
        let paths = cli_paths
            .iter()
            .map(|p| {
                let full = if p.is_absolute() { p.clone() } else { root.join(p) };
                canonical_or_self(full)
            })
            .collect();

        MergedConfig {
            lint: LintConfig {
                rules: self.config.rules,
            },
            settings: RunSettings {
                fix: cli_fix || self.config.settings.fix,
                paths,
            },
            verbose: cli_verbose || self.config.settings.verbose,
        }
    }
}

fn canonical_or_self(path: Utf8PathBuf) -> Utf8PathBuf {
    match fs::canonicalize(&path).map(Utf8PathBuf::from_path_buf) {
        Ok(Ok(canonical)) => canonical,
        _ => {
            debug!(path = %path, "keeping path as given");
            path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn parses_settings_and_rules() {
        let contents = r#"
[settings]
fix = true

[[rules]]
rule = "consistent-dependencies"

[[rules]]
rule = "banned-dependencies"
include_packages = ["@scope/*"]
exclude_packages = ["@scope/legacy"]
include_workspace_root = true
[rules.options]
banned_dependencies = ["left-pad", "@evil/*"]
"#;

        let config = parse_config(contents).expect("parse");
        assert!(config.settings.fix);
        assert!(!config.settings.verbose);
        assert_eq!(config.rules.len(), 2);

        let first = &config.rules[0];
        assert_eq!(first.rule, "consistent-dependencies");
        assert!(first.options.is_none());
        assert!(!first.include_workspace_root);

        let banned = &config.rules[1];
        assert_eq!(banned.include_packages, vec!["@scope/*"]);
        assert_eq!(banned.exclude_packages, vec!["@scope/legacy"]);
        assert!(banned.include_workspace_root);
        assert_eq!(
            banned.options,
            Some(json!({ "banned_dependencies": ["left-pad", "@evil/*"] }))
        );
    }

    #[test]
    fn nested_options_become_json() {
        let contents = r#"
[[rules]]
rule = "standard-tsconfig"
[rules.options.template.compilerOptions]
strict = true
target = "es2022"
"#;
        let config = parse_config(contents).expect("parse");
        assert_eq!(
            config.rules[0].options,
            Some(json!({ "template": { "compilerOptions": { "strict": true, "target": "es2022" } } }))
        );
    }

    #[test]
    fn empty_file_is_default() {
        let config = parse_config("").expect("parse");
        assert!(config.rules.is_empty());
        assert!(!config.settings.fix);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let err = parse_config("[[rules]\nrule =").expect_err("invalid");
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn missing_file_loads_default() {
        let temp = TempDir::new().expect("tempdir");
        let root = Utf8Path::from_path(temp.path()).expect("utf8");
        assert!(discover_config(root).is_none());
        let config = load_or_default(root).expect("default");
        assert!(config.rules.is_empty());
    }

    #[test]
    fn config_file_is_discovered_in_root() {
        let temp = TempDir::new().expect("tempdir");
        let root = Utf8Path::from_path(temp.path()).expect("utf8");
        fs::write(
            root.join(CONFIG_FILE_NAME),
            "[settings]\nverbose = true\n\n[[rules]]\nrule = \"file-contents\"\n",
        )
        .expect("write");

        assert_eq!(discover_config(root), Some(root.join(CONFIG_FILE_NAME)));
        let config = load_or_default(root).expect("load");
        assert!(config.settings.verbose);
        assert_eq!(config.rules[0].rule, "file-contents");
    }

    #[test]
    fn cli_flags_override_file_settings() {
        let root = Utf8Path::new("/repo");
        let merged = ConfigMerger::new(MonolintConfig::default()).merge_check_args(
            root,
            true,
            false,
            &[],
        );
        assert!(merged.settings.fix);
        assert!(!merged.verbose);

        let file = MonolintConfig {
            settings: SettingsConfig {
                fix: true,
                verbose: true,
            },
            rules: Vec::new(),
        };
        let merged = ConfigMerger::new(file).merge_check_args(root, false, false, &[]);
        assert!(merged.settings.fix);
        assert!(merged.verbose);
    }

    #[test]
    fn existing_paths_are_canonicalized() {
        let temp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(fs::canonicalize(temp.path()).expect("canonical"))
            .expect("utf8");
        fs::create_dir_all(root.join("packages/a")).expect("mkdir");
        fs::create_dir_all(root.join("packages/b")).expect("mkdir");

        let merged = ConfigMerger::new(MonolintConfig::default()).merge_check_args(
            &root,
            false,
            false,
            &["packages/b/../a".into()],
        );
        assert_eq!(merged.settings.paths, vec![root.join("packages/a")]);
    }

    #[test]
    fn relative_paths_resolve_against_root() {
        let merged = ConfigMerger::new(MonolintConfig::default()).merge_check_args(
            Utf8Path::new("/repo"),
            false,
            false,
            &["packages/a".into(), "/elsewhere/b".into()],
        );
        assert_eq!(
            merged.settings.paths,
            vec![
                Utf8PathBuf::from("/repo/packages/a"),
                Utf8PathBuf::from("/elsewhere/b")
            ]
        );
    }
}
