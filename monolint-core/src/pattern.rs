use crate::error::ConfigError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::Deserialize;

/// A list of glob patterns matched against package names.
///
/// `*` does not cross `/`, so `@scope/*` matches `@scope/pkg` but not
/// `@scope/pkg/sub`. Brace alternation is supported: `@types/{react,node}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct PatternSet {
    sources: Vec<String>,
    set: GlobSet,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl PatternSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut sources = Vec::new();
        for p in patterns {
            let p = p.as_ref();
            let glob = GlobBuilder::new(p)
                .literal_separator(true)
                .build()
                .map_err(|e| invalid(p, e))?;
            builder.add(glob);
            sources.push(p.to_string());
        }
        let set = builder.build().map_err(|e| invalid(&sources.join(", "), e))?;
        Ok(Self { sources, set })
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn matches_any(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    pub fn as_strs(&self) -> Vec<&str> {
        self.sources.iter().map(String::as_str).collect()
    }
}

fn invalid(pattern: &str, err: globset::Error) -> ConfigError {
    ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    }
}

impl TryFrom<Vec<String>> for PatternSet {
    type Error = ConfigError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
