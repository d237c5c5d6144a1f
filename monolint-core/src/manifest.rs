use serde_json::{Map, Value};

/// A dependency block of a package manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Dependencies,
    DevDependencies,
    PeerDependencies,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 3] = [
        DependencyKind::Dependencies,
        DependencyKind::DevDependencies,
        DependencyKind::PeerDependencies,
    ];

    /// The manifest key for this block.
    pub fn key(self) -> &'static str {
        match self {
            DependencyKind::Dependencies => "dependencies",
            DependencyKind::DevDependencies => "devDependencies",
            DependencyKind::PeerDependencies => "peerDependencies",
        }
    }
}

/// Parsed `package.json`. Key order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageJson {
    raw: Map<String, Value>,
}

impl PackageJson {
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(raw) => Ok(Self { raw }),
            other => Err(format!("expected a JSON object, found {}", json_type(&other))),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.raw.get("name").and_then(Value::as_str)
    }

    /// The block for `kind`, if present and an object.
    pub fn dependencies(&self, kind: DependencyKind) -> Option<&Map<String, Value>> {
        self.raw.get(kind.key()).and_then(Value::as_object)
    }

    /// Names from the given blocks, first occurrence wins the position.
    pub fn dependency_names(&self, kinds: &[DependencyKind]) -> Vec<String> {
        let mut merged = Map::new();
        for kind in kinds {
            if let Some(block) = self.dependencies(*kind) {
                for (name, version) in block {
                    merged.insert(name.clone(), version.clone());
                }
            }
        }
        merged.keys().cloned().collect()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
