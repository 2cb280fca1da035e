use serde::{Deserialize, Serialize};

/// How an environment value is turned into CLI tokens.
///
/// Serialized as its catalog `type` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ValueKind {
    /// Boolean presence switch.
    Flag,
    /// Single string value.
    Value,
    /// Comma-separated list, one flag+value pair per element.
    MultiValue,
    /// A `type` string the compiler does not understand.
    Unrecognized(String),
}

impl ValueKind {
    pub fn from_type_str(s: &str) -> Self {
        match s {
            "flag" => ValueKind::Flag,
            "value" => ValueKind::Value,
            "multi_value" => ValueKind::MultiValue,
            other => ValueKind::Unrecognized(other.to_string()),
        }
    }

    pub fn as_type_str(&self) -> &str {
        match self {
            ValueKind::Flag => "flag",
            ValueKind::Value => "value",
            ValueKind::MultiValue => "multi_value",
            ValueKind::Unrecognized(s) => s.as_str(),
        }
    }
}

impl From<String> for ValueKind {
    fn from(s: String) -> Self {
        ValueKind::from_type_str(&s)
    }
}

impl From<ValueKind> for String {
    fn from(kind: ValueKind) -> Self {
        kind.as_type_str().to_string()
    }
}

/// One supported CLI option. Serializes to a catalog document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Environment variable that carries the value. Unique per catalog.
    #[serde(rename = "env")]
    pub env_name: String,
    /// Flag emitted on the CLI. Empty for action-only parameters.
    pub flag: String,
    #[serde(rename = "type")]
    pub value_kind: ValueKind,
    /// Sub-commands that accept this parameter. Empty means all.
    #[serde(rename = "commands")]
    pub applicable_commands: Vec<String>,
    pub description: String,
    pub example: String,
}

impl ParameterSpec {
    /// A flag parameter that only changes the caller's behaviour and
    /// never reaches the CLI.
    pub fn is_action_only(&self) -> bool {
        self.value_kind == ValueKind::Flag && self.flag.is_empty()
    }

    pub fn applies_to(&self, command: Option<&str>) -> bool {
        match command {
            None | Some("") => true,
            Some(cmd) => {
                self.applicable_commands.is_empty()
                    || self.applicable_commands.iter().any(|c| c == cmd)
            }
        }
    }
}

/// A loaded, immutable parameter catalog.
///
/// Serializes to a `{"parameters": [...]}` document that loads back into
/// an equivalent catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    /// Where the catalog came from (path or `builtin:<name>`).
    #[serde(skip)]
    pub source_name: String,
    /// Hex-encoded SHA-256 of the source bytes.
    #[serde(skip)]
    pub fingerprint: String,
    #[serde(rename = "parameters")]
    specs: Vec<ParameterSpec>,
}

impl Catalog {
    pub(crate) fn new(source_name: String, fingerprint: String, specs: Vec<ParameterSpec>) -> Self {
        Self {
            source_name,
            fingerprint,
            specs,
        }
    }

    /// Entries in declaration order.
    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    pub fn get(&self, env_name: &str) -> Option<&ParameterSpec> {
        self.specs.iter().find(|s| s.env_name == env_name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Report-facing metadata.
    pub fn info(&self) -> CatalogInfo {
        CatalogInfo {
            source: self.source_name.clone(),
            sha256: self.fingerprint.clone(),
            parameter_count: self.specs.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub source: String,
    pub sha256: String,
    pub parameter_count: usize,
}
