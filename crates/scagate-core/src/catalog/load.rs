//! Catalog loading and validation.
//!
//! A catalog document is either a top-level JSON array of records or an
//! object with a `parameters` array. Each record has exactly the fields
//! `env`, `flag`, `type`, `commands`, `description` and `example`.
//!
//! Loading fails closed: any malformed record or duplicate `env` rejects
//! the whole document.

use std::collections::HashMap;
use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::catalog::builtin;
use crate::catalog::model::{Catalog, ParameterSpec, ValueKind};
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    env: String,
    flag: String,
    #[serde(rename = "type")]
    kind: String,
    commands: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    example: String,
}

/// Parse and validate a catalog from its source text.
pub fn load_str(source_name: &str, text: &str) -> Result<Catalog, CatalogError> {
    let malformed = |message: String| CatalogError::Malformed {
        source_name: source_name.to_string(),
        message,
    };

    let doc: serde_json::Value =
        serde_json::from_str(text).map_err(|e| malformed(format!("invalid JSON: {e}")))?;

    let records = match doc {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("parameters") {
            Some(serde_json::Value::Array(items)) => items,
            Some(_) => return Err(malformed("`parameters` must be an array".into())),
            None => return Err(malformed("missing top-level `parameters` array".into())),
        },
        _ => {
            return Err(malformed(
                "expected an array of parameters or an object with `parameters`".into(),
            ));
        }
    };

    let mut specs = Vec::with_capacity(records.len());
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, record) in records.into_iter().enumerate() {
        let env_hint = record
            .get("env")
            .and_then(|v| v.as_str())
            .unwrap_or("<missing env>")
            .to_string();

        let raw: RawEntry = serde_json::from_value(record)
            .map_err(|e| malformed(format!("entry {index} ({env_hint}): {e}")))?;

        let spec = validate_entry(source_name, index, raw)?;

        if let Some(&first) = seen.get(&spec.env_name) {
            return Err(CatalogError::DuplicateKey {
                source_name: source_name.to_string(),
                env: spec.env_name,
                first,
                second: index,
            });
        }
        seen.insert(spec.env_name.clone(), index);
        specs.push(spec);
    }

    debug!(source = source_name, parameters = specs.len(), "catalog loaded");

    Ok(Catalog::new(
        source_name.to_string(),
        fingerprint(text.as_bytes()),
        specs,
    ))
}

fn validate_entry(
    source_name: &str,
    index: usize,
    raw: RawEntry,
) -> Result<ParameterSpec, CatalogError> {
    let invalid = |field: &'static str, message: &str| CatalogError::InvalidEntry {
        source_name: source_name.to_string(),
        index,
        env: raw.env.clone(),
        field,
        message: message.to_string(),
    };

    if raw.env.trim().is_empty() {
        return Err(invalid("env", "must not be empty"));
    }

    let value_kind = ValueKind::from_type_str(&raw.kind);

    if raw.flag.is_empty() {
        // Only boolean switches may be action-only.
        if matches!(value_kind, ValueKind::Value | ValueKind::MultiValue) {
            return Err(invalid(
                "flag",
                "may only be empty for `flag` parameters (action-only)",
            ));
        }
    } else if !raw.flag.starts_with('-') {
        return Err(invalid("flag", "must start with `-`"));
    }

    if raw.commands.iter().any(|c| c.trim().is_empty()) {
        return Err(invalid("commands", "must not contain empty command names"));
    }

    Ok(ParameterSpec {
        env_name: raw.env,
        flag: raw.flag,
        value_kind,
        applicable_commands: raw.commands,
        description: raw.description,
        example: raw.example,
    })
}

/// Read a catalog file from disk.
pub fn load_file(path: &Path) -> Result<Catalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read parameter catalog: {}", path.display()))?;
    let catalog = load_str(&path.display().to_string(), &text)?;
    Ok(catalog)
}

/// Resolve a catalog reference: `builtin:<name>` or a filesystem path.
pub fn resolve(reference: &str) -> Result<Catalog> {
    match reference.strip_prefix("builtin:") {
        Some(name) => Ok(builtin::load(name)?),
        None => load_file(Path::new(reference)),
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TWO_ENTRIES: &str = r#"[
        {"env": "SCA_FOSSA_BRANCH", "flag": "--branch", "type": "value",
         "commands": ["analyze", "test"], "description": "Branch", "example": "main"},
        {"env": "SCA_FOSSA_DEBUG", "flag": "--debug", "type": "flag",
         "commands": [], "description": "Debug", "example": "true"}
    ]"#;

    #[test]
    fn loads_array_document_in_order() {
        let catalog = load_str("test", TWO_ENTRIES).unwrap();
        let names: Vec<_> = catalog.specs().iter().map(|s| s.env_name.as_str()).collect();
        assert_eq!(names, vec!["SCA_FOSSA_BRANCH", "SCA_FOSSA_DEBUG"]);
        assert_eq!(catalog.specs()[0].value_kind, ValueKind::Value);
        assert_eq!(catalog.specs()[0].applicable_commands, vec!["analyze", "test"]);
    }

    #[test]
    fn loads_wrapped_document() {
        let text = format!(r#"{{"parameters": {TWO_ENTRIES}}}"#);
        let catalog = load_str("wrapped", &text).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn documentation_fields_are_optional() {
        let catalog = load_str(
            "t",
            r#"[{"env": "A", "flag": "--a", "type": "value", "commands": []}]"#,
        )
        .unwrap();
        assert_eq!(catalog.specs()[0].description, "");
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = load_str("broken", "{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn scalar_document_is_malformed() {
        assert!(matches!(
            load_str("t", "42").unwrap_err(),
            CatalogError::Malformed { .. }
        ));
    }

    #[test]
    fn missing_field_names_the_entry() {
        let err = load_str(
            "t",
            r#"[{"env": "SCA_FOSSA_TEAM", "type": "value", "commands": []}]"#,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("entry 0"), "{msg}");
        assert!(msg.contains("SCA_FOSSA_TEAM"), "{msg}");
        assert!(msg.contains("flag"), "{msg}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = load_str(
            "t",
            r#"[{"env": "A", "flag": "--a", "type": "value", "commands": [], "default": "x"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }

    #[test]
    fn duplicate_env_names_are_rejected() {
        let err = load_str(
            "dup",
            r#"[
                {"env": "A", "flag": "--a", "type": "value", "commands": []},
                {"env": "B", "flag": "--b", "type": "value", "commands": []},
                {"env": "A", "flag": "--a2", "type": "flag", "commands": []}
            ]"#,
        )
        .unwrap_err();
        match err {
            CatalogError::DuplicateKey {
                env, first, second, ..
            } => {
                assert_eq!(env, "A");
                assert_eq!((first, second), (0, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn action_only_flag_is_valid() {
        let catalog = load_str(
            "t",
            r#"[{"env": "SCA_FOSSA_SKIP_TEST", "flag": "", "type": "flag", "commands": []}]"#,
        )
        .unwrap();
        assert!(catalog.specs()[0].is_action_only());
    }

    #[test]
    fn empty_flag_on_value_entry_is_rejected() {
        let err = load_str(
            "t",
            r#"[{"env": "A", "flag": "", "type": "value", "commands": []}]"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidEntry { field: "flag", .. }
        ));
    }

    #[test]
    fn flag_without_dash_is_rejected() {
        let err = load_str(
            "t",
            r#"[{"env": "A", "flag": "branch", "type": "value", "commands": []}]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("must start with `-`"));
    }

    #[test]
    fn unknown_type_loads_as_unrecognized() {
        let catalog = load_str(
            "t",
            r#"[{"env": "A", "flag": "--a", "type": "list", "commands": []}]"#,
        )
        .unwrap();
        assert_eq!(
            catalog.specs()[0].value_kind,
            ValueKind::Unrecognized("list".into())
        );
    }

    #[test]
    fn fingerprint_depends_only_on_bytes() {
        let a = load_str("one", TWO_ENTRIES).unwrap();
        let b = load_str("two", TWO_ENTRIES).unwrap();
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.fingerprint.len(), 64);

        let c = load_str("three", "[]").unwrap();
        assert_ne!(a.fingerprint, c.fingerprint);
    }

    #[test]
    fn load_file_reads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TWO_ENTRIES.as_bytes()).unwrap();
        file.flush().unwrap();

        let catalog = load_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.source_name, file.path().display().to_string());
    }

    #[test]
    fn missing_file_returns_error() {
        assert!(load_file(Path::new("no_such_catalog.json")).is_err());
    }

    #[test]
    fn resolve_handles_builtin_references() {
        assert!(resolve("builtin:sca").is_ok());
        assert!(resolve("builtin:nope").is_err());
    }

    #[test]
    fn serialized_catalog_loads_back_unchanged() {
        let original = builtin::load("sca").unwrap();
        let text = serde_json::to_string_pretty(&original).unwrap();
        let reloaded = load_str("exported", &text).unwrap();
        assert_eq!(reloaded.specs(), original.specs());
    }
}
