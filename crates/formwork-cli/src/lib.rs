//! # formwork-cli — Command-Line Front End
//!
//! Provides the `formwork` binary over the `formwork-schema` engine.
//!
//! ## Subcommands
//!
//! - `formwork check` — compile a form definition and report its fields and
//!   diagnostics.
//! - `formwork validate` — validate a submitted record against a form.
//!
//! ```bash
//! formwork check forms/signup.yaml
//! formwork validate forms/signup.yaml submissions/alice.json --json
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success, `1` when a record fails validation, `2` on any
//! operational error (unreadable file, malformed form, non-object record).

pub mod check;
pub mod validate;

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

/// Exit code for a clean run.
pub const EXIT_OK: u8 = 0;
/// Exit code for a record that fails validation.
pub const EXIT_INVALID: u8 = 1;
/// Exit code for operational errors.
pub const EXIT_ERROR: u8 = 2;

/// Read a submitted record from a JSON or YAML file.
///
/// `.yaml` and `.yml` files are parsed as YAML; anything else as JSON. The
/// top-level value must be an object.
pub fn load_record(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record {}", path.display()))?;

    let value: Value = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML record {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON record {}", path.display()))?,
    };

    match value {
        Value::Object(map) => Ok(map),
        other => bail!(
            "record {} must be an object, found {}",
            path.display(),
            type_label(&other)
        ),
    }
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.json");
        std::fs::write(&path, r#"{"email":"a@b.co"}"#).unwrap();
        let record = load_record(&path).unwrap();
        assert_eq!(record["email"], "a@b.co");
    }

    #[test]
    fn test_load_yaml_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.yml");
        std::fs::write(&path, "role: admin\nage: 30\n").unwrap();
        let record = load_record(&path).unwrap();
        assert_eq!(record["role"], "admin");
        assert_eq!(record["age"], 30);
    }

    #[test]
    fn test_non_object_record_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = load_record(&path).unwrap_err();
        assert!(err.to_string().contains("must be an object, found array"));
    }

    #[test]
    fn test_missing_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_record(&dir.path().join("absent.json")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read record"));
    }
}
