//! # Form Definitions
//!
//! A whole form as authored on disk: optional presentation metadata plus the
//! ordered field list. JSON and YAML are both accepted. The format is chosen
//! from the file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::FieldDescriptor;
use crate::error::{CompileError, FormLoadError};
use crate::schema::{compile, CompiledSchema};

const INLINE_ORIGIN: &str = "<inline>";

/// A form definition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_label: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDefinition {
    pub fn from_json_str(content: &str) -> Result<Self, FormLoadError> {
        parse_json(content, INLINE_ORIGIN)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, FormLoadError> {
        parse_yaml(content, INLINE_ORIGIN)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    ///
    /// Files with any other extension are parsed as JSON.
    pub fn load(path: &Path) -> Result<Self, FormLoadError> {
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| FormLoadError::Io {
            path: origin.clone(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "yaml" | "yml" => parse_yaml(&content, &origin),
            _ => parse_json(&content, &origin),
        }
    }

    /// Compile the field list.
    pub fn compile(&self) -> Result<CompiledSchema, CompileError> {
        compile(&self.fields)
    }
}

fn parse_json(content: &str, origin: &str) -> Result<FormDefinition, FormLoadError> {
    serde_json::from_str(content).map_err(|e| FormLoadError::Parse {
        origin: origin.to_owned(),
        reason: format!("invalid JSON: {e}"),
    })
}

fn parse_yaml(content: &str, origin: &str) -> Result<FormDefinition, FormLoadError> {
    serde_yaml::from_str(content).map_err(|e| FormLoadError::Parse {
        origin: origin.to_owned(),
        reason: format!("invalid YAML: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SIGNUP_YAML: &str = r#"
title: Sign up
submitLabel: Create account
fields:
  - type: text
    name: email
    label: Email
    inputType: email
  - type: password
    name: password
    label: Password
    confirmPassword: true
    validations:
      - type: min
        value: 8
        message: at least 8 characters
"#;

    #[test]
    fn test_from_yaml() {
        let form = FormDefinition::from_yaml_str(SIGNUP_YAML).unwrap();
        assert_eq!(form.title.as_deref(), Some("Sign up"));
        assert_eq!(form.submit_label.as_deref(), Some("Create account"));
        assert_eq!(form.fields.len(), 2);

        let schema = form.compile().unwrap();
        assert!(schema.field("passwordConfirm").is_some());
    }

    #[test]
    fn test_from_json() {
        let form = FormDefinition::from_json_str(
            r#"{"fields":[{"type":"textarea","name":"bio","label":"Bio","cols":40}]}"#,
        )
        .unwrap();
        assert_eq!(form.title, None);
        assert_eq!(form.fields[0].kind_name(), "textarea");
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = FormDefinition::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, FormLoadError::Parse { ref origin, .. } if origin == "<inline>"));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("signup.yaml");
        std::fs::File::create(&yaml_path)
            .unwrap()
            .write_all(SIGNUP_YAML.as_bytes())
            .unwrap();
        assert_eq!(FormDefinition::load(&yaml_path).unwrap().fields.len(), 2);

        let json_path = dir.path().join("contact.json");
        std::fs::write(
            &json_path,
            r#"{"fields":[{"type":"text","name":"phone","inputType":"phone"}]}"#,
        )
        .unwrap();
        assert_eq!(FormDefinition::load(&json_path).unwrap().fields.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FormDefinition::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, FormLoadError::Io { .. }));
    }
}
