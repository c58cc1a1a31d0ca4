//! # Field Descriptor Model
//!
//! Declarative, data-only description of form fields. Nothing in this module
//! validates anything; the builders in [`base`](crate::base),
//! [`rules`](crate::rules) and [`confirm`](crate::confirm) interpret it.
//!
//! ## Wire Format
//!
//! Every field is a JSON/YAML object tagged by `"type"`:
//!
//! ```yaml
//! - type: text
//!   name: email
//!   label: Email
//!   inputType: email
//! - type: select
//!   name: role
//!   label: Role
//!   options:
//!     - { label: Admin, value: admin }
//!     - { label: User, value: user }
//! - type: password
//!   name: password
//!   label: Password
//!   confirmPassword: true
//!   validations:
//!     - { type: min, value: 8, message: "at least 8 characters" }
//! ```
//!
//! Unknown `"type"` tags deserialize into [`FieldDescriptor::Unsupported`]
//! rather than failing, so schema compilation can degrade to a permissive
//! validator and record a diagnostic.
//!
//! ## Exhaustiveness
//!
//! Consumers match on [`FieldDescriptor`] without wildcard arms. Adding a
//! variant is a compile error at every consumer until it is handled.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Attributes shared by every field kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCommon {
    /// Key into the submitted record. Should be unique within a form.
    pub name: String,
    /// Display text. Opaque to the engine.
    #[serde(default)]
    pub label: String,
    /// Whether the field may be absent from the record.
    #[serde(default)]
    pub optional: bool,
    /// Constraints applied in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<RuleDescriptor>,
}

impl FieldCommon {
    fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            optional: false,
            validations: Vec::new(),
        }
    }
}

/// Rendering hints carried through for consumers. Never read by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
}

/// Text input flavour; selects the base check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    /// Any string.
    #[default]
    #[serde(alias = "text")]
    Plain,
    /// Must look like an email address.
    Email,
    /// Optional leading `+`, then digits, spaces, hyphens, parentheses.
    Phone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    #[serde(flatten)]
    pub common: FieldCommon,
    #[serde(default)]
    pub input_type: TextKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(flatten)]
    pub presentation: Presentation,
}

impl TextField {
    /// A required plain text field.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            common: FieldCommon::new(name, label),
            input_type: TextKind::Plain,
            default_value: None,
            presentation: Presentation::default(),
        }
    }

    pub fn with_kind(mut self, kind: TextKind) -> Self {
        self.input_type = kind;
        self
    }
}

/// One selectable choice. `value` is what the record carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectField {
    #[serde(flatten)]
    pub common: FieldCommon,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(flatten)]
    pub presentation: Presentation,
}

impl SelectField {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = SelectOption>,
    ) -> Self {
        Self {
            common: FieldCommon::new(name, label),
            options: options.into_iter().collect(),
            default_value: None,
            presentation: Presentation::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAreaField {
    #[serde(flatten)]
    pub common: FieldCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(flatten)]
    pub presentation: Presentation,
}

impl TextAreaField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            common: FieldCommon::new(name, label),
            rows: None,
            cols: None,
            default_value: None,
            presentation: Presentation::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordField {
    #[serde(flatten)]
    pub common: FieldCommon,
    /// Request a `<name>Confirm` companion field that must match.
    #[serde(default)]
    pub confirm_password: bool,
    #[serde(flatten)]
    pub presentation: Presentation,
}

impl PasswordField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            common: FieldCommon::new(name, label),
            confirm_password: false,
            presentation: Presentation::default(),
        }
    }

    pub fn with_confirmation(mut self) -> Self {
        self.confirm_password = true;
        self
    }
}

/// A field whose `"type"` tag the engine does not recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedField {
    /// The unrecognized tag, kept for diagnostics.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub common: FieldCommon,
}

/// Declarative description of one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDescriptor {
    Text(TextField),
    Select(SelectField),
    TextArea(TextAreaField),
    Password(PasswordField),
    /// Unrecognized field kind; compiled to a permissive fallback.
    Unsupported(UnsupportedField),
}

impl FieldDescriptor {
    /// Wire tag of this field kind.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Text(_) => "text",
            Self::Select(_) => "select",
            Self::TextArea(_) => "textarea",
            Self::Password(_) => "password",
            Self::Unsupported(f) => &f.kind,
        }
    }

    pub fn common(&self) -> &FieldCommon {
        match self {
            Self::Text(f) => &f.common,
            Self::Select(f) => &f.common,
            Self::TextArea(f) => &f.common,
            Self::Password(f) => &f.common,
            Self::Unsupported(f) => &f.common,
        }
    }

    fn common_mut(&mut self) -> &mut FieldCommon {
        match self {
            Self::Text(f) => &mut f.common,
            Self::Select(f) => &mut f.common,
            Self::TextArea(f) => &mut f.common,
            Self::Password(f) => &mut f.common,
            Self::Unsupported(f) => &mut f.common,
        }
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }

    pub fn label(&self) -> &str {
        &self.common().label
    }

    pub fn is_optional(&self) -> bool {
        self.common().optional
    }

    pub fn validations(&self) -> &[RuleDescriptor] {
        &self.common().validations
    }

    /// Mark the field as optional.
    pub fn optional(mut self) -> Self {
        self.common_mut().optional = true;
        self
    }

    /// Append a validation rule after any already declared.
    pub fn with_rule(mut self, rule: RuleDescriptor) -> Self {
        self.common_mut().validations.push(rule);
        self
    }
}

impl From<TextField> for FieldDescriptor {
    fn from(f: TextField) -> Self {
        Self::Text(f)
    }
}

impl From<SelectField> for FieldDescriptor {
    fn from(f: SelectField) -> Self {
        Self::Select(f)
    }
}

impl From<TextAreaField> for FieldDescriptor {
    fn from(f: TextAreaField) -> Self {
        Self::TextArea(f)
    }
}

impl From<PasswordField> for FieldDescriptor {
    fn from(f: PasswordField) -> Self {
        Self::Password(f)
    }
}

impl Serialize for FieldDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            Self::Text(f) => serde_json::to_value(f),
            Self::Select(f) => serde_json::to_value(f),
            Self::TextArea(f) => serde_json::to_value(f),
            Self::Password(f) => serde_json::to_value(f),
            // Already carries its own "type" key.
            Self::Unsupported(f) => return f.serialize(serializer),
        };
        let mut body = body.map_err(S::Error::custom)?;
        if let Value::Object(map) = &mut body {
            map.insert("type".into(), Value::String(self.kind_name().to_owned()));
        }
        body.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .ok_or_else(|| D::Error::missing_field("type"))?
            .as_str()
            .ok_or_else(|| D::Error::custom("field \"type\" must be a string"))?;

        let parsed = match kind {
            "text" => serde_json::from_value(value).map(Self::Text),
            "select" => serde_json::from_value(value).map(Self::Select),
            "textarea" => serde_json::from_value(value).map(Self::TextArea),
            "password" => serde_json::from_value(value).map(Self::Password),
            _ => serde_json::from_value(value).map(Self::Unsupported),
        };
        parsed.map_err(D::Error::custom)
    }
}

/// Raw, unchecked validation rule as authored.
///
/// The `value` shape is only verified when the schema is compiled; see
/// [`ValidationRule::parse`](crate::rules::ValidationRule::parse).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub message: String,
}

impl RuleDescriptor {
    /// A rule with a parameter, e.g. `min` with `8`.
    pub fn new(kind: impl Into<String>, value: impl Into<Value>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.into()),
            message: message.into(),
        }
    }

    /// A parameterless rule, e.g. `uppercase`.
    pub fn flag(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            message: message.into(),
        }
    }
}
