//! # Field Validator
//!
//! A [`Validator`] is the compiled, immutable check for one field: a base
//! check chosen by field kind, an ordered pipeline of rules, and a presence
//! policy. Evaluation short-circuits at the first failing step, so a field
//! contributes at most one message.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::json_type_name;
use crate::rules::ValidationRule;

/// Fixed messages produced by base checks and the confirmation constraint.
pub mod messages {
    pub const REQUIRED: &str = "required";
    pub const INVALID_EMAIL: &str = "invalid email format";
    pub const INVALID_PHONE: &str = "invalid phone format";
    pub const PASSWORD_REQUIRED: &str = "password is required";
    pub const INVALID_OPTION: &str = "please select a valid option";
    pub const CONFIRMATION_REQUIRED: &str = "password confirmation is required";
    pub const PASSWORDS_DO_NOT_MATCH: &str = "passwords do not match";
    /// Message reported under [`GENERAL_FIELD`](crate::GENERAL_FIELD) when
    /// validation hits an internal fault.
    pub const UNEXPECTED_FAULT: &str = "unexpected validation error";
}

const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$";
const PHONE_PATTERN: &str = r"^\+?[0-9\s\-()]+$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"))
}

/// Local part may not start with a dot nor contain consecutive dots.
pub(crate) fn is_email(s: &str) -> bool {
    !s.starts_with('.') && !s.contains("..") && email_regex().is_match(s)
}

pub(crate) fn is_phone(s: &str) -> bool {
    phone_regex().is_match(s)
}

/// Kind-specific check applied before any custom rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseCheck {
    /// Any string.
    AnyString,
    Email,
    Phone,
    /// Non-empty string.
    Password,
    /// Exactly this value.
    Literal(String),
    /// One of these values.
    OneOf(Vec<String>),
    /// Never fails. Fallback for unsupported field kinds.
    Permissive,
}

impl BaseCheck {
    /// Returns the string to feed into the rule pipeline, `None` when a
    /// permissive check admits a non-string value as-is, or the failure.
    fn admit<'v>(&self, value: &'v Value) -> Result<Option<&'v str>, String> {
        match self {
            Self::AnyString => expect_str(value).map(Some),
            Self::Email => match expect_str(value)? {
                s if is_email(s) => Ok(Some(s)),
                _ => Err(messages::INVALID_EMAIL.to_owned()),
            },
            Self::Phone => match expect_str(value)? {
                s if is_phone(s) => Ok(Some(s)),
                _ => Err(messages::INVALID_PHONE.to_owned()),
            },
            Self::Password => match expect_str(value)? {
                "" => Err(messages::PASSWORD_REQUIRED.to_owned()),
                s => Ok(Some(s)),
            },
            Self::Literal(expected) => match value.as_str() {
                Some(s) if s == expected => Ok(Some(s)),
                _ => Err(messages::INVALID_OPTION.to_owned()),
            },
            Self::OneOf(allowed) => match value.as_str() {
                Some(s) if allowed.iter().any(|a| a == s) => Ok(Some(s)),
                _ => Err(messages::INVALID_OPTION.to_owned()),
            },
            Self::Permissive => Ok(value.as_str()),
        }
    }

    /// Whether custom string rules may be chained onto this check.
    pub fn is_string_shaped(&self) -> bool {
        match self {
            Self::AnyString | Self::Email | Self::Phone | Self::Password | Self::Permissive => true,
            Self::Literal(_) | Self::OneOf(_) => false,
        }
    }

    /// Short human description, used by the CLI.
    pub fn describe(&self) -> String {
        match self {
            Self::AnyString => "string".into(),
            Self::Email => "email".into(),
            Self::Phone => "phone".into(),
            Self::Password => "non-empty string".into(),
            Self::Literal(v) => format!("literal {v:?}"),
            Self::OneOf(values) => format!("one of [{}]", values.join(", ")),
            Self::Permissive => "any value".into(),
        }
    }
}

fn expect_str(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected string, received {}", json_type_name(value)))
}

/// Result of checking one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCheck {
    /// Optional field not present in the record.
    Absent,
    /// Present and accepted, with its sanitized value.
    Valid(Value),
    /// Rejected, with the single message for this field.
    Invalid(String),
}

/// Compiled check for a single field.
#[derive(Debug, Clone)]
pub struct Validator {
    base: BaseCheck,
    rules: Vec<ValidationRule>,
    optional: bool,
    missing_message: &'static str,
}

impl Validator {
    pub fn new(base: BaseCheck) -> Self {
        Self {
            base,
            rules: Vec::new(),
            optional: false,
            missing_message: messages::REQUIRED,
        }
    }

    pub fn base(&self) -> &BaseCheck {
        &self.base
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether this validator accepts string rules. Optionality does not
    /// change the answer.
    pub fn is_string_shaped(&self) -> bool {
        self.base.is_string_shaped()
    }

    pub(crate) fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Waive the presence check. Declared rules still run on present values.
    pub(crate) fn into_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub(crate) fn with_missing_message(mut self, message: &'static str) -> Self {
        self.missing_message = message;
        self
    }

    /// Check a raw value. `None` means the key is absent from the record.
    pub fn check(&self, value: Option<&Value>) -> FieldCheck {
        let Some(value) = value else {
            return if self.optional {
                FieldCheck::Absent
            } else {
                FieldCheck::Invalid(self.missing_message.to_owned())
            };
        };

        let text = match self.base.admit(value) {
            Ok(Some(text)) => text,
            Ok(None) => return FieldCheck::Valid(value.clone()),
            Err(message) => return FieldCheck::Invalid(message),
        };

        let mut current = text.to_owned();
        for rule in &self.rules {
            match rule.evaluate(current) {
                Ok(next) => current = next,
                Err(()) => return FieldCheck::Invalid(rule.message().to_owned()),
            }
        }
        FieldCheck::Valid(Value::String(current))
    }
}
