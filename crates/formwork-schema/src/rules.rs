//! # Rule Applier
//!
//! Parses authored [`RuleDescriptor`]s into typed [`ValidationRule`]s and
//! folds them, in declared order, onto a base [`Validator`].
//!
//! Severity is asymmetric:
//!
//! - An unknown rule type, or a value of the wrong shape, is a fatal
//!   [`CompileError`]. The definition is malformed.
//! - A well-formed rule attached to a non-string field is skipped with a
//!   [`DiagnosticKind::RuleSkipped`] diagnostic.

use regex::Regex;
use serde_json::Value;

use crate::descriptor::RuleDescriptor;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{json_type_name, CompileError};
use crate::validator::Validator;

/// Typed constraint on a string value.
///
/// Lengths count Unicode scalar values, so `"😀"` has length 1.
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Length in characters must be at least `n`.
    Min(usize),
    /// Length in characters must be at most `n`.
    Max(usize),
    /// Length in characters must be exactly `n`.
    Length(usize),
    /// Must match in full. The pattern is stored anchored.
    ///
    /// Patterns use the `regex` crate syntax, which has no lookaround and no
    /// backreferences.
    Regex(Regex),
    StartsWith(String),
    EndsWith(String),
    Includes(String),
    /// Must equal its own upper-cased form.
    Uppercase,
    /// Must equal its own lower-cased form.
    Lowercase,
}

/// A parsed rule with its failure message.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    kind: RuleKind,
    message: String,
}

impl ValidationRule {
    /// Parse an authored rule for the field named `field`.
    ///
    /// # Errors
    ///
    /// - [`CompileError::UnknownRule`] for an unrecognized `type`.
    /// - [`CompileError::RuleValueMismatch`] when `value` has the wrong shape.
    /// - [`CompileError::InvalidPattern`] when a `regex` pattern does not compile.
    pub fn parse(field: &str, raw: &RuleDescriptor) -> Result<Self, CompileError> {
        let kind = match raw.kind.as_str() {
            "min" => RuleKind::Min(length_param(field, raw)?),
            "max" => RuleKind::Max(length_param(field, raw)?),
            "length" => RuleKind::Length(length_param(field, raw)?),
            "regex" => {
                let pattern = string_param(field, raw)?;
                let anchored = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
                    CompileError::InvalidPattern {
                        field: field.to_owned(),
                        reason: e.to_string(),
                    }
                })?;
                RuleKind::Regex(anchored)
            }
            "startsWith" | "startWith" => RuleKind::StartsWith(string_param(field, raw)?),
            "endsWith" | "endWith" => RuleKind::EndsWith(string_param(field, raw)?),
            "includes" => RuleKind::Includes(string_param(field, raw)?),
            "uppercase" => RuleKind::Uppercase,
            "lowercase" => RuleKind::Lowercase,
            other => {
                return Err(CompileError::UnknownRule {
                    field: field.to_owned(),
                    kind: other.to_owned(),
                })
            }
        };
        Ok(Self {
            kind,
            message: raw.message.clone(),
        })
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Canonical wire name of this rule.
    pub fn name(&self) -> &'static str {
        match self.kind {
            RuleKind::Min(_) => "min",
            RuleKind::Max(_) => "max",
            RuleKind::Length(_) => "length",
            RuleKind::Regex(_) => "regex",
            RuleKind::StartsWith(_) => "startsWith",
            RuleKind::EndsWith(_) => "endsWith",
            RuleKind::Includes(_) => "includes",
            RuleKind::Uppercase => "uppercase",
            RuleKind::Lowercase => "lowercase",
        }
    }

    /// Evaluate against `value`, returning the (possibly transformed) value
    /// to pass to the next rule.
    pub(crate) fn evaluate(&self, value: String) -> Result<String, ()> {
        let ok = match &self.kind {
            RuleKind::Min(n) => value.chars().count() >= *n,
            RuleKind::Max(n) => value.chars().count() <= *n,
            RuleKind::Length(n) => value.chars().count() == *n,
            RuleKind::Regex(re) => re.is_match(&value),
            RuleKind::StartsWith(s) => value.starts_with(s.as_str()),
            RuleKind::EndsWith(s) => value.ends_with(s.as_str()),
            RuleKind::Includes(s) => value.contains(s.as_str()),
            RuleKind::Uppercase => {
                let upper = value.to_uppercase();
                return if upper == value { Ok(upper) } else { Err(()) };
            }
            RuleKind::Lowercase => {
                let lower = value.to_lowercase();
                return if lower == value { Ok(lower) } else { Err(()) };
            }
        };
        if ok {
            Ok(value)
        } else {
            Err(())
        }
    }
}

/// Accepts integers and integral floats such as `8.0`.
fn length_param(field: &str, raw: &RuleDescriptor) -> Result<usize, CompileError> {
    raw.value
        .as_ref()
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().and_then(integral_f64)))
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| mismatch(field, raw, "non-negative integer"))
}

fn integral_f64(n: f64) -> Option<u64> {
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64).then_some(n as u64)
}

fn string_param(field: &str, raw: &RuleDescriptor) -> Result<String, CompileError> {
    raw.value
        .as_ref()
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| mismatch(field, raw, "string"))
}

fn mismatch(field: &str, raw: &RuleDescriptor, expected: &'static str) -> CompileError {
    CompileError::RuleValueMismatch {
        field: field.to_owned(),
        kind: raw.kind.clone(),
        expected,
        actual: raw.value.as_ref().map_or("missing", json_type_name),
    }
}

/// Fold a single parsed rule onto `validator`.
///
/// Non-string validators are returned unchanged, and a diagnostic is recorded.
pub fn apply_rule(
    field: &str,
    validator: Validator,
    rule: ValidationRule,
    diagnostics: &mut Diagnostics,
) -> Validator {
    if !validator.is_string_shaped() {
        diagnostics.record(
            DiagnosticKind::RuleSkipped,
            field,
            format!(
                "validation '{}' applies only to string fields; skipped",
                rule.name()
            ),
        );
        return validator;
    }
    validator.with_rule(rule)
}

/// Parse and fold every authored rule onto `base`, in declared order.
///
/// # Errors
///
/// Returns the first [`CompileError`] raised while parsing a rule.
pub fn apply_rules(
    field: &str,
    base: Validator,
    rules: &[RuleDescriptor],
    diagnostics: &mut Diagnostics,
) -> Result<Validator, CompileError> {
    rules.iter().try_fold(base, |validator, raw| {
        let rule = ValidationRule::parse(field, raw)?;
        Ok(apply_rule(field, validator, rule, diagnostics))
    })
}
