//! # Error Formatter
//!
//! Reduces raw violations into one message per field. Per-field checks
//! already stop at their first failing step, so collisions only arise when the
//! cross-field check targets a field that also failed on its own. Later
//! violations overwrite earlier ones, so the cross-field message wins.

use std::collections::BTreeMap;
use std::fmt;

/// Field name → message map returned on a failed validation.
pub type FieldErrors = BTreeMap<String, String>;

/// A single rejected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collapse violations into a field-keyed map, last message per field wins.
pub fn format_errors(violations: impl IntoIterator<Item = Violation>) -> FieldErrors {
    violations
        .into_iter()
        .map(|v| (v.field, v.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_entry_per_field() {
        let errors = format_errors([
            Violation::new("email", "invalid email format"),
            Violation::new("age", "required"),
        ]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["email"], "invalid email format");
    }

    #[test]
    fn test_later_violation_overwrites() {
        let errors = format_errors([
            Violation::new("passwordConfirm", "required"),
            Violation::new("passwordConfirm", "passwords do not match"),
        ]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["passwordConfirm"], "passwords do not match");
    }

    #[test]
    fn test_empty() {
        assert!(format_errors(Vec::new()).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Violation::new("role", "bad").to_string(), "role: bad");
    }
}
