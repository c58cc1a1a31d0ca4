//! # Password Confirmation
//!
//! The first password field marked `confirmPassword` gets a virtual required
//! companion named `<name>Confirm`. A [`CrossFieldCheck`] compares the raw
//! submitted values of the pair. Later marked fields are compiled as plain
//! password fields, and a [`DiagnosticKind::ConfirmationIgnored`] is recorded
//! for each.

use serde_json::{Map, Value};

use crate::descriptor::FieldDescriptor;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::format::Violation;
use crate::schema::CrossFieldCheck;
use crate::validator::{messages, BaseCheck, Validator};

/// Suffix appended to the password field name to form the companion name.
pub const CONFIRM_SUFFIX: &str = "Confirm";

/// Equality constraint between a password field and its companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordConfirmation {
    password_field: String,
    confirm_field: String,
}

impl PasswordConfirmation {
    pub fn for_field(password_field: &str) -> Self {
        Self {
            password_field: password_field.to_owned(),
            confirm_field: format!("{password_field}{CONFIRM_SUFFIX}"),
        }
    }

    pub fn password_field(&self) -> &str {
        &self.password_field
    }

    pub fn confirm_field(&self) -> &str {
        &self.confirm_field
    }

    /// Validator for the virtual companion: a required string, no rules.
    pub fn validator(&self) -> Validator {
        Validator::new(BaseCheck::AnyString).with_missing_message(messages::CONFIRMATION_REQUIRED)
    }
}

impl CrossFieldCheck for PasswordConfirmation {
    fn check(&self, record: &Map<String, Value>) -> Option<Violation> {
        let password = record.get(&self.password_field);
        let confirmation = record.get(&self.confirm_field);
        (password != confirmation)
            .then(|| Violation::new(&self.confirm_field, messages::PASSWORDS_DO_NOT_MATCH))
    }
}

/// Find the first password field requesting confirmation.
pub fn find_confirmation(
    descriptors: &[FieldDescriptor],
    diagnostics: &mut Diagnostics,
) -> Option<PasswordConfirmation> {
    let mut marked = descriptors.iter().filter_map(|descriptor| match descriptor {
        FieldDescriptor::Password(field) if field.confirm_password => Some(&field.common.name),
        FieldDescriptor::Password(_)
        | FieldDescriptor::Text(_)
        | FieldDescriptor::Select(_)
        | FieldDescriptor::TextArea(_)
        | FieldDescriptor::Unsupported(_) => None,
    });

    let first = marked.next()?;
    for ignored in marked {
        diagnostics.record(
            DiagnosticKind::ConfirmationIgnored,
            ignored,
            format!("only '{first}' gets a confirmation field; treated as a plain password"),
        );
    }
    Some(PasswordConfirmation::for_field(first))
}
