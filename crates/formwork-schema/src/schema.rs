//! # Schema Assembly & Validation
//!
//! [`compile`] turns a descriptor list into an immutable [`CompiledSchema`].
//! For each descriptor it builds the base validator, folds on the declared
//! rules and applies optionality. It then wires in the password confirmation
//! constraint, if one was requested.
//!
//! [`CompiledSchema::validate`] runs a submitted record against the schema.
//! It evaluates every field, without stopping at the first failing field. It
//! then applies the cross-field check and returns either the sanitized data or
//! a field-keyed error map.
//!
//! ## Thread Safety
//!
//! `CompiledSchema` is `Send + Sync` and never mutated after construction. A
//! single instance can serve any number of concurrent `validate` calls.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::base::base_validator;
use crate::confirm::find_confirmation;
use crate::descriptor::FieldDescriptor;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::CompileError;
use crate::format::{format_errors, FieldErrors, Violation};
use crate::rules::apply_rules;
use crate::validator::{messages, FieldCheck, Validator};

/// Error key used when validation is aborted by an internal fault.
pub const GENERAL_FIELD: &str = "general";

/// A constraint spanning several fields of a record.
pub trait CrossFieldCheck: fmt::Debug + Send + Sync {
    /// Inspect the raw record. Returns the violation to report, if any.
    fn check(&self, record: &Map<String, Value>) -> Option<Violation>;
}

/// Executable form schema.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    fields: BTreeMap<String, Validator>,
    cross_field: Option<Arc<dyn CrossFieldCheck>>,
    diagnostics: Vec<Diagnostic>,
}

/// Compile a descriptor list into a schema.
///
/// Compilation is pure: equal descriptor lists always yield schemas with
/// identical validation behavior.
///
/// # Errors
///
/// Returns [`CompileError`] when a select field has no options, or when a
/// validation rule has an unknown type or a value of the wrong shape.
pub fn compile(descriptors: &[FieldDescriptor]) -> Result<CompiledSchema, CompileError> {
    let mut diagnostics = Diagnostics::new();

    let fields = descriptors
        .iter()
        .try_fold(BTreeMap::new(), |fields, descriptor| {
            let validator = compile_field(descriptor, &mut diagnostics)?;
            Ok(insert_field(fields, descriptor.name(), validator, &mut diagnostics))
        })?;

    let (fields, cross_field) = match find_confirmation(descriptors, &mut diagnostics) {
        Some(confirmation) => {
            let fields = insert_field(
                fields,
                confirmation.confirm_field(),
                confirmation.validator(),
                &mut diagnostics,
            );
            let check: Arc<dyn CrossFieldCheck> = Arc::new(confirmation);
            (fields, Some(check))
        }
        None => (fields, None),
    };

    tracing::debug!(
        fields = fields.len(),
        cross_field = cross_field.is_some(),
        diagnostics = diagnostics.len(),
        "compiled form schema"
    );

    Ok(CompiledSchema {
        fields,
        cross_field,
        diagnostics: diagnostics.into_vec(),
    })
}

fn compile_field(
    descriptor: &FieldDescriptor,
    diagnostics: &mut Diagnostics,
) -> Result<Validator, CompileError> {
    let base = base_validator(descriptor, diagnostics)?;
    let validator = apply_rules(descriptor.name(), base, descriptor.validations(), diagnostics)?;
    Ok(if descriptor.is_optional() {
        validator.into_optional()
    } else {
        validator
    })
}

fn insert_field(
    mut fields: BTreeMap<String, Validator>,
    name: &str,
    validator: Validator,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, Validator> {
    if fields.insert(name.to_owned(), validator).is_some() {
        diagnostics.record(
            DiagnosticKind::DuplicateField,
            name,
            "field declared more than once; the later declaration wins",
        );
    }
    fields
}

impl CompiledSchema {
    /// Validator for a field, including the virtual confirmation field.
    pub fn field(&self, name: &str) -> Option<&Validator> {
        self.fields.get(name)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Validator)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_cross_field_check(&self) -> bool {
        self.cross_field.is_some()
    }

    /// Recoverable problems found during compilation, in discovery order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Validate a submitted record.
    ///
    /// Never panics and never returns an error for rejected input. An
    /// internal fault during evaluation is logged and reported as a failure
    /// keyed by [`GENERAL_FIELD`].
    pub fn validate(&self, record: &Map<String, Value>) -> ValidationOutcome {
        match panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(record))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                tracing::error!(reason = %panic_reason(payload.as_ref()), "validation aborted by internal fault");
                ValidationOutcome::fault()
            }
        }
    }

    fn evaluate(&self, record: &Map<String, Value>) -> ValidationOutcome {
        let mut data = Map::new();
        let mut violations = Vec::new();

        for (name, validator) in &self.fields {
            match validator.check(record.get(name)) {
                FieldCheck::Absent => {}
                FieldCheck::Valid(value) => {
                    data.insert(name.clone(), value);
                }
                FieldCheck::Invalid(message) => violations.push(Violation::new(name, message)),
            }
        }

        if let Some(check) = &self.cross_field {
            violations.extend(check.check(record));
        }

        let errors = format_errors(violations);
        if errors.is_empty() {
            ValidationOutcome::Success { data }
        } else {
            tracing::debug!(errors = errors.len(), "record rejected");
            ValidationOutcome::Failure { errors }
        }
    }
}

/// Free-function form of [`CompiledSchema::validate`].
pub fn validate(schema: &CompiledSchema, record: &Map<String, Value>) -> ValidationOutcome {
    schema.validate(record)
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

/// Result of validating one record.
///
/// Serializes as `{"success": true, "data": {...}}` or
/// `{"success": false, "errors": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Every field passed. Holds the sanitized value of each present field.
    Success { data: Map<String, Value> },
    /// At least one field failed. Holds one message per failing field.
    Failure { errors: FieldErrors },
}

impl ValidationOutcome {
    fn fault() -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(GENERAL_FIELD.to_owned(), messages::UNEXPECTED_FAULT.to_owned());
        Self::Failure { errors }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { errors } => Some(errors),
        }
    }
}

impl Serialize for ValidationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationOutcome", 2)?;
        match self {
            Self::Success { data } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure { errors } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("errors", errors)?;
            }
        }
        state.end()
    }
}
