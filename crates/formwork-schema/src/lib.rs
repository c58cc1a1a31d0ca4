//! # formwork-schema — Form Schema Compiler
//!
//! Compiles a declarative, data-only list of form field descriptors into an
//! executable validator, then runs submitted records against it.
//!
//! ## Pipeline
//!
//! ```text
//! [FieldDescriptor] ─► base validator ─► rule folding ─► optionality ─┐
//!                                                                     ├─► CompiledSchema
//!                     password confirmation (virtual field + check) ──┘
//!
//! CompiledSchema + record ─► per-field checks ─► cross-field check ─► error formatting
//!                        ─► ValidationOutcome::{Success { data }, Failure { errors }}
//! ```
//!
//! - [`descriptor`] — the field descriptor model and its JSON/YAML wire format.
//! - [`base`] — kind-specific base checks.
//! - [`rules`] — rule parsing and ordered folding.
//! - [`confirm`] — password confirmation injection.
//! - [`schema`] — [`compile`] and [`CompiledSchema::validate`].
//! - [`format`] — reduction of violations to one message per field.
//! - [`cache`] — fingerprint-keyed reuse of compiled schemas.
//! - [`form`] — whole-form documents loaded from disk.
//!
//! ## Error Severity
//!
//! - Malformed definitions are a fatal [`CompileError`]: a select with no
//!   options, an unknown rule type, or a rule value of the wrong shape.
//! - Recoverable definition problems become [`Diagnostic`]s on the compiled
//!   schema: duplicate names, unknown field kinds, rules on non-string fields,
//!   and extra confirmation requests.
//! - Rejected submissions are data, never errors.
//!
//! ## Example
//!
//! ```
//! use formwork_schema::{compile, FieldDescriptor, PasswordField, TextField, TextKind};
//! use serde_json::json;
//!
//! let fields: Vec<FieldDescriptor> = vec![
//!     TextField::new("email", "Email").with_kind(TextKind::Email).into(),
//!     PasswordField::new("password", "Password").with_confirmation().into(),
//! ];
//! let schema = compile(&fields).unwrap();
//!
//! let record = json!({
//!     "email": "ada@example.com",
//!     "password": "Abcd1234",
//!     "passwordConfirm": "xxxx",
//! });
//! let outcome = schema.validate(record.as_object().unwrap());
//! assert_eq!(outcome.errors().unwrap()["passwordConfirm"], "passwords do not match");
//! ```

pub mod base;
pub mod cache;
pub mod confirm;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod form;
pub mod format;
pub mod rules;
pub mod schema;
pub mod validator;

pub use cache::{fingerprint, SchemaCache};
pub use confirm::{PasswordConfirmation, CONFIRM_SUFFIX};
pub use descriptor::{
    FieldCommon, FieldDescriptor, PasswordField, Presentation, RuleDescriptor, SelectField,
    SelectOption, TextAreaField, TextField, TextKind, UnsupportedField,
};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{CompileError, FormLoadError};
pub use form::FormDefinition;
pub use format::{FieldErrors, Violation};
pub use rules::{RuleKind, ValidationRule};
pub use schema::{compile, validate, CompiledSchema, CrossFieldCheck, ValidationOutcome, GENERAL_FIELD};
pub use validator::{messages, BaseCheck, FieldCheck, Validator};
