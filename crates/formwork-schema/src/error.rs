//! # Error Types
//!
//! Two failure classes exist at the library boundary:
//!
//! - [`CompileError`] — the form definition itself is malformed. Fatal at
//!   configuration time; schema construction aborts.
//! - [`FormLoadError`] — a form definition file could not be read or parsed.
//!
//! Rejected submissions are not errors. They are reported as data through
//! [`ValidationOutcome::Failure`](crate::ValidationOutcome::Failure).

use serde_json::Value;
use thiserror::Error;

/// A malformed form definition detected while compiling a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A select field declared no options.
    #[error("select field '{field}' must declare at least one option")]
    EmptySelect {
        /// Name of the offending field.
        field: String,
    },

    /// A validation rule names a type the engine does not know.
    #[error("field '{field}': unsupported validation type '{kind}'")]
    UnknownRule {
        /// Name of the field the rule is attached to.
        field: String,
        /// The unrecognized rule type tag.
        kind: String,
    },

    /// A validation rule's value has the wrong shape for its type.
    #[error("field '{field}': invalid value for validation '{kind}': expected {expected}, got {actual}")]
    RuleValueMismatch {
        /// Name of the field the rule is attached to.
        field: String,
        /// The rule type tag.
        kind: String,
        /// Shape the rule type requires.
        expected: &'static str,
        /// Shape actually supplied.
        actual: &'static str,
    },

    /// A `regex` rule carries a pattern that does not compile.
    #[error("field '{field}': invalid pattern for validation 'regex': {reason}")]
    InvalidPattern {
        /// Name of the field the rule is attached to.
        field: String,
        /// Compiler message from the regex engine.
        reason: String,
    },
}

impl CompileError {
    /// Name of the field whose definition is malformed.
    pub fn field(&self) -> &str {
        match self {
            Self::EmptySelect { field }
            | Self::UnknownRule { field, .. }
            | Self::RuleValueMismatch { field, .. }
            | Self::InvalidPattern { field, .. } => field,
        }
    }
}

/// Error while loading a form definition from disk or text.
#[derive(Error, Debug)]
pub enum FormLoadError {
    /// The file could not be read.
    #[error("cannot read form definition '{path}': {source}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The text is not a valid form definition.
    #[error("invalid form definition '{origin}': {reason}")]
    Parse {
        /// File path, or `<inline>` for in-memory text.
        origin: String,
        /// Parser message.
        reason: String,
    },
}

/// Returns the JSON type name used in shape-mismatch messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_u64() || n.is_i64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
