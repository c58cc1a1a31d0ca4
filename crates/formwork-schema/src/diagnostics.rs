//! # Compile Diagnostics
//!
//! Recoverable problems found while compiling a form definition. They never
//! abort compilation. They are collected in discovery order and returned with
//! the [`CompiledSchema`](crate::CompiledSchema), so the caller picks the
//! sink. Each one is also emitted as a `tracing` warning when recorded.

use std::fmt;

use serde::Serialize;

/// Category of a recoverable compile-time problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Two fields share a name; the later declaration replaced the earlier.
    DuplicateField,
    /// Unknown field kind; a permissive validator was substituted.
    UnsupportedFieldKind,
    /// A string rule was attached to a non-string field and ignored.
    RuleSkipped,
    /// A second `confirmPassword` field; only the first is wired.
    ConfirmationIgnored,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateField => "duplicate_field",
            Self::UnsupportedFieldKind => "unsupported_field_kind",
            Self::RuleSkipped => "rule_skipped",
            Self::ConfirmationIgnored => "confirmation_ignored",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recoverable problem, attached to the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub field: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.field, self.message)
    }
}

/// Ordered collection of diagnostics for one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a warning event.
    pub fn record(&mut self, kind: DiagnosticKind, field: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = %kind, field, "{message}");
        self.entries.push(Diagnostic {
            kind,
            field: field.to_owned(),
            message,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
