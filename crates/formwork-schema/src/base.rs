//! # Base Validator Builder
//!
//! Maps a field's kind to its minimal [`Validator`], before custom rules.
//!
//! | Kind                | Base check                                  |
//! |---------------------|---------------------------------------------|
//! | text (plain)        | any string                                  |
//! | text (email)        | email address                               |
//! | text (phone)        | `+`? then digits, spaces, hyphens, parens   |
//! | password            | non-empty string                            |
//! | select (1 option)   | equals that option's value                  |
//! | select (n options)  | one of the option values                    |
//! | textarea            | any string                                  |
//! | unsupported         | never fails (diagnostic recorded)           |

use crate::descriptor::{FieldDescriptor, SelectField, TextKind};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::CompileError;
use crate::validator::{BaseCheck, Validator};

/// Build the base validator for one descriptor.
///
/// # Errors
///
/// Returns [`CompileError::EmptySelect`] for a select field with no options.
pub fn base_validator(
    descriptor: &FieldDescriptor,
    diagnostics: &mut Diagnostics,
) -> Result<Validator, CompileError> {
    let check = match descriptor {
        FieldDescriptor::Text(field) => text_check(field.input_type),
        FieldDescriptor::Select(field) => select_check(field)?,
        FieldDescriptor::TextArea(_) => BaseCheck::AnyString,
        FieldDescriptor::Password(_) => BaseCheck::Password,
        FieldDescriptor::Unsupported(field) => {
            diagnostics.record(
                DiagnosticKind::UnsupportedFieldKind,
                &field.common.name,
                format!("unsupported field type '{}'; accepting any value", field.kind),
            );
            BaseCheck::Permissive
        }
    };
    Ok(Validator::new(check))
}

fn text_check(kind: TextKind) -> BaseCheck {
    match kind {
        TextKind::Plain => BaseCheck::AnyString,
        TextKind::Email => BaseCheck::Email,
        TextKind::Phone => BaseCheck::Phone,
    }
}

fn select_check(field: &SelectField) -> Result<BaseCheck, CompileError> {
    let mut values = field.options.iter().map(|o| o.value.clone());
    match (values.next(), field.options.len()) {
        (None, _) => Err(CompileError::EmptySelect {
            field: field.common.name.clone(),
        }),
        (Some(only), 1) => Ok(BaseCheck::Literal(only)),
        (Some(first), _) => Ok(BaseCheck::OneOf(std::iter::once(first).chain(values).collect())),
    }
}
