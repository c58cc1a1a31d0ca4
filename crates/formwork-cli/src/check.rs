//! # Check Subcommand
//!
//! Loads and compiles a form definition, then prints the compiled field
//! table and any diagnostics raised during compilation.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use formwork_schema::{CompiledSchema, FormDefinition};

use crate::EXIT_OK;

/// Arguments for the `formwork check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Form definition file (.json, .yaml or .yml).
    #[arg(value_name = "FORM")]
    pub form: PathBuf,
}

/// Execute the check subcommand.
///
/// Returns exit code 0 when the form compiles. Load and compile failures are
/// returned as errors.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let form = FormDefinition::load(&args.form)
        .with_context(|| format!("failed to load form {}", args.form.display()))?;
    let schema = form
        .compile()
        .with_context(|| format!("failed to compile form {}", args.form.display()))?;

    tracing::info!(
        form = %args.form.display(),
        fields = schema.len(),
        diagnostics = schema.diagnostics().len(),
        "form compiled"
    );

    print!("{}", render_report(form.title.as_deref(), &schema));
    Ok(EXIT_OK)
}

/// Render the field table and diagnostics as plain text.
pub fn render_report(title: Option<&str>, schema: &CompiledSchema) -> String {
    let mut out = String::new();
    if let Some(title) = title {
        let _ = writeln!(out, "Form: {title}");
    }
    let _ = writeln!(out, "Fields: {}", schema.len());

    for (name, validator) in schema.fields() {
        let _ = write!(out, "  {name}: {}", validator.base().describe());
        if validator.is_optional() {
            out.push_str(" (optional)");
        }
        if !validator.rules().is_empty() {
            let rules: Vec<&str> = validator.rules().iter().map(|r| r.name()).collect();
            let _ = write!(out, " [{}]", rules.join(", "));
        }
        out.push('\n');
    }

    if schema.has_cross_field_check() {
        out.push_str("Cross-field: password confirmation\n");
    }

    if !schema.diagnostics().is_empty() {
        let _ = writeln!(out, "Diagnostics: {}", schema.diagnostics().len());
        for diagnostic in schema.diagnostics() {
            let _ = writeln!(out, "  WARN: {diagnostic}");
        }
    }
    out
}
