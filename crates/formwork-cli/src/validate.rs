//! # Validate Subcommand
//!
//! Validates one submitted record against a form definition and prints
//! either the sanitized data or the per-field error messages.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use formwork_schema::{FormDefinition, ValidationOutcome};

use crate::{load_record, EXIT_INVALID, EXIT_OK};

/// Arguments for the `formwork validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Form definition file (.json, .yaml or .yml).
    #[arg(value_name = "FORM")]
    pub form: PathBuf,

    /// Submitted record (a JSON or YAML object).
    #[arg(value_name = "RECORD")]
    pub record: PathBuf,

    /// Print the result object as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure. Operational
/// errors are returned as errors.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let form = FormDefinition::load(&args.form)
        .with_context(|| format!("failed to load form {}", args.form.display()))?;
    let schema = form
        .compile()
        .with_context(|| format!("failed to compile form {}", args.form.display()))?;
    let record = load_record(&args.record)?;

    let outcome = schema.validate(&record);
    tracing::info!(
        record = %args.record.display(),
        success = outcome.is_success(),
        "record validated"
    );

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&outcome).context("failed to serialize result")?;
        println!("{rendered}");
    } else {
        print!("{}", render_outcome(&outcome)?);
    }

    Ok(if outcome.is_success() {
        EXIT_OK
    } else {
        EXIT_INVALID
    })
}

/// Render an outcome as plain text: `OK` plus the data, or one
/// `field: message` line per error.
pub fn render_outcome(outcome: &ValidationOutcome) -> Result<String> {
    let mut out = String::new();
    match outcome {
        ValidationOutcome::Success { data } => {
            out.push_str("OK\n");
            let rendered = serde_json::to_string_pretty(data).context("failed to serialize data")?;
            out.push_str(&rendered);
            out.push('\n');
        }
        ValidationOutcome::Failure { errors } => {
            let _ = writeln!(out, "FAIL: {} field(s) rejected", errors.len());
            for (field, message) in errors {
                let _ = writeln!(out, "  {field}: {message}");
            }
        }
    }
    Ok(out)
}
