#![deny(missing_docs)]

//! # Validate Command
//!
//! Prints the duplicated-route report for an endpoints file. Never writes.

use grouper_core::oas::validation::{find_duplicates_in_json, render_report, DuplicateRoute};
use grouper_core::{AppError, AppResult};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the validate command.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Endpoints file produced by `parse`.
    #[clap(default_value = "endpoints.json", env = "OAS_GROUPER_ENDPOINTS")]
    pub file: PathBuf,

    /// Print the report as JSON instead of text.
    #[clap(long)]
    pub json: bool,
}

/// Executes the validation and prints the report to stdout.
pub fn execute(args: &ValidateArgs) -> AppResult<()> {
    info!(file = %args.file.display(), "Validating endpoints file");
    let duplicates = load_duplicates(args)?;
    print!("{}", format_report(&duplicates, args.json)?);
    Ok(())
}

fn load_duplicates(args: &ValidateArgs) -> AppResult<Vec<DuplicateRoute>> {
    let content = fs::read_to_string(&args.file).map_err(|e| {
        AppError::General(format!("Failed to read {:?}: {}", args.file, e))
    })?;
    find_duplicates_in_json(&content)
}

fn format_report(duplicates: &[DuplicateRoute], json: bool) -> AppResult<String> {
    if !json {
        return Ok(render_report(duplicates));
    }
    let mut out = serde_json::to_string_pretty(duplicates)
        .map_err(|e| AppError::General(format!("Failed to serialize report: {}", e)))?;
    out.push('\n');
    Ok(out)
}
