#![deny(missing_docs)]

//! # Parse Command
//!
//! Implements the pipeline: input directory -> documents -> tag groups -> JSON artifact.
//!
//! 1. **Discovery**: Recursively collects `.json`, `.yaml` and `.yml` files.
//! 2. **Grouping**: Each document is parsed and fed to one shared `EndpointGrouper`.
//!    A document that fails to load is logged and skipped.
//! 3. **Output**: The grouped endpoints are written as pretty-printed JSON.

use grouper_core::oas::{ApiDocument, DocumentFormat, EndpointGrouper, GrouperConfig};
use grouper_core::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Arguments for the parse command.
#[derive(clap::Args, Debug, Clone)]
pub struct ParseArgs {
    /// Directory containing OpenAPI documents (searched recursively).
    pub input_dir: PathBuf,

    /// Output path for the grouped endpoints.
    #[clap(default_value = "endpoints.json", env = "OAS_GROUPER_OUTPUT")]
    pub output: PathBuf,

    /// Additional tag marker to exclude (case-insensitive substring). Repeatable.
    #[clap(long)]
    pub exclude_tag: Vec<String>,
}

/// Executes the parse pipeline.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &ParseArgs) -> AppResult<()> {
    let files = discover_documents(&args.input_dir);
    if files.is_empty() {
        return Err(AppError::General(format!(
            "No OpenAPI specification files found in {:?}",
            args.input_dir
        )));
    }
    info!(count = files.len(), "Found OpenAPI specification files");

    let config = GrouperConfig::default().with_extra_markers(&args.exclude_tag);
    let mut grouper = EndpointGrouper::new(config);
    let mut skipped = 0usize;

    for file in &files {
        info!(file = %file.display(), "Processing");
        match ApiDocument::load(file) {
            Ok(doc) => {
                let extracted = grouper.add_document(&doc);
                info!(file = %file.display(), endpoints = extracted, "Extracted endpoints");
            }
            Err(e) => {
                warn!(error = %e, "Skipping document");
                skipped += 1;
            }
        }
    }

    let grouped = grouper.finish();
    let json = serde_json::to_string_pretty(&grouped)
        .map_err(|e| AppError::General(format!("Failed to serialize endpoints: {}", e)))?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.output, json)?;

    info!(
        documents = files.len() - skipped,
        endpoints = grouped.total_endpoints(),
        tags = grouped.len(),
        skipped,
        output = %args.output.display(),
        "Successfully extracted endpoints"
    );
    Ok(())
}

/// Files with a supported extension under `dir`, sorted by path.
fn discover_documents(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| DocumentFormat::from_path(path).is_some())
        .collect()
}
