#![deny(missing_docs)]

//! # OpenAPI Document Loading
//!
//! Reads a description document (JSON or YAML) into an order-preserving JSON tree.
//!
//! The tree stays untyped: `$ref` pointers address arbitrary nodes, so resolution walks
//! `serde_json::Value` directly rather than a typed OpenAPI model.

use crate::error::{AppError, AppResult};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Serialization format of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl DocumentFormat {
    /// Detects the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }
}

/// A parsed description document.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDocument {
    /// Where the document came from, used in log lines and errors.
    pub source: String,
    /// The document root.
    pub root: Value,
}

impl ApiDocument {
    /// Parses document text and checks that it declares an OpenAPI or Swagger version.
    pub fn parse(source: impl Into<String>, content: &str, format: DocumentFormat) -> AppResult<Self> {
        let source = source.into();
        let root: Value = match format {
            DocumentFormat::Json => serde_json::from_str(content)
                .map_err(|e| AppError::document(&source, format!("Invalid JSON: {}", e)))?,
            DocumentFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| AppError::document(&source, format!("Invalid YAML: {}", e)))?,
        };
        validate_version(&source, &root)?;
        Ok(Self { source, root })
    }

    /// Reads and parses the file at `path`, picking the format from its extension.
    pub fn load(path: &Path) -> AppResult<Self> {
        let source = path.display().to_string();
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| AppError::document(&source, "Unsupported file extension"))?;
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::document(&source, format!("Failed to read: {}", e)))?;
        Self::parse(source, &content, format)
    }

    /// The `paths` object, if any.
    pub fn paths(&self) -> Option<&serde_json::Map<String, Value>> {
        self.root.get("paths").and_then(Value::as_object)
    }
}

fn validate_version(source: &str, root: &Value) -> AppResult<()> {
    if let Some(version) = root.get("openapi") {
        return match version_text(version) {
            Some(v) if v.starts_with("3.") => Ok(()),
            _ => Err(AppError::document(
                source,
                format!(
                    "Unsupported OpenAPI version: {}. Only 3.x is supported.",
                    version
                ),
            )),
        };
    }
    if let Some(version) = root.get("swagger") {
        return match version_text(version) {
            Some(v) if v.starts_with("2.") => Ok(()),
            _ => Err(AppError::document(
                source,
                format!("Unsupported Swagger version: {}. Only 2.0 is supported.", version),
            )),
        };
    }
    Err(AppError::document(
        source,
        "Invalid OpenAPI document: missing 'openapi' or 'swagger' version field.",
    ))
}

/// Unquoted YAML versions such as `swagger: 2.0` arrive as numbers.
fn version_text(version: &Value) -> Option<String> {
    match version {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
