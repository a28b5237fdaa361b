//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Unresolvable or circular `$ref` pointers are not errors: the resolver logs them
//! and the normalizer degrades to absence or a stub.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A single input document could not be read or parsed.
    /// The batch skips the document and continues.
    #[from(ignore)]
    #[display("Document Error ({path}): {message}")]
    Document {
        /// Source location of the document (file path or a caller label).
        path: String,
        /// Human readable cause.
        message: String,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Builds a `Document` error for the given source label.
    pub fn document(path: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Document {
            path: path.into(),
            message: message.into(),
        }
    }
}
