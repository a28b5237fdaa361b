#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helper functions for deriving identifiers from OpenAPI paths and tags.

use regex::Regex;
use std::sync::OnceLock;

/// Derives an operation id from the HTTP method and URL path when `operationId` is missing.
///
/// Path parameter braces are stripped, the first segment stays as written and the
/// following ones get an upper-case first letter.
///
/// e.g. `get /pets/{petId}/owner` -> `getpetsPetIdOwner`
pub fn generate_operation_id(method: &str, path: &str) -> String {
    let clean_path = path.replace(['{', '}'], "");
    let joined: String = clean_path
        .split('/')
        .filter(|part| !part.is_empty())
        .enumerate()
        .map(|(i, part)| {
            if i == 0 {
                part.to_string()
            } else {
                capitalize_first(part)
            }
        })
        .collect();
    format!("{}{}", method, joined)
}

/// Converts a free-text tag into a PascalCase identifier.
///
/// Runs of non-alphanumeric characters act as word separators; each word gets an
/// upper-case first letter and keeps the rest of its casing.
///
/// e.g. `pet store-items` -> `PetStoreItems`, `NF instances (v2)` -> `NFInstancesV2`
pub fn to_pascal_case(s: &str) -> String {
    static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();
    let separator_re =
        SEPARATOR_RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]+").expect("Invalid regex"));

    separator_re
        .split(s)
        .filter(|word| !word.is_empty())
        .map(capitalize_first)
        .collect()
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
