#![deny(missing_docs)]

//! # Routes Module
//!
//! Entry point for walking OpenAPI `paths`.
//! Produces one `Endpoint` per (path, method) in document declaration order.

pub mod naming;

use crate::oas::document::ApiDocument;
use crate::oas::models::{Endpoint, HttpMethod};
use crate::oas::routes::naming::generate_operation_id;
use serde_json::Value;

/// Extracts every operation under `paths`.
///
/// Methods are visited in the fixed order of `HttpMethod::ALL` within each path item.
/// Missing or empty `operationId`s are synthesized from method and path.
pub fn extract_endpoints(doc: &ApiDocument) -> Vec<Endpoint> {
    let Some(paths) = doc.paths() else {
        return Vec::new();
    };

    let mut endpoints = Vec::new();
    for (path, path_item) in paths {
        for method in HttpMethod::ALL {
            let Some(operation) = path_item.get(method.as_str()).filter(|op| op.is_object()) else {
                continue;
            };
            let operation_id = operation
                .get("operationId")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| generate_operation_id(method.as_str(), path));

            endpoints.push(Endpoint {
                operation_id,
                path: path.clone(),
                method,
            });
        }
    }
    endpoints
}

/// Looks up the operation object an endpoint was extracted from.
pub fn find_operation<'a>(doc: &'a ApiDocument, endpoint: &Endpoint) -> Option<&'a Value> {
    doc.paths()?
        .get(&endpoint.path)?
        .get(endpoint.method.as_str())
        .filter(|op| op.is_object())
}

/// Tags declared on an operation, in order. Non-string entries are ignored.
pub fn operation_tags(operation: &Value) -> Vec<&str> {
    operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}
