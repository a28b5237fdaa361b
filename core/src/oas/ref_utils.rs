#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Resolves internal `$ref` pointers (`#/components/schemas/Pet`) against the document tree.
//!
//! These utilities never fetch external documents: anything that is not a local
//! fragment pointer is reported as unresolvable.

use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Set of pointer strings already seen along one resolution chain.
pub type VisitedRefs = HashSet<String>;

/// Returns the `$ref` string of a node, if it is a reference object.
pub fn ref_of(node: &Value) -> Option<&str> {
    node.get("$ref").and_then(Value::as_str)
}

/// Resolves `pointer` against `root`, following chained references.
///
/// Returns `None` when the pointer is external, malformed, or any segment is missing.
/// When the chase meets a pointer already present in `visited`, the node reached at that
/// point is returned as-is (usually itself a reference) instead of recursing again.
pub fn resolve_pointer<'a>(
    pointer: &str,
    root: &'a Value,
    visited: &mut VisitedRefs,
) -> Option<&'a Value> {
    let Some(path) = pointer.strip_prefix("#/") else {
        if pointer == "#" {
            return Some(root);
        }
        warn!(pointer, "External or malformed reference not supported");
        return None;
    };

    let mut current = root;
    for raw in path.split('/') {
        let segment = decode_pointer_segment(raw);
        let next = match current {
            Value::Object(map) => map.get(&segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(node) => current = node,
            None => {
                warn!(pointer, segment = %segment, "Could not resolve reference segment");
                return None;
            }
        }
    }

    if !visited.insert(pointer.to_string()) {
        warn!(pointer, "Circular reference detected");
        return Some(current);
    }

    match ref_of(current) {
        Some(next) => resolve_pointer(next, root, visited),
        None => Some(current),
    }
}

/// Resolves a pointer with a fresh chase set.
pub fn resolve_ref<'a>(pointer: &str, root: &'a Value) -> Option<&'a Value> {
    resolve_pointer(pointer, root, &mut VisitedRefs::new())
}

/// Extracts the simple name from a reference string.
/// e.g. `#/components/schemas/User` -> `User`
pub fn extract_type_name(pointer: &str) -> String {
    let last = pointer.rsplit('/').next().unwrap_or(pointer);
    decode_pointer_segment(last)
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}
