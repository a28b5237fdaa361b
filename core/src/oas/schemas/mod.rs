#![deny(missing_docs)]

//! # Schema Normalization
//!
//! Turns raw schema nodes into the flattened `SchemaType` / `SchemaField` model.
//!
//! Defines logic to:
//! - Classify a node into a closed set of kinds (see `SchemaNode`).
//! - Flatten `allOf` inheritance/composition into single types.
//! - Collect `oneOf` variants.
//! - Resolve `$ref` pointers, cutting cycles with a per-chain visited set.
//!
//! The visited set holds the pointers currently being expanded on the path from the root
//! call. Every branch removes its pointer when it returns, so sibling properties never
//! see each other's cycle state.

pub mod enums;
pub mod fields;
pub mod structs;

use crate::oas::models::SchemaType;
use crate::oas::ref_utils::{extract_type_name, resolve_ref, VisitedRefs};
use serde_json::{Map, Value};
use tracing::debug;

/// Shape of a raw schema node, resolved once before dispatch.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SchemaNode<'n> {
    /// `type: array`, with optional `items`.
    Array {
        items: Option<&'n Value>,
        schema: &'n Map<String, Value>,
    },
    /// `{ $ref: "#/..." }`
    Reference(&'n str),
    /// `allOf: [...]`
    AllOf {
        members: &'n [Value],
        schema: &'n Map<String, Value>,
    },
    /// `oneOf: [...]`
    OneOf {
        variants: &'n [Value],
        schema: &'n Map<String, Value>,
    },
    /// `type: object`, or untyped with `properties`.
    Object(&'n Map<String, Value>),
    /// Scalars and anything else carrying no structure.
    Leaf(&'n Map<String, Value>),
    /// Not a JSON object at all (`true`, `null`, ...).
    Opaque,
}

impl<'n> SchemaNode<'n> {
    /// Classifies a node. The order of checks sets precedence: array, reference,
    /// composition, union, object.
    pub(crate) fn classify(node: &'n Value) -> Self {
        let Value::Object(schema) = node else {
            return SchemaNode::Opaque;
        };
        let declared = declared_type(schema);

        if declared == Some("array") {
            return SchemaNode::Array {
                items: schema.get("items"),
                schema,
            };
        }
        if let Some(pointer) = schema.get("$ref").and_then(Value::as_str) {
            return SchemaNode::Reference(pointer);
        }
        if let Some(Value::Array(members)) = schema.get("allOf") {
            return SchemaNode::AllOf { members, schema };
        }
        if let Some(Value::Array(variants)) = schema.get("oneOf") {
            return SchemaNode::OneOf { variants, schema };
        }
        if declared == Some("object") || (declared.is_none() && schema.contains_key("properties"))
        {
            return SchemaNode::Object(schema);
        }
        SchemaNode::Leaf(schema)
    }
}

/// A normalized type together with its inferred name.
///
/// The name is `None` when neither a reference, a `title` nor an array wrapper supplies
/// one; the type itself is then called `Object`.
pub type Normalized = (Option<String>, SchemaType);

/// Walks schema nodes of a single document.
#[derive(Debug, Clone, Copy)]
pub struct SchemaNormalizer<'a> {
    root: &'a Value,
}

impl<'a> SchemaNormalizer<'a> {
    /// Creates a normalizer resolving references against `root`.
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// Normalizes a schema node into a type.
    ///
    /// Returns `None` when the node has no recognizable shape (scalars, unresolvable
    /// references). That is absence, not an error.
    pub fn normalize(&self, node: &Value, visited: &mut VisitedRefs) -> Option<Normalized> {
        self.normalize_named(node, None, visited)
    }

    /// Same as `normalize`, with a name to use when the node has no `title`.
    pub(crate) fn normalize_named(
        &self,
        node: &Value,
        hint: Option<&str>,
        visited: &mut VisitedRefs,
    ) -> Option<Normalized> {
        match SchemaNode::classify(node) {
            SchemaNode::Array { items, .. } => self.normalize_array(items?, visited),
            SchemaNode::Reference(pointer) => self.normalize_reference(pointer, visited),
            SchemaNode::AllOf { members, schema } => {
                Some(self.merge_all_of(members, schema, hint, visited))
            }
            SchemaNode::OneOf { variants, schema } => {
                Some(self.collect_variants(variants, schema, hint, visited))
            }
            SchemaNode::Object(schema) => Some(self.normalize_object(schema, hint, visited)),
            SchemaNode::Leaf(_) | SchemaNode::Opaque => None,
        }
    }

    /// Expands a `$ref`, re-tagging the result with the reference's own name.
    ///
    /// A pointer already on the current path yields a stub carrying only the name.
    pub(crate) fn normalize_reference(
        &self,
        pointer: &str,
        visited: &mut VisitedRefs,
    ) -> Option<Normalized> {
        let name = extract_type_name(pointer);
        if visited.contains(pointer) {
            debug!(pointer, "Reference already being expanded, emitting stub");
            return Some((Some(name.clone()), SchemaType::stub(name)));
        }

        visited.insert(pointer.to_string());
        let expanded = resolve_ref(pointer, self.root)
            .and_then(|resolved| self.normalize_named(resolved, Some(&name), visited));
        visited.remove(pointer);

        expanded.map(|(_, mut schema)| {
            schema.name = name.clone();
            (Some(name), schema)
        })
    }
}

/// Normalizes `node` against `root` with the given visited set.
///
/// Convenience wrapper over `SchemaNormalizer::normalize`.
pub fn normalize_schema(
    node: &Value,
    root: &Value,
    visited: &mut VisitedRefs,
) -> Option<Normalized> {
    SchemaNormalizer::new(root).normalize(node, visited)
}

/// Declared `type`. For OAS 3.1 type arrays, the first non-`null` entry.
pub(crate) fn declared_type(schema: &Map<String, Value>) -> Option<&str> {
    match schema.get("type")? {
        Value::String(s) => Some(s.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

pub(crate) fn description_of(schema: &Map<String, Value>) -> Option<String> {
    schema
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub(crate) fn declared_required(schema: &Map<String, Value>) -> impl Iterator<Item = String> + '_ {
    schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_string)
}

/// Caller hint (reference name or positional), then `title`.
pub(crate) fn inferred_name(schema: &Map<String, Value>, hint: Option<&str>) -> Option<String> {
    hint.or_else(|| schema.get("title").and_then(Value::as_str))
        .map(str::to_string)
}

/// `inferred_name`, falling back to `Object`.
pub(crate) fn type_name(schema: &Map<String, Value>, hint: Option<&str>) -> String {
    inferred_name(schema, hint).unwrap_or_else(|| "Object".to_string())
}
