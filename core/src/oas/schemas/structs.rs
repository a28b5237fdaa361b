#![deny(missing_docs)]

//! # Struct Flattening
//!
//! Type-level handling of objects, arrays, and `allOf` compositions.

use crate::oas::models::{SchemaField, SchemaType};
use crate::oas::ref_utils::{ref_of, resolve_ref, VisitedRefs};
use crate::oas::schemas::{
    declared_required, description_of, inferred_name, type_name, Normalized, SchemaNormalizer,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

impl SchemaNormalizer<'_> {
    /// Object with declared properties and required list.
    pub(crate) fn normalize_object(
        &self,
        schema: &Map<String, Value>,
        hint: Option<&str>,
        visited: &mut VisitedRefs,
    ) -> Normalized {
        let mut ty = self.empty_type(schema, hint);
        self.merge_properties(schema, &mut ty.fields, visited);
        ty.reconcile_required();
        (inferred_name(schema, hint), ty)
    }

    /// Wraps the element type as the `items` field of an `Array<Item>` type.
    ///
    /// Always named: an element without an inferred name shows up as `Array<any>`.
    pub(crate) fn normalize_array(
        &self,
        items: &Value,
        visited: &mut VisitedRefs,
    ) -> Option<Normalized> {
        let (item_name, item) = self.normalize_named(items, None, visited)?;
        let name = format!("Array<{}>", item_name.as_deref().unwrap_or("any"));

        let mut wrapper = SchemaType::stub(format!("Array<{}>", item.name));
        let element = SchemaField::object(item.name, item.fields).with_description(item.description);
        wrapper
            .fields
            .insert("items".to_string(), SchemaField::array("items", element));
        Some((Some(name), wrapper))
    }

    /// Merge-by-union over `allOf` members, then the properties declared alongside.
    ///
    /// Field collisions resolve last-write-wins in member order. Members whose reference
    /// is already being expanded are skipped.
    pub(crate) fn merge_all_of(
        &self,
        members: &[Value],
        schema: &Map<String, Value>,
        hint: Option<&str>,
        visited: &mut VisitedRefs,
    ) -> Normalized {
        let mut merged = self.empty_type(schema, hint);

        for member in members {
            let part = match ref_of(member) {
                Some(pointer) if visited.contains(pointer) => {
                    debug!(pointer, "Skipping allOf member already being expanded");
                    continue;
                }
                Some(pointer) => {
                    visited.insert(pointer.to_string());
                    let part = resolve_ref(pointer, self.root)
                        .and_then(|resolved| self.normalize_named(resolved, None, visited));
                    visited.remove(pointer);
                    part
                }
                None => self.normalize_named(member, None, visited),
            };

            if let Some((_, part)) = part {
                merged.fields.extend(part.fields);
                merged.required.extend(part.required);
            }
        }

        self.merge_properties(schema, &mut merged.fields, visited);
        merged.reconcile_required();
        (inferred_name(schema, hint), merged)
    }

    /// Normalizes each entry of `properties` into `fields`, overwriting existing keys.
    /// Unresolvable properties are left out.
    pub(crate) fn merge_properties(
        &self,
        schema: &Map<String, Value>,
        fields: &mut IndexMap<String, SchemaField>,
        visited: &mut VisitedRefs,
    ) {
        let Some(Value::Object(properties)) = schema.get("properties") else {
            return;
        };
        for (prop_name, prop_schema) in properties {
            if let Some(field) = self.normalize_field(prop_name, prop_schema, visited) {
                fields.insert(prop_name.clone(), field);
            }
        }
    }

    pub(super) fn empty_type(&self, schema: &Map<String, Value>, hint: Option<&str>) -> SchemaType {
        let mut ty = SchemaType::stub(type_name(schema, hint));
        ty.description = description_of(schema);
        ty.required.extend(declared_required(schema));
        ty
    }
}
