#![deny(missing_docs)]

//! # Field Normalization
//!
//! Builds a `SchemaField` from a property schema. Mirrors the type-level dispatch but keeps
//! nested structure inline instead of producing named types.

use crate::oas::models::{AdditionalProperties, FieldType, SchemaField};
use crate::oas::ref_utils::{extract_type_name, ref_of, resolve_ref, VisitedRefs};
use crate::oas::schemas::{
    declared_required, declared_type, description_of, SchemaNode, SchemaNormalizer,
};
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use tracing::debug;

impl SchemaNormalizer<'_> {
    /// Normalizes one property. Returns `None` only when a reference cannot be resolved.
    pub fn normalize_field(
        &self,
        name: &str,
        node: &Value,
        visited: &mut VisitedRefs,
    ) -> Option<SchemaField> {
        let field = match SchemaNode::classify(node) {
            SchemaNode::Reference(pointer) => {
                return self.field_from_reference(name, pointer, node, visited);
            }
            SchemaNode::Array { items, schema } => {
                let element = items
                    .and_then(|items| self.normalize_field("items", items, visited))
                    .unwrap_or_else(|| SchemaField::object("items", IndexMap::new()));
                self.annotate(SchemaField::array(name, element), schema, visited)
            }
            SchemaNode::AllOf { members, schema } => {
                let merged = self.merge_field_members(name, members, schema, visited);
                self.annotate(merged, schema, visited)
            }
            SchemaNode::OneOf { variants, schema } => {
                let members = variants
                    .iter()
                    .enumerate()
                    .filter_map(|(index, variant)| {
                        self.normalize_field(&format!("{}_variant_{}", name, index), variant, visited)
                    })
                    .collect();
                self.annotate(SchemaField::union(name, members), schema, visited)
            }
            SchemaNode::Object(schema) => {
                let mut properties = IndexMap::new();
                self.merge_properties(schema, &mut properties, visited);
                let required: IndexSet<String> = declared_required(schema).collect();
                mark_required(&mut properties, &required);
                self.annotate(SchemaField::object(name, properties), schema, visited)
            }
            SchemaNode::Leaf(schema) => {
                let ty = FieldType::from_keyword(declared_type(schema));
                self.annotate(SchemaField::scalar(name, ty), schema, visited)
            }
            SchemaNode::Opaque => SchemaField::object(name, IndexMap::new()),
        };
        Some(field)
    }

    /// A pointer already on the current path becomes an empty object field naming the target.
    fn field_from_reference(
        &self,
        name: &str,
        pointer: &str,
        node: &Value,
        visited: &mut VisitedRefs,
    ) -> Option<SchemaField> {
        if visited.contains(pointer) {
            debug!(pointer, field = name, "Field reference already being expanded");
            let description = format!("Reference to {}", extract_type_name(pointer));
            return Some(SchemaField::object(name, IndexMap::new()).with_description(Some(description)));
        }

        visited.insert(pointer.to_string());
        let field = resolve_ref(pointer, self.root)
            .and_then(|resolved| self.normalize_field(name, resolved, visited));
        visited.remove(pointer);

        // A description written next to the `$ref` beats the target's own.
        let local = node.as_object().and_then(description_of);
        field.map(|f| match local {
            Some(_) => f.with_description(local),
            None => f,
        })
    }

    /// Object field flattening `allOf` members' properties, last-write-wins.
    fn merge_field_members(
        &self,
        name: &str,
        members: &[Value],
        schema: &Map<String, Value>,
        visited: &mut VisitedRefs,
    ) -> SchemaField {
        let mut properties = IndexMap::new();
        let mut required: IndexSet<String> = declared_required(schema).collect();

        for member in members {
            let part = match ref_of(member) {
                Some(pointer) if visited.contains(pointer) => continue,
                Some(pointer) => {
                    visited.insert(pointer.to_string());
                    let part = resolve_ref(pointer, self.root)
                        .and_then(|resolved| self.normalize_field(name, resolved, visited));
                    visited.remove(pointer);
                    part
                }
                None => self.normalize_field(name, member, visited),
            };

            if let Some(nested) = part.and_then(|p| p.properties) {
                for (prop_name, prop) in nested {
                    if prop.required {
                        required.insert(prop_name.clone());
                    }
                    properties.insert(prop_name, prop);
                }
            }
        }

        self.merge_properties(schema, &mut properties, visited);
        mark_required(&mut properties, &required);
        SchemaField::object(name, properties)
    }

    /// Copies description, format, enum and, for objects, `additionalProperties`.
    fn annotate(
        &self,
        mut field: SchemaField,
        schema: &Map<String, Value>,
        visited: &mut VisitedRefs,
    ) -> SchemaField {
        field.description = description_of(schema);
        field.format = schema
            .get("format")
            .and_then(Value::as_str)
            .map(str::to_string);
        field.enum_values = schema.get("enum").and_then(Value::as_array).map(|values| {
            values
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        });

        if field.ty == FieldType::Object {
            field.additional_properties = match schema.get("additionalProperties") {
                Some(Value::Bool(allowed)) => Some(AdditionalProperties::Allowed(*allowed)),
                Some(nested @ Value::Object(_)) => self
                    .normalize_field("additionalProperties", nested, visited)
                    .map(|f| AdditionalProperties::Schema(Box::new(f))),
                _ => None,
            };
        }
        field
    }
}

fn mark_required(properties: &mut IndexMap<String, SchemaField>, required: &IndexSet<String>) {
    for (name, field) in properties.iter_mut() {
        field.required = required.contains(name);
    }
}

#[cfg(test)]
mod tests {
    use crate::oas::models::{AdditionalProperties, FieldType};
    use crate::oas::ref_utils::VisitedRefs;
    use crate::oas::schemas::SchemaNormalizer;
    use serde_json::{json, Value};

    fn doc() -> Value {
        serde_yaml::from_str(
            r#"
components:
  schemas:
    Address:
      type: object
      description: Postal address
      required: [city]
      properties:
        city: {type: string}
        zip: {type: string}
    Audit:
      type: object
      required: [createdAt]
      properties:
        createdAt: {type: string, format: date-time}
    Status:
      type: string
      enum: [active, inactive]
    Tagged:
      allOf:
        - $ref: '#/components/schemas/Audit'
        - properties:
            label: {type: string}
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_reference_field_expands_target() {
        let root = doc();
        let normalizer = SchemaNormalizer::new(&root);
        let node = json!({"$ref": "#/components/schemas/Address"});
        let field = normalizer
            .normalize_field("home", &node, &mut VisitedRefs::new())
            .unwrap();

        assert_eq!(field.name, "home");
        assert_eq!(field.ty, FieldType::Object);
        assert_eq!(field.description.as_deref(), Some("Postal address"));
        let props = field.properties.unwrap();
        assert!(props["city"].required);
        assert!(!props["zip"].required);
    }

    #[test]
    fn test_reference_field_prefers_local_description() {
        let root = doc();
        let normalizer = SchemaNormalizer::new(&root);
        let node = json!({"$ref": "#/components/schemas/Address", "description": "Billing"});
        let field = normalizer
            .normalize_field("billing", &node, &mut VisitedRefs::new())
            .unwrap();
        assert_eq!(field.description.as_deref(), Some("Billing"));
    }

    #[test]
    fn test_reference_to_enum_keeps_values() {
        let root = doc();
        let normalizer = SchemaNormalizer::new(&root);
        let node = json!({"$ref": "#/components/schemas/Status"});
        let field = normalizer
            .normalize_field("status", &node, &mut VisitedRefs::new())
            .unwrap();

        assert_eq!(field.ty, FieldType::String);
        assert_eq!(
            field.enum_values,
            Some(vec!["active".to_string(), "inactive".to_string()])
        );
    }

    #[test]
    fn test_unresolvable_reference_is_omitted() {
        let root = doc();
        let normalizer = SchemaNormalizer::new(&root);
        let node = json!({"$ref": "#/components/schemas/Nowhere"});
        assert!(normalizer
            .normalize_field("x", &node, &mut VisitedRefs::new())
            .is_none());
    }

    #[test]
    fn test_sibling_references_do_not_share_cycle_state() {
        let root = doc();
        let normalizer = SchemaNormalizer::new(&root);
        let node = json!({
            "type": "object",
            "properties": {
                "home": {"$ref": "#/components/schemas/Address"},
                "work": {"$ref": "#/components/schemas/Address"}
            }
        });
        let field = normalizer
            .normalize_field("contact", &node, &mut VisitedRefs::new())
            .unwrap();
        let props = field.properties.unwrap();

        assert!(props["home"].properties.as_ref().unwrap().contains_key("city"));
        assert!(props["work"].properties.as_ref().unwrap().contains_key("city"));
    }

    #[test]
    fn test_all_of_field_merges_properties_and_required() {
        let root = doc();
        let normalizer = SchemaNormalizer::new(&root);
        let node = json!({"$ref": "#/components/schemas/Tagged"});
        let field = normalizer
            .normalize_field("tagged", &node, &mut VisitedRefs::new())
            .unwrap();

        assert_eq!(field.ty, FieldType::Object);
        let props = field.properties.unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["createdAt", "label"]);
        assert!(props["createdAt"].required);
        assert_eq!(props["createdAt"].format.as_deref(), Some("date-time"));
    }

    #[test]
    fn test_one_of_field_becomes_union() {
        let root = doc();
        let normalizer = SchemaNormalizer::new(&root);
        let node = json!({"oneOf": [{"type": "string"}, {"type": "integer"}]});
        let field = normalizer
            .normalize_field("value", &node, &mut VisitedRefs::new())
            .unwrap();

        assert_eq!(field.ty, FieldType::Union);
        let members = field.one_of.unwrap();
        assert_eq!(members[0].name, "value_variant_0");
        assert_eq!(members[1].ty, FieldType::Integer);
    }

    #[test]
    fn test_additional_properties_and_numeric_enum() {
        let root = doc();
        let normalizer = SchemaNormalizer::new(&root);
        let map = json!({"type": "object", "additionalProperties": {"type": "integer"}});
        let closed = json!({"type": "object", "additionalProperties": false});
        let level = json!({"type": "integer", "enum": [1, 2]});
        let mut visited = VisitedRefs::new();

        let map = normalizer.normalize_field("counts", &map, &mut visited).unwrap();
        match map.additional_properties {
            Some(AdditionalProperties::Schema(inner)) => assert_eq!(inner.ty, FieldType::Integer),
            other => panic!("expected nested schema, got {:?}", other),
        }

        let closed = normalizer.normalize_field("strict", &closed, &mut visited).unwrap();
        assert_eq!(
            closed.additional_properties,
            Some(AdditionalProperties::Allowed(false))
        );

        let level = normalizer.normalize_field("level", &level, &mut visited).unwrap();
        assert_eq!(level.enum_values, Some(vec!["1".to_string(), "2".to_string()]));
    }

    #[test]
    fn test_array_field_without_items() {
        let root = doc();
        let normalizer = SchemaNormalizer::new(&root);
        let node = json!({"type": "array"});
        let field = normalizer
            .normalize_field("anything", &node, &mut VisitedRefs::new())
            .unwrap();
        assert_eq!(field.ty, FieldType::Array);
        assert_eq!(field.items.unwrap().ty, FieldType::Object);
    }
}
