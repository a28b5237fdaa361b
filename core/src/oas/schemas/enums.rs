#![deny(missing_docs)]

//! # Union Variants
//!
//! Type-level handling of `oneOf` (discriminated unions).

use crate::oas::models::SchemaType;
use crate::oas::ref_utils::{extract_type_name, ref_of, VisitedRefs};
use crate::oas::schemas::{description_of, inferred_name, Normalized, SchemaNormalizer};
use serde_json::{Map, Value};

impl SchemaNormalizer<'_> {
    /// Builds a union type with one variant per `oneOf` member, in order.
    ///
    /// Properties declared next to `oneOf` become the union's own fields.
    pub(crate) fn collect_variants(
        &self,
        variants: &[Value],
        schema: &Map<String, Value>,
        hint: Option<&str>,
        visited: &mut VisitedRefs,
    ) -> Normalized {
        let mut union = self.empty_type(schema, hint);
        self.merge_properties(schema, &mut union.fields, visited);

        let parent = union.name.clone();
        let normalized = variants
            .iter()
            .enumerate()
            .map(|(index, variant)| self.normalize_variant(&parent, index, variant, visited))
            .collect();
        union.one_of = Some(normalized);
        union.reconcile_required();
        (inferred_name(schema, hint), union)
    }

    /// Referenced variants take the reference name, inline ones `<parent>_variant_<index>`.
    /// A variant that cannot be expanded still occupies its slot as a stub.
    fn normalize_variant(
        &self,
        parent: &str,
        index: usize,
        variant: &Value,
        visited: &mut VisitedRefs,
    ) -> SchemaType {
        if let Some(pointer) = ref_of(variant) {
            return match self.normalize_reference(pointer, visited) {
                Some((_, ty)) => ty,
                None => SchemaType::stub(extract_type_name(pointer)),
            };
        }

        let positional = format!("{}_variant_{}", parent, index);
        match self.normalize_named(variant, Some(&positional), visited) {
            Some((_, ty)) => ty,
            None => {
                let mut stub = SchemaType::stub(positional);
                stub.description = variant.as_object().and_then(description_of);
                stub
            }
        }
    }
}
