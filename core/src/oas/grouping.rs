#![deny(missing_docs)]

//! # Endpoint Grouping
//!
//! Buckets endpoints by tag across a batch of documents and infers one representative
//! type per tag group.
//!
//! Documents are added one at a time. After a document's endpoints are grouped, every
//! group still lacking a representative type scans the GET endpoints that document just
//! appended, in order. Since groups only ever grow at the end, this is the same as
//! scanning the whole group in insertion order, but each endpoint is resolved against
//! the document it came from.

use crate::oas::document::ApiDocument;
use crate::oas::models::{
    Endpoint, GroupedEndpoints, HttpMethod, SchemaType, TaggedEndpointGroup,
};
use crate::oas::ref_utils::{ref_of, resolve_ref, VisitedRefs};
use crate::oas::routes::naming::to_pascal_case;
use crate::oas::routes::{extract_endpoints, find_operation, operation_tags};
use crate::oas::schemas::SchemaNormalizer;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Tag markers dropped by default: event-subscription and notification-listener tags.
pub const DEFAULT_EXCLUDED_TAG_MARKERS: &[&str] = &[
    "event subscription",
    "events subscription",
    "eventsubscription",
    "notification listener",
    "notificationlistener",
    "client side notification",
];

/// Grouping settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrouperConfig {
    /// Lower-case substrings; a tag containing any of them is skipped.
    pub excluded_tag_markers: Vec<String>,
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self {
            excluded_tag_markers: DEFAULT_EXCLUDED_TAG_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl GrouperConfig {
    /// Adds extra markers on top of the current list.
    pub fn with_extra_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_tag_markers
            .extend(markers.into_iter().map(|m| m.as_ref().to_lowercase()));
        self
    }

    /// Case-insensitive substring match against the exclusion markers.
    pub fn is_excluded(&self, tag: &str) -> bool {
        let lowered = tag.to_lowercase();
        self.excluded_tag_markers
            .iter()
            .any(|marker| lowered.contains(marker.as_str()))
    }
}

/// Accumulates tag groups over a batch of documents.
#[derive(Debug, Default)]
pub struct EndpointGrouper {
    config: GrouperConfig,
    groups: IndexMap<String, TaggedEndpointGroup>,
}

impl EndpointGrouper {
    /// Creates an empty grouper.
    pub fn new(config: GrouperConfig) -> Self {
        Self {
            config,
            groups: IndexMap::new(),
        }
    }

    /// Groups the endpoints of one document and returns how many it declared.
    pub fn add_document(&mut self, doc: &ApiDocument) -> usize {
        let endpoints = extract_endpoints(doc);
        // Per group: index of the first endpoint appended by this document.
        let mut appended_from: IndexMap<String, usize> = IndexMap::new();

        for endpoint in &endpoints {
            let Some(operation) = find_operation(doc, endpoint) else {
                continue;
            };
            let tags = operation_tags(operation);
            if tags.is_empty() {
                debug!(path = %endpoint.path, method = %endpoint.method, "Skipping untagged endpoint");
                continue;
            }

            for tag in tags {
                if self.config.is_excluded(tag) {
                    debug!(tag, "Skipping excluded tag");
                    continue;
                }
                let group = self
                    .groups
                    .entry(tag.to_string())
                    .or_insert_with(|| TaggedEndpointGroup::new(to_pascal_case(tag)));

                if group.endpoints.iter().any(|e| e.same_route(endpoint)) {
                    continue;
                }
                appended_from
                    .entry(tag.to_string())
                    .or_insert(group.endpoints.len());
                group.endpoints.push(endpoint.clone());
            }
        }

        let normalizer = SchemaNormalizer::new(&doc.root);
        for (tag, start) in appended_from {
            let Some(group) = self.groups.get_mut(&tag) else {
                continue;
            };
            if group.underlying_type.is_some() {
                continue;
            }
            if let Some((name, schema)) =
                infer_representative_type(doc, &normalizer, &group.endpoints[start..])
            {
                debug!(tag = %tag, type_name = %name, "Inferred representative type");
                group.underlying_type = Some(name);
                group.schema = Some(schema);
            }
        }

        endpoints.len()
    }

    /// Current groups, for inspection mid-batch.
    pub fn groups(&self) -> &IndexMap<String, TaggedEndpointGroup> {
        &self.groups
    }

    /// Finishes the batch.
    pub fn finish(self) -> GroupedEndpoints {
        GroupedEndpoints(self.groups)
    }
}

/// Groups a set of documents with the given configuration.
pub fn group_documents<'a, I>(docs: I, config: GrouperConfig) -> GroupedEndpoints
where
    I: IntoIterator<Item = &'a ApiDocument>,
{
    let mut grouper = EndpointGrouper::new(config);
    for doc in docs {
        grouper.add_document(doc);
    }
    grouper.finish()
}

/// First GET endpoint, in order, whose 200 response schema normalizes to a named type.
///
/// An untitled inline object has no name to offer, so scanning moves past it.
fn infer_representative_type(
    doc: &ApiDocument,
    normalizer: &SchemaNormalizer<'_>,
    endpoints: &[Endpoint],
) -> Option<(String, SchemaType)> {
    endpoints
        .iter()
        .filter(|e| e.method == HttpMethod::Get)
        .find_map(|endpoint| {
            let operation = find_operation(doc, endpoint)?;
            let schema = success_schema(&doc.root, operation)?;
            match normalizer.normalize(schema, &mut VisitedRefs::new())? {
                (Some(name), ty) => Some((name, ty)),
                (None, _) => {
                    debug!(path = %endpoint.path, "Response schema has no type name, skipping");
                    None
                }
            }
        })
}

/// The `application/json` schema of the `200` response, resolving a response `$ref` first.
/// Swagger 2.0 responses carry `schema` directly and are accepted when `content` is absent.
fn success_schema<'a>(root: &'a Value, operation: &'a Value) -> Option<&'a Value> {
    let mut response = operation.get("responses")?.get("200")?;
    if let Some(pointer) = ref_of(response) {
        response = resolve_ref(pointer, root)?;
    }

    match response.get("content") {
        Some(content) => content.get("application/json")?.get("schema"),
        None => response.get("schema"),
    }
}
