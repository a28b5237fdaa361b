#![deny(missing_docs)]

//! # OpenAPI Processing Module
//!
//! - **document**: Loading JSON/YAML description documents.
//! - **ref_utils**: Internal `$ref` pointer resolution.
//! - **schemas**: Normalizing schemas into flattened types and fields.
//! - **routes**: Extracting endpoints from `paths`.
//! - **grouping**: Grouping endpoints by tag and inferring representative types.
//! - **validation**: Duplicate-route diagnostics over the grouped output.
//! - **models**: The normalized output model.

pub mod document;
pub mod grouping;
pub mod models;
pub mod ref_utils;
pub mod routes;
pub mod schemas;
pub mod validation;

pub use document::{ApiDocument, DocumentFormat};
pub use grouping::{group_documents, EndpointGrouper, GrouperConfig};
pub use models::{
    Endpoint, FieldType, GroupedEndpoints, HttpMethod, SchemaField, SchemaType,
    TaggedEndpointGroup,
};
pub use routes::extract_endpoints;
pub use schemas::{normalize_schema, Normalized, SchemaNormalizer};
pub use validation::{find_duplicate_routes, find_duplicates_in_json, DuplicateRoute};
