#![deny(missing_docs)]

//! # Grouper Core
//!
//! Resolution and grouping engine for OpenAPI description documents.
//!
//! Loads documents, dereferences internal `$ref` pointers, flattens schema composition
//! into a field model, and groups operations by tag with one representative type each.

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) processing.
pub mod oas;

pub use error::{AppError, AppResult};
pub use oas::{
    find_duplicate_routes, find_duplicates_in_json, group_documents, normalize_schema,
    ApiDocument, DocumentFormat, DuplicateRoute, Endpoint, EndpointGrouper, FieldType,
    GroupedEndpoints, GrouperConfig, HttpMethod, SchemaField, SchemaNormalizer, SchemaType,
    TaggedEndpointGroup,
};
