#![deny(missing_docs)]

//! # Duplicate Route Validation
//!
//! Read-only diagnostic over a grouped endpoints artifact: reports every
//! (path, method) pair that appears under more than one tag.

use crate::error::{AppError, AppResult};
use crate::oas::models::{Endpoint, GroupedEndpoints};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One place a route was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOccurrence {
    /// Tag group the endpoint sits in.
    pub tag: String,
    /// Its operation id.
    pub operation_id: String,
}

/// A route emitted more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateRoute {
    /// `<path>:<method>`
    pub route_key: String,
    /// Templated path.
    pub path: String,
    /// Lower-case method.
    pub method: String,
    /// Every occurrence, in artifact order.
    pub occurrences: Vec<RouteOccurrence>,
}

/// Only the endpoint lists matter here, so schemas in the artifact are not parsed.
#[derive(Deserialize)]
struct EndpointsOnly {
    endpoints: Vec<RouteEntry>,
}

/// An artifact endpoint. The method stays free text so unfamiliar verbs still count.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteEntry {
    operation_id: String,
    path: String,
    method: String,
}

/// Finds duplicated routes across `(tag, endpoints)` pairs.
pub fn find_duplicate_routes<'a, I>(groups: I) -> Vec<DuplicateRoute>
where
    I: IntoIterator<Item = (&'a str, &'a [Endpoint])>,
{
    collect_duplicates(groups.into_iter().flat_map(|(tag, endpoints)| {
        endpoints
            .iter()
            .map(move |e| (tag, e.path.as_str(), e.method.as_str(), e.operation_id.as_str()))
    }))
}

/// Duplicated routes of an in-memory grouping result.
pub fn find_duplicates_in_groups(grouped: &GroupedEndpoints) -> Vec<DuplicateRoute> {
    find_duplicate_routes(
        grouped
            .iter()
            .map(|(tag, group)| (tag.as_str(), group.endpoints.as_slice())),
    )
}

/// Parses a serialized artifact and reports its duplicated routes.
pub fn find_duplicates_in_json(content: &str) -> AppResult<Vec<DuplicateRoute>> {
    let groups: IndexMap<String, EndpointsOnly> = serde_json::from_str(content)
        .map_err(|e| AppError::General(format!("Failed to parse endpoints file: {}", e)))?;
    Ok(collect_duplicates(groups.iter().flat_map(|(tag, group)| {
        group.endpoints.iter().map(move |e| {
            (
                tag.as_str(),
                e.path.as_str(),
                e.method.as_str(),
                e.operation_id.as_str(),
            )
        })
    })))
}

/// Keys `(tag, path, method, operation_id)` rows by `<path>:<lower-case method>`.
fn collect_duplicates<'a, I>(rows: I) -> Vec<DuplicateRoute>
where
    I: IntoIterator<Item = (&'a str, &'a str, &'a str, &'a str)>,
{
    let mut routes: IndexMap<String, DuplicateRoute> = IndexMap::new();

    for (tag, path, method, operation_id) in rows {
        let method = method.to_lowercase();
        let route_key = format!("{}:{}", path, method);
        routes
            .entry(route_key.clone())
            .or_insert_with(|| DuplicateRoute {
                route_key,
                path: path.to_string(),
                method,
                occurrences: Vec::new(),
            })
            .occurrences
            .push(RouteOccurrence {
                tag: tag.to_string(),
                operation_id: operation_id.to_string(),
            });
    }

    routes
        .into_values()
        .filter(|route| route.occurrences.len() > 1)
        .collect()
}

/// Human-readable report.
pub fn render_report(duplicates: &[DuplicateRoute]) -> String {
    const RULE: &str = "-------------------------------------";

    if duplicates.is_empty() {
        return "No duplicated routes found!\n".to_string();
    }

    let mut lines = vec![
        format!("Found {} duplicated routes:", duplicates.len()),
        RULE.to_string(),
    ];
    for route in duplicates {
        lines.push(format!(
            "Path: {}, Method: {}",
            route.path,
            route.method.to_uppercase()
        ));
        lines.push("Appears in:".to_string());
        lines.extend(route.occurrences.iter().map(|occurrence| {
            format!(
                "  - Tag: \"{}\", OperationId: \"{}\"",
                occurrence.tag, occurrence.operation_id
            )
        }));
        lines.push(RULE.to_string());
    }
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reports_route_shared_by_two_tags() {
        let artifact = json!({
            "A": {"tableName": "A", "endpoints": [{"path": "/x", "method": "get", "operationId": "a1"}]},
            "B": {"tableName": "B", "endpoints": [{"path": "/x", "method": "get", "operationId": "b1"}]}
        });
        let duplicates = find_duplicates_in_json(&artifact.to_string()).unwrap();

        assert_eq!(duplicates.len(), 1);
        let route = &duplicates[0];
        assert_eq!(route.route_key, "/x:get");
        assert_eq!(
            route.occurrences,
            vec![
                RouteOccurrence { tag: "A".into(), operation_id: "a1".into() },
                RouteOccurrence { tag: "B".into(), operation_id: "b1".into() },
            ]
        );
    }

    #[test]
    fn test_method_case_is_normalized() {
        let artifact = json!({
            "A": {"endpoints": [{"path": "/x", "method": "GET", "operationId": "a1"}]},
            "B": {"endpoints": [{"path": "/x", "method": "get", "operationId": "b1"}]},
            "C": {"endpoints": [{"path": "/x", "method": "post", "operationId": "c1"}]}
        });
        let duplicates = find_duplicates_in_json(&artifact.to_string()).unwrap();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].method, "get");
    }

    #[test]
    fn test_ignores_schema_payload_and_is_repeatable() {
        let artifact = json!({
            "A": {
                "tableName": "A",
                "endpoints": [{"path": "/y", "method": "put", "operationId": "a"}],
                "underlyingType": "Thing",
                "schema": {"name": "Thing", "whatever": [1, 2, 3]}
            }
        })
        .to_string();

        assert!(find_duplicates_in_json(&artifact).unwrap().is_empty());
        assert!(find_duplicates_in_json(&artifact).unwrap().is_empty());
    }

    #[test]
    fn test_unlisted_method_is_still_checked() {
        let artifact = json!({
            "A": {"endpoints": [{"path": "/x", "method": "TRACE", "operationId": "a1"}]},
            "B": {"endpoints": [{"path": "/x", "method": "trace", "operationId": "b1"}]}
        });
        let duplicates = find_duplicates_in_json(&artifact.to_string()).unwrap();

        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].route_key, "/x:trace");
        assert_eq!(duplicates[0].method, "trace");
    }

    #[test]
    fn test_invalid_artifact_is_error() {
        assert!(find_duplicates_in_json("[1, 2]").is_err());
    }

    #[test]
    fn test_render_report() {
        let duplicates = vec![DuplicateRoute {
            route_key: "/x:get".into(),
            path: "/x".into(),
            method: "get".into(),
            occurrences: vec![
                RouteOccurrence { tag: "A".into(), operation_id: "a1".into() },
                RouteOccurrence { tag: "B".into(), operation_id: "b1".into() },
            ],
        }];
        let report = render_report(&duplicates);

        assert!(report.starts_with("Found 1 duplicated routes:"));
        assert!(report.contains("Path: /x, Method: GET"));
        assert!(report.contains("  - Tag: \"B\", OperationId: \"b1\""));
        assert!(report.ends_with("-------------------------------------\n"));
        assert_eq!(render_report(&[]), "No duplicated routes found!\n");
    }
}
