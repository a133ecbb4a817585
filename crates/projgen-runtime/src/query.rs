//! GraphQL request bodies built from a root projection.

use crate::projection::ProjectionScope;
use serde::Serialize;

/// A query document ready to be posted to a GraphQL endpoint.
///
/// Serializes to the standard `{"query": ..., "operationName": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQLQuery {
    /// Build an anonymous query from a root projection.
    pub fn new<P: ProjectionScope>(root: &P) -> Self {
        Self {
            query: format!("query {{ {} }}", root.selection()),
            operation_name: None,
        }
    }

    /// Build a named query from a root projection.
    pub fn named<P: ProjectionScope>(operation_name: impl Into<String>, root: &P) -> Self {
        let operation_name = operation_name.into();
        Self {
            query: format!("query {} {{ {} }}", operation_name, root.selection()),
            operation_name: Some(operation_name),
        }
    }

    /// The JSON request body for this query.
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}
