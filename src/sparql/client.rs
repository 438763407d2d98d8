//! SPARQL client for the schema endpoint
//!
//! Issues the two fixed schema queries (distinct classes, distinct
//! predicates) as GET requests with a bounded timeout and maps the result
//! bindings into typed elements. The client never retries; retry policy
//! belongs to the caller.

use crate::schema::{ElementKind, SchemaElement};
use crate::{Result, SchemascopeError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

const USER_AGENT: &str = concat!("schemascope/", env!("CARGO_PKG_VERSION"));

/// Source of schema elements
///
/// Implemented by `SparqlClient` for production and by stubs in tests so the
/// refresher can run without a network.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetch up to `limit` distinct classes
    async fn fetch_classes(&self, limit: usize) -> Result<Vec<SchemaElement>>;

    /// Fetch up to `limit` distinct predicates
    async fn fetch_predicates(&self, limit: usize) -> Result<Vec<SchemaElement>>;
}

/// Client for a SPARQL query endpoint
#[derive(Debug, Clone)]
pub struct SparqlClient {
    endpoint: String,
    client: reqwest::Client,
}

impl SparqlClient {
    /// Create a client with the given per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Endpoint URL this client queries
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a query and return the parsed JSON result body
    async fn execute_query(&self, query: &str) -> Result<serde_json::Value> {
        let url = format!("{}?query={}", self.endpoint, urlencoding::encode(query));

        tracing::debug!(query = %query, "Executing SPARQL query");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SchemascopeError::Fetch(format!(
                "Endpoint returned {} for query: {}",
                status, query
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            SchemascopeError::Fetch(format!("Malformed result body: {}", e))
        })
    }

    async fn fetch_elements(
        &self,
        query: &str,
        var: &str,
        kind: ElementKind,
    ) -> Result<Vec<SchemaElement>> {
        let result = self.execute_query(query).await?;
        let uris = parse_binding_uris(&result, var)?;

        Ok(uris
            .into_iter()
            .map(|uri| SchemaElement::from_uri(uri, kind))
            .collect())
    }
}

#[async_trait]
impl SchemaSource for SparqlClient {
    async fn fetch_classes(&self, limit: usize) -> Result<Vec<SchemaElement>> {
        let query = format!("SELECT DISTINCT ?type WHERE {{?s a ?type}} LIMIT {}", limit);
        self.fetch_elements(&query, "type", ElementKind::Class).await
    }

    async fn fetch_predicates(&self, limit: usize) -> Result<Vec<SchemaElement>> {
        let query = format!("SELECT DISTINCT ?p WHERE {{?s ?p ?o}} LIMIT {}", limit);
        self.fetch_elements(&query, "p", ElementKind::Predicate).await
    }
}

/// Extract URIs bound to `var` from a query result, deduplicated in order
///
/// Accepts both the SPARQL 1.1 JSON results form
/// (`results.bindings[*].<var>.value`) and a bare row-list form
/// (`[{"<var>": "..."}]`); the endpoint has served both.
fn parse_binding_uris(result: &serde_json::Value, var: &str) -> Result<Vec<String>> {
    let rows: Vec<&serde_json::Value> = if let Some(list) = result.as_array() {
        list.iter().collect()
    } else if let Some(bindings) = result
        .get("results")
        .and_then(|r| r.get("bindings"))
        .and_then(|b| b.as_array())
    {
        bindings.iter().collect()
    } else {
        return Err(SchemascopeError::Fetch(format!(
            "Unexpected result format, no bindings for ?{}",
            var
        )));
    };

    let mut seen = HashSet::new();
    let mut uris = Vec::new();

    for row in rows {
        let Some(cell) = row.get(var) else {
            continue;
        };
        // A cell is either a bare string or a {"type": .., "value": ..} term
        let value = cell
            .as_str()
            .or_else(|| cell.get("value").and_then(|v| v.as_str()));

        if let Some(uri) = value {
            if seen.insert(uri.to_string()) {
                uris.push(uri.to_string());
            }
        }
    }

    Ok(uris)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client =
            SparqlClient::new("https://example.org/sparql", Duration::from_secs(30)).unwrap();
        assert_eq!(client.endpoint(), "https://example.org/sparql");
    }

    #[test]
    fn test_parse_sparql_json_format() {
        let result = json!({
            "head": {"vars": ["type"]},
            "results": {"bindings": [
                {"type": {"type": "uri", "value": "http://odissei.nl/schema#Person"}},
                {"type": {"type": "uri", "value": "http://odissei.nl/schema#Dataset"}}
            ]}
        });

        let uris = parse_binding_uris(&result, "type").unwrap();
        assert_eq!(
            uris,
            vec![
                "http://odissei.nl/schema#Person",
                "http://odissei.nl/schema#Dataset"
            ]
        );
    }

    #[test]
    fn test_parse_bare_list_format() {
        let result = json!([
            {"p": "http://odissei.nl/schema#knows"},
            {"p": "http://odissei.nl/schema#name"}
        ]);

        let uris = parse_binding_uris(&result, "p").unwrap();
        assert_eq!(uris.len(), 2);
    }

    #[test]
    fn test_parse_dedups_preserving_order() {
        let result = json!({
            "results": {"bindings": [
                {"p": {"value": "http://a/1"}},
                {"p": {"value": "http://a/2"}},
                {"p": {"value": "http://a/1"}}
            ]}
        });

        let uris = parse_binding_uris(&result, "p").unwrap();
        assert_eq!(uris, vec!["http://a/1", "http://a/2"]);
    }

    #[test]
    fn test_parse_skips_rows_missing_var() {
        let result = json!({
            "results": {"bindings": [
                {"other": {"value": "http://a/1"}},
                {"p": {"value": "http://a/2"}}
            ]}
        });

        let uris = parse_binding_uris(&result, "p").unwrap();
        assert_eq!(uris, vec!["http://a/2"]);
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        let result = json!({"status": "ok"});
        let err = parse_binding_uris(&result, "p").unwrap_err();
        assert!(matches!(err, SchemascopeError::Fetch(_)));
    }

    #[test]
    fn test_empty_bindings_yield_no_elements() {
        let result = json!({"results": {"bindings": []}});
        let uris = parse_binding_uris(&result, "type").unwrap();
        assert!(uris.is_empty());
    }
}
