//! Weaviate keyword search client
//!
//! Issues a GraphQL `Get` query with a `bm25` argument:
//!
//! ```text
//! { Get { Slack(bm25: {query: "..."}, limit: 2) { content channel source _additional { score } } } }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result, RetrievalError};
use crate::types::{RetrievedDocument, SearchHits};

use super::search::SearchBackend;

/// Weaviate GraphQL client
pub struct WeaviateClient {
    /// HTTP client
    client: Client,
    /// GraphQL endpoint
    url: String,
    /// Class holding the documents
    class_name: String,
    /// Optional bearer token
    api_key: Option<String>,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct Row {
    #[serde(default)]
    content: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    channel: String,
    #[serde(rename = "_additional", default)]
    additional: Option<Additional>,
}

#[derive(Deserialize)]
struct Additional {
    #[serde(default)]
    score: Value,
}

impl WeaviateClient {
    /// Create a new Weaviate client
    pub fn new(config: &RetrievalConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::config(format!("Failed to create search HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.graphql_url(),
            class_name: config.class_name.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the GraphQL query text for a BM25 search
    pub fn build_query(&self, text: &str, limit: usize) -> String {
        // JSON string escaping is valid GraphQL string escaping
        let quoted = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
        format!(
            "{{ Get {{ {class}(bm25: {{query: {quoted}}}, limit: {limit}) {{ content channel source _additional {{ score }} }} }} }}",
            class = self.class_name,
            quoted = quoted,
            limit = limit
        )
    }

    /// Extract ranked documents from a GraphQL response body
    fn parse_response(
        &self,
        body: GraphQlResponse,
    ) -> std::result::Result<SearchHits, RetrievalError> {
        if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(RetrievalError::BackendUnavailable(messages.join("; ")));
        }

        let rows = match body
            .data
            .as_ref()
            .and_then(|data| data.get("Get"))
            .and_then(|get| get.get(&self.class_name))
        {
            Some(Value::Array(rows)) => rows.clone(),
            Some(Value::Null) | None => return Ok(SearchHits::default()),
            Some(other) => {
                return Err(RetrievalError::BackendUnavailable(format!(
                    "unexpected {} payload: {}",
                    self.class_name, other
                )))
            }
        };

        let total = rows.len();
        let mut documents = Vec::with_capacity(total);
        for raw in rows {
            let row: Row = match serde_json::from_value(raw) {
                Ok(row) => row,
                Err(e) => {
                    tracing::debug!("Skipping malformed {} row: {}", self.class_name, e);
                    continue;
                }
            };

            let score = row.additional.as_ref().and_then(|a| parse_score(&a.score));
            let Some(relevance_score) = score else {
                tracing::debug!("Skipping {} row without a numeric score", self.class_name);
                continue;
            };

            documents.push(RetrievedDocument {
                content: row.content,
                source: row.source,
                channel: row.channel,
                relevance_score,
            });
        }

        Ok(SearchHits::new(total, documents))
    }
}

/// Weaviate reports BM25 scores as strings; accept numbers too
fn parse_score(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[async_trait]
impl SearchBackend for WeaviateClient {
    async fn bm25_search(
        &self,
        query: &str,
        limit: usize,
    ) -> std::result::Result<SearchHits, RetrievalError> {
        let graphql = self.build_query(query, limit);

        let mut request = self
            .client
            .post(&self.url)
            .json(&GraphQlRequest { query: &graphql });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| {
                RetrievalError::BackendUnavailable(format!("Search request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::BackendUnavailable(format!(
                "Search failed: HTTP {} - {}",
                status, body
            )));
        }

        let body: GraphQlResponse = response.json().await.map_err(|e| {
            RetrievalError::BackendUnavailable(format!("Failed to parse search response: {}", e))
        })?;

        self.parse_response(body)
    }

    fn name(&self) -> &str {
        "weaviate"
    }
}
