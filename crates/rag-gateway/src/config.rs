//! Configuration for the gateway

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Keyword search backend configuration
    pub retrieval: RetrievalConfig,
    /// Completion backend configuration
    #[serde(default)]
    pub completion: CompletionConfig,
}

impl GatewayConfig {
    /// Configuration with defaults everywhere except the score threshold,
    /// which has no sensible default and must be chosen by the deployment
    pub fn new(score_threshold: f64) -> Self {
        Self {
            server: ServerConfig::default(),
            retrieval: RetrievalConfig::new(score_threshold),
            completion: CompletionConfig::default(),
        }
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.query_count == 0 {
            return Err(Error::config("retrieval.query_count must be at least 1"));
        }
        if !self.retrieval.score_threshold.is_finite() {
            return Err(Error::config(format!(
                "retrieval.score_threshold must be a finite number, got {}",
                self.retrieval.score_threshold
            )));
        }
        if self.retrieval.host.trim().is_empty() {
            return Err(Error::config("retrieval.host must not be empty"));
        }
        if !matches!(self.retrieval.scheme.as_str(), "http" | "https") {
            return Err(Error::config(format!(
                "retrieval.scheme must be http or https, got {}",
                self.retrieval.scheme
            )));
        }
        if self.completion.base_url.trim().is_empty() {
            return Err(Error::config("completion.base_url must not be empty"));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Weaviate keyword search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// `http` or `https`
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Host (and optional port) of the Weaviate instance
    #[serde(default = "default_host")]
    pub host: String,
    /// Optional API key sent as a bearer token
    #[serde(default)]
    pub api_key: Option<String>,
    /// Class holding the indexed documents
    #[serde(default = "default_class_name")]
    pub class_name: String,
    /// Maximum number of candidates requested per query (K)
    #[serde(default = "default_query_count")]
    pub query_count: usize,
    /// Candidates must score strictly above this value (T)
    pub score_threshold: f64,
    /// Request timeout in seconds
    #[serde(default = "default_retrieval_timeout")]
    pub timeout_secs: u64,
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_host() -> String {
    "weaviate.leapfrogai.bigbang.dev".to_string()
}

fn default_class_name() -> String {
    "Slack".to_string()
}

fn default_query_count() -> usize {
    2
}

fn default_retrieval_timeout() -> u64 {
    30
}

impl RetrievalConfig {
    pub fn new(score_threshold: f64) -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            api_key: None,
            class_name: default_class_name(),
            query_count: default_query_count(),
            score_threshold,
            timeout_secs: default_retrieval_timeout(),
        }
    }

    /// GraphQL endpoint of the Weaviate instance
    pub fn graphql_url(&self) -> String {
        format!("{}://{}/v1/graphql", self.scheme, self.host.trim_end_matches('/'))
    }
}

/// OpenAI-compatible completion backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Base URL up to and including the API version, e.g. `http://host/openai/v1`
    pub base_url: String,
    /// Bearer token; LeapfrogAI backends accept any value
    pub api_key: String,
    /// Request timeout in seconds, generous because streams stay open for
    /// the whole generation
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://leapfrogai.leapfrogai.bigbang.dev/openai/v1".to_string(),
            api_key: "FAKE_TOKEN".to_string(),
            timeout_secs: 600, // 10 minutes
        }
    }
}

impl CompletionConfig {
    /// Endpoint URL for a path relative to the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
