//! Application state for the gateway server

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::error::Result;
use crate::pipeline::RagPipeline;
use crate::providers::{OpenAiClient, WeaviateClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: GatewayConfig,
    /// Request pipeline with its backend handles
    pipeline: RagPipeline,
}

impl AppState {
    /// Create state with the Weaviate and OpenAI-compatible backends
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing gateway state...");

        let search = Arc::new(WeaviateClient::new(&config.retrieval)?);
        tracing::info!("Search backend: {}", config.retrieval.graphql_url());

        let completion = Arc::new(OpenAiClient::new(&config.completion)?);
        tracing::info!("Completion backend: {}", completion.base_url());

        let pipeline = RagPipeline::from_backends(
            search,
            completion,
            config.retrieval.query_count,
            config.retrieval.score_threshold,
        );

        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Create state around an already-built pipeline
    pub fn with_pipeline(config: GatewayConfig, pipeline: RagPipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Get the request pipeline
    pub fn pipeline(&self) -> &RagPipeline {
        &self.inner.pipeline
    }
}
