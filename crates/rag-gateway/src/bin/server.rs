//! Gateway server binary
//!
//! Run with: cargo run -p rag-gateway --bin rag-gateway-server -- --score-threshold 3

use clap::Parser;
use rag_gateway::{config::GatewayConfig, server::GatewayServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Retrieval-augmented chat completion gateway
#[derive(Debug, Parser)]
#[command(name = "rag-gateway-server", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Weaviate scheme (http or https)
    #[arg(long, env = "WEAVIATE_SCHEME", default_value = "https")]
    weaviate_scheme: String,

    /// Weaviate host
    #[arg(long, env = "WEAVIATE_HOST", default_value = "weaviate.leapfrogai.bigbang.dev")]
    weaviate_host: String,

    /// Weaviate API key
    #[arg(long, env = "WEAVIATE_API_KEY")]
    weaviate_api_key: Option<String>,

    /// Weaviate class holding the documents
    #[arg(long, env = "WEAVIATE_CLASS", default_value = "Slack")]
    weaviate_class: String,

    /// Number of documents requested per query
    #[arg(long, env = "WEAVIATE_QUERY_COUNT", default_value_t = 2)]
    query_count: usize,

    /// Documents must score strictly above this to be injected
    #[arg(long, env = "WEAVIATE_SCORE_THRESHOLD")]
    score_threshold: f64,

    /// OpenAI-compatible API base URL
    #[arg(
        long,
        env = "OPENAI_API_URL",
        default_value = "https://leapfrogai.leapfrogai.bigbang.dev/openai/v1"
    )]
    openai_api_url: String,

    /// Bearer token for the completion backend
    #[arg(long, env = "OPENAI_API_KEY", default_value = "FAKE_TOKEN")]
    openai_api_key: String,

    /// Disable permissive CORS headers
    #[arg(long)]
    no_cors: bool,
}

impl Args {
    fn into_config(self) -> GatewayConfig {
        let mut config = GatewayConfig::new(self.score_threshold);

        config.server.host = self.host;
        config.server.port = self.port;
        config.server.enable_cors = !self.no_cors;

        config.retrieval.scheme = self.weaviate_scheme;
        config.retrieval.host = self.weaviate_host;
        config.retrieval.api_key = self.weaviate_api_key;
        config.retrieval.class_name = self.weaviate_class;
        config.retrieval.query_count = self.query_count;

        config.completion.base_url = self.openai_api_url;
        config.completion.api_key = self.openai_api_key;

        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_gateway=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Args::parse().into_config();

    tracing::info!("Configuration loaded");
    tracing::info!("  - Search backend: {}", config.retrieval.graphql_url());
    tracing::info!("  - Document class: {}", config.retrieval.class_name);
    tracing::info!("  - Query count: {}", config.retrieval.query_count);
    tracing::info!("  - Score threshold: {}", config.retrieval.score_threshold);
    tracing::info!("  - Completion backend: {}", config.completion.base_url);

    let server = GatewayServer::new(config)?;

    tracing::info!("Endpoints:");
    tracing::info!("  POST /openai/:database/v1/chat/completions");
    tracing::info!("  GET  /openai/:database/v1/models");
    tracing::info!("  GET  /healthz");

    server.start().await?;

    Ok(())
}
