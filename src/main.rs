use std::sync::Arc;

use clap::Parser;
use summit_core::config::Environment;
use summit_core::PortalConfig;
use summit_resolver::HttpFetcher;

/// Attendee portal backend: event data and image resolution with layered
/// fallbacks.
#[derive(Parser)]
#[command(name = "summit", version)]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 8788)]
    port: u16,

    /// Base URL of the upstream event-management API
    #[arg(long)]
    upstream_url: Option<String>,

    /// Bearer token for direct upstream calls (falls back to $SUMMIT_API_TOKEN)
    #[arg(long)]
    bearer_token: Option<String>,

    /// Serve the hardcoded sample data set instead of live event data
    #[arg(long)]
    use_sample_data: bool,

    /// Answer image requests with the static placeholder asset
    #[arg(long)]
    use_mock_data: bool,

    /// Run in production mode (live data preferred over samples)
    #[arg(long)]
    production: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting Summit portal server");

    let mut config = PortalConfig::default();
    config.internal_base_url = format!("http://127.0.0.1:{}", cli.port);
    if let Some(upstream) = cli.upstream_url {
        config.upstream_base_url = upstream;
    }
    config.use_sample_data = cli.use_sample_data;
    config.use_mock_data = cli.use_mock_data;
    if cli.production {
        config.environment = Environment::Production;
    }
    let token = cli
        .bearer_token
        .or_else(|| std::env::var("SUMMIT_API_TOKEN").ok())
        .unwrap_or_default();
    if token.is_empty() {
        tracing::warn!("no API token configured, direct upstream calls will be unauthenticated");
    }
    config.set_bearer_token(token);

    let fetcher = Arc::new(HttpFetcher::new(config.attempt_timeout));
    let state = summit_server::AppState::new(Arc::new(config), fetcher);

    let server_config = summit_server::ServerConfig {
        port: cli.port,
        ..Default::default()
    };
    let handle = summit_server::start(server_config, state)
        .await
        .expect("Failed to start server");

    tracing::info!(port = handle.port, "Summit portal ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl+c");

    tracing::info!("Shutting down");
}
