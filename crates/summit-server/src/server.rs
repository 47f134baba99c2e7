use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use summit_core::PortalConfig;
use summit_resolver::{EventResolver, Fetcher, ImageResolver};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Server configuration.
pub struct ServerConfig {
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8788,
            request_timeout_secs: 30,
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub events: Arc<EventResolver>,
    pub images: Arc<ImageResolver>,
    pub fetcher: Arc<dyn Fetcher>,
}

impl AppState {
    pub fn new(config: Arc<PortalConfig>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            events: Arc::new(EventResolver::new(config.clone(), fetcher.clone())),
            images: Arc::new(ImageResolver::new(config.clone(), fetcher.clone())),
            config,
            fetcher,
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/events", get(handlers::list_events))
        .route("/api/events/{id}", get(handlers::get_event))
        .route("/api/banner-image", get(handlers::banner_image))
        .route("/api/event-image/{id}", get(handlers::event_image))
        .route("/api/event-thumbnail/{id}", get(handlers::event_thumbnail))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// Create and start the server. Returns a handle carrying the bound port.
pub async fn start(config: ServerConfig, state: AppState) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(state, Duration::from_secs(config.request_timeout_secs));
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "Summit portal server started");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server_handle,
    })
}

/// Handle returned by `start()` — keeps the serve task alive.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}
