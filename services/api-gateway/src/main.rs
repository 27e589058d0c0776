use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    response::Json,
    routing::get,
    serve, Router,
};
use lumera_engine::{CatalogStore, GenerativeFallbackAdapter, OpenAiClient, ReportRenderer};
use lumera_utils::{init_logging, AppConfig};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::{Any, CorsLayer}, trace::TraceLayer};
use tracing::{info, warn};

mod error;
mod handlers;
mod middleware;
mod routes;

pub use error::ApiError;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|_| {
        eprintln!("Failed to load configuration, using defaults");
        AppConfig::default()
    });

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Lumera API Gateway");

    // Load the catalog once, before serving; it is read-only afterwards.
    let catalog = Arc::new(CatalogStore::load(&config.catalog.source_path));
    match catalog.unavailable_reason() {
        None => info!(models = catalog.len(), "Catalog ready"),
        Some(reason) => warn!(%reason, "Serving without catalog; all lookups fall back"),
    }

    let completion_client = Arc::new(OpenAiClient::new(&config.completion)?);
    let fallback = Arc::new(GenerativeFallbackAdapter::new(
        completion_client,
        config.completion.max_tokens,
        config.completion.temperature,
    ));
    let renderer = Arc::new(ReportRenderer::new()?);

    let state = AppState {
        catalog,
        fallback,
        renderer,
        config: config.clone(),
    };
    let app = create_app(state, &config);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(&addr).await?;
    info!("API Gateway listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))

        // API routes
        .nest("/api/v1", routes::create_api_routes(state.clone()))

        // Middleware stack
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
                )
                .layer(DefaultBodyLimit::max(config.server.max_request_size))
                .layer(axum::middleware::from_fn(middleware::request_id_middleware)),
        )

        // Application state
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub fallback: Arc<GenerativeFallbackAdapter>,
    pub renderer: Arc<ReportRenderer>,
    pub config: AppConfig,
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "lumera-api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_handler() -> String {
    use prometheus::TextEncoder;

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_else(|_| "Error encoding metrics".to_string())
}
