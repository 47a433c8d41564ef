mod chat;
mod chat_models;
mod config;
mod errors;
mod failover;
mod fallback;
mod gemini;
mod guardrail;
mod handlers;
mod models;
mod store;

use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::chat::ChatService;
use crate::config::Config;
use crate::handlers::AppState;
use crate::store::InstitutionStore;

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, spawns the one-shot dataset
/// ingestion (non-fatal on failure), builds the chat gateway and starts the
/// Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ched_chat_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Dataset ingestion runs in the background; requests arriving before it
    // completes see "not ready". A failed load leaves the process serving in
    // degraded mode rather than exiting.
    let store = Arc::new(InstitutionStore::new());
    {
        let store = store.clone();
        let csv_path = config.csv_path.clone();
        tokio::spawn(async move {
            match store.load(&csv_path).await {
                Ok(count) => {
                    tracing::info!("Loaded {} institutions from {}", count, csv_path);
                }
                Err(e) => {
                    tracing::error!(
                        "Institution ingestion failed, serving in degraded mode: {}",
                        e
                    );
                }
            }
        });
    }

    // Build the chat gateway
    let chat = ChatService::from_config(&config, store.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize chat service: {}", e))?;

    let app_state = Arc::new(AppState { store, chat });

    // Build the app: chat payloads are small, so 1 MiB is a generous cap
    let app = handlers::router(app_state)
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(1024 * 1024)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
