//! Axum API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tdoc_api::{create_router, ApiConfig, AppState};
use tdoc_bus::EventBus;
use tdoc_collab::{CollabConfig, GeminiClient, ResendClient, YouTubeClient};
use tdoc_pipeline::{attach, Collaborators};
use tdoc_store::{JobStore, MemoryJobStore};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting tdoc-api");

    // Load configuration
    let config = ApiConfig::from_env();
    let collab_config = CollabConfig::from_env();
    info!("API config: host={}, port={}", config.host, config.port);

    // Construct shared dependencies once; everything downstream gets them
    // injected.
    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let (bus, mut registry) = EventBus::channel();

    let youtube = match YouTubeClient::new(&collab_config) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to create YouTube client: {}", e);
            std::process::exit(1);
        }
    };
    let gemini = match GeminiClient::new(&collab_config) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to create Gemini client: {}", e);
            std::process::exit(1);
        }
    };
    let resend = match ResendClient::new(&collab_config) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to create Resend client: {}", e);
            std::process::exit(1);
        }
    };

    attach(
        &mut registry,
        Arc::clone(&store),
        bus.clone(),
        Collaborators {
            channels: youtube.clone(),
            videos: youtube,
            titles: gemini,
            mailer: resend,
        },
    );

    // Run the event dispatch loop alongside the server.
    tokio::spawn(registry.run());

    // Create router
    let state = AppState::new(config.clone(), store, bus);
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid bind address");

    info!("Listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Received shutdown signal");
}
