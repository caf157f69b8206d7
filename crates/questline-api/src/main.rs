//! Questline API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use questline_api::config::{self, AppConfig};
use questline_api::error::AppError;
use questline_api::state::AppState;
use questline_core::clock::SystemClock;
use questline_openai::AzureOpenAiGenerator;
use questline_session::application::expiry::ExpirySweeper;
use questline_session::application::services::SessionServices;
use questline_session::infrastructure::in_memory_store::InMemorySessionStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load .env before the subscriber reads RUST_LOG.
    let dotenv_path = config::load_dotenv()?;

    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Questline API server");
    if let Some(path) = dotenv_path {
        tracing::info!(path = %path.display(), "loaded environment file");
    }

    let config = AppConfig::from_env()?;
    tracing::info!(
        endpoint = %config.openai.endpoint,
        deployment = %config.openai.deployment,
        continuation = config.openai.use_continuation,
        turn_budget = config.engine.turn_budget(),
        "configuration loaded"
    );

    let generator = AzureOpenAiGenerator::new(config.openai.clone())?;
    let services = SessionServices::new(
        Arc::new(SystemClock),
        Arc::new(InMemorySessionStore::new()),
        Arc::new(generator),
        config.engine,
    );
    let sweeper = ExpirySweeper::spawn(services.clone());

    let app = questline_api::build_app(AppState::new(services));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.shutdown().await;
    tracing::info!("Questline API server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
