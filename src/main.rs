//! Project Notes - Projects and notes HTTP service
//!
//! Composition root: builds the single cache instance, the repository and
//! the router, and owns the background sweep for the life of the process.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use project_notes::api::{create_router, ApiCache, AppState};
use project_notes::repository::InMemoryProjectRepository;
use project_notes::{spawn_sweep_task, Config};

/// Main entry point for the service.
///
/// # Startup Sequence
/// 1. Load `.env` if present
/// 2. Initialize tracing subscriber for logging
/// 3. Load configuration from environment variables
/// 4. Create the cache and start the background TTL sweep
/// 5. Create repository, state and router
/// 6. Serve until SIGINT/SIGTERM, then stop the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal
    dotenv::dotenv().ok();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "project_notes=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Project Notes service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, default_ttl={}s, check_period={}s, max_keys={}, eviction={}, resource_ttl={}s",
        config.server_port,
        config.default_ttl,
        config.check_period,
        config.max_keys,
        config.eviction_policy,
        config.resource_ttl
    );

    let cache = ApiCache::from_config(&config);
    let sweeper = spawn_sweep_task(cache.clone(), config.check_period);
    info!("Cache initialized, background sweep started");

    let repository = Arc::new(InMemoryProjectRepository::new());
    let state = AppState::from_config(&config, cache, repository);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweeper.stop().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
