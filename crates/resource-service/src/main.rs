//! Resource service binary.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! resource-service --config service.yaml
//!
//! # With environment variables only
//! RESOURCE_SERVER__PORT=9000 RESOURCE_LOGGING__JSON=true resource-service
//! ```

use std::net::SocketAddr;

use axum::http::HeaderName;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use resource_framework::tracing::setup_tracing;
use resource_service::config::ServiceConfig;
use resource_service::http::create_router;
use resource_service::lifecycle::ResourceSystem;

/// Role-gated CRUD service for bikes, cars, movies, books and restaurants
#[derive(Parser, Debug)]
#[command(name = "resource-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML, TOML or JSON)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ServiceConfig::load(args.config.as_deref())?;

    setup_tracing(&config.logging.level, config.logging.json)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting resource service");

    let addr: SocketAddr = config.bind_address().parse()?;
    let role_header = HeaderName::from_bytes(config.auth.role_header.as_bytes())?;

    let system = ResourceSystem::new(config.store.buffer_size);
    let router = create_router(&system, role_header, config.server.body_limit_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    // serve consumes the router, so its handler clones are gone before shutdown
    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(ref e) = served {
        error!("HTTP server error: {}", e);
    }

    system.shutdown().await?;
    info!("Shutdown complete");
    Ok(served?)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
