mod config;
mod error;
mod handlers;
mod lifecycle;
mod platform;
mod router;
mod server;
mod update;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::lifecycle::Lifecycle;
use crate::platform::telegram::TelegramMessenger;
use crate::platform::Messenger;
use crate::router::CommandRouter;
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let started_at = Utc::now();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ledybot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing file is fine, the environment may carry it all
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Bot: {}", config.general.bot_name);
    info!("  Listen: {}", config.listen_addr());
    info!(
        "  Base URL: {}",
        config.telegram.base_url.as_deref().unwrap_or("(not set)")
    );

    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(&config.telegram.bot_token));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    let mut lifecycle = Lifecycle::new(messenger.clone(), config.webhook_url());
    lifecycle.start().await?;
    info!("Lifecycle: {:?}", lifecycle.state());

    let state = Arc::new(AppState::new(
        config,
        CommandRouter::with_default_handlers(),
        messenger,
        started_at,
    ));
    let app = server::build_router(state);

    info!("Webhook server listening on {}", addr);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    info!("Shutting down...");
    if let Err(e) = lifecycle.stop().await {
        error!("Shutdown error: {:#}", e);
    }

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
