//! Slack Translation Bot Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use slack_translator_config::{load_settings, Settings};
use slack_translator_server::{build_coordinator, create_router, init_metrics, spawn_dispatcher, AppState, DispatchStats};
use slack_translator_slack::{SlackClient, SocketModeClient};

/// Events buffered between the socket reader and the dispatcher
const EVENT_BUFFER: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (need observability settings for tracing init)
    let env = std::env::var("SLACK_TRANSLATOR_ENV").ok();
    let settings = load_settings(env.as_deref()).context("Failed to load configuration")?;

    init_tracing(&settings);

    tracing::info!("Starting Slack Translation Bot v{}", env!("CARGO_PKG_VERSION"));
    for line in settings.summary().lines() {
        tracing::info!("{}", line);
    }

    let slack = SlackClient::from_config(&settings.slack)?;
    let coordinator = Arc::new(build_coordinator(&settings, Arc::new(slack.clone()))?);
    let socket = SocketModeClient::from_config(slack, &settings.slack)?;

    let stats = Arc::new(DispatchStats::default());
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let dispatcher = spawn_dispatcher(coordinator, rx, stats.clone());

    if settings.observability.metrics_enabled {
        init_metrics()?;
        let addr = SocketAddr::from(([0, 0, 0, 0], settings.observability.metrics_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        let app = create_router(AppState::new(settings.clone(), stats));
        tracing::info!("Health and metrics listening on {}", addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "HTTP server stopped");
            }
        });
    }

    tokio::select! {
        _ = socket.run(tx) => {
            tracing::warn!("Socket Mode loop exited");
        }
        _ = shutdown_signal() => {}
    }

    // Sender is gone once the socket future is dropped; let queued events finish
    if let Err(e) = dispatcher.await {
        tracing::error!(error = %e, "Dispatcher task failed");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Initialize tracing (JSON or pretty console output)
fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("slack_translator={level},tower_http=info").into()
    });

    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
