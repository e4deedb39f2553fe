// Framework bootstrap for the pong server runtime.

use crate::frameworks::config;
use crate::interface_adapters::net::{ws_ai_handler, ws_local_handler, ws_remote_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{MatchRegistry, MatchSettings};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves the match routes on `listener` using settings from the environment.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    run_with_settings(listener, config::match_settings()).await
}

pub async fn run_with_settings(
    listener: tokio::net::TcpListener,
    settings: MatchSettings,
) -> Result<()> {
    let address = listener.local_addr()?;
    tracing::debug!(
        tick_interval_us = settings.tick_interval.as_micros(),
        command_channel_capacity = settings.command_channel_capacity,
        event_channel_capacity = settings.event_channel_capacity,
        seeded = settings.rng_seed.is_some(),
        "match settings"
    );

    let state = Arc::new(AppState {
        registry: Arc::new(MatchRegistry::new(settings)),
    });
    let app = router(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_local_handler))
        .route("/ws/ai", get(ws_ai_handler))
        .route("/ws/remote", get(ws_remote_handler))
        .with_state(state)
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}
