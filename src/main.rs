//! Application entry point for the `sensornode-relay` service.
//!
//! This binary orchestrates the full startup sequence for the relay,
//! including:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Building the store client and command dispatcher once
//! - Spawning the background poll loop
//! - Mounting all API routes via the `routes` gateway (EMBP pattern)
//! - Binding the Axum HTTP server and serving requests until Ctrl-C
//!
//! # Environment Variables
//! - `STORE_URL` (**required**) – real-time store base URL
//! - `RELAY_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `RELAY_SPAN_EVENTS` (optional) – span event mode for tracing
//! - see `config.rs` for the full list
//!
//! This module follows the Explicit Module Boundary Pattern (EMBP) by
//! delegating configuration parsing to `config`, the poll cycle to `poll`,
//! and route registration to `routes`.
use std::env;

use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::Result;

use sensornode_relay::{
    config, poll,
    routes::{self, AppState},
    CommandDispatcher, StoreClient,
};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    // One store connection object for the whole process, shared by handle
    let store = StoreClient::from_config(&cfg)?;
    let dispatcher = CommandDispatcher::from_config(&cfg)?;

    tokio::spawn(poll::run_poll_loop(store.clone(), cfg.clone()));

    let addr = cfg.bind_addr;

    // Build app from routes gateway (EMBP)
    let app: Router = routes::router(AppState {
        store,
        dispatcher,
        config: cfg,
    });

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind '{}': {}", addr, e))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Relay stopped");
    Ok(())
}

// ---

async fn shutdown_signal() {
    // ---
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `RELAY_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by the `RELAY_LOG_LEVEL` env var
///
/// Called once at startup, after `.env` is loaded so its values apply.
fn init_tracing() {
    // ---
    let span_events = match env::var("RELAY_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    // Determine if we should use colors
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to RELAY_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("RELAY_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},hyper=warn,hyper_util=warn,reqwest=info"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
