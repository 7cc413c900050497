//! wh-daemon entry point.
//!
//! Thin by design: loads config, sets up tracing, builds the pool and the
//! receiving service, wires middleware, and starts the HTTP server. Route
//! handlers live in `routes.rs`; shared state types live in `state.rs`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};
use wh_config::UnusedKeyPolicy;
use wh_daemon::{routes, state};
use wh_db::{PgConnectionFactory, Warehouse};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local if present (dev convenience).
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let paths = wh_config::config_paths_from_env();
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let loaded = wh_config::load_layered_yaml(&path_refs)
        .with_context(|| format!("load config layers {paths:?}"))?;
    info!(config_hash = %loaded.config_hash, layers = ?paths, "config loaded");

    let unused = wh_config::report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    if !unused.is_clean() {
        warn!(keys = ?unused.unused_leaf_pointers, "config keys not read by any component");
    }

    let db = wh_config::secrets::resolve_database_url(&loaded.config_json)?;
    let pool_cfg = wh_config::pool_settings(&loaded.config_json)?;
    let pool = wh_db::connect(&db.url, pool_cfg.max_connections, pool_cfg.acquire_timeout)
        .await
        .with_context(|| format!("connect database from {}", db.source_var))?;

    let status = wh_db::status(&pool).await?;
    if !status.has_receipts_table || !status.has_routine {
        warn!(
            has_receipts_table = status.has_receipts_table,
            has_routine = status.has_routine,
            "warehouse schema incomplete; run migrations"
        );
    }

    let receipts = Arc::new(Warehouse::new(PgConnectionFactory::new(pool)));
    let shared = Arc::new(state::AppState::new(receipts));

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let addr = match bind_addr_from_env() {
        Some(addr) => addr,
        None => wh_config::daemon_addr(&loaded.config_json)?,
    };
    info!("wh-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn bind_addr_from_env() -> Option<SocketAddr> {
    std::env::var("WH_DAEMON_ADDR").ok()?.parse().ok()
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c handler failed; shutting down");
    }
    info!("shutdown requested");
}

/// CORS: allow only localhost origins.
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any)
}
