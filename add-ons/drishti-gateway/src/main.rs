//! Axum-based API gateway for the guidance engine.
//!
//! Wires the pattern catalog, the FIFO guidance cache, and the generation
//! bridge into a [`drishti_core::GuidanceEngine`] and exposes it over HTTP.
//! Configuration comes from `.env` (engine toggles) and `user_config.toml`
//! (generator credentials).

mod handlers;

use std::sync::Arc;

use drishti_core::{
    GuidanceBridge, GuidanceCache, GuidanceConfig, GuidanceEngine, PatternCatalog, UserConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use handlers::AppState;

/// Gateway version from Cargo.toml.
pub const GATEWAY_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PORT: u16 = 8787;

fn env_port() -> u16 {
    match std::env::var("DRISHTI_PORT") {
        Ok(v) => v.trim().parse().unwrap_or(DEFAULT_PORT),
        Err(_) => DEFAULT_PORT,
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GuidanceConfig::from_env();

    let catalog = match PatternCatalog::load(config.patterns_path.as_deref()) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!(error = %err, "failed to load pattern catalog");
            std::process::exit(1);
        }
    };
    tracing::info!(patterns = catalog.len(), "pattern catalog loaded");

    let user_config = UserConfig::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "user_config.toml unreadable; falling back to environment");
        UserConfig::default()
    });
    let Some(bridge) = GuidanceBridge::from_config(&user_config) else {
        tracing::error!(
            "no generator API key configured; set DRISHTI_API_KEY (or OPENROUTER_API_KEY) \
             or add api_key to user_config.toml"
        );
        std::process::exit(1);
    };
    tracing::info!(model = bridge.model(), "generation bridge ready");

    let cache = Arc::new(GuidanceCache::new(config.cache_capacity));
    let engine = GuidanceEngine::new(catalog, cache, Arc::new(bridge), &config);

    let state = AppState::new(engine);
    let app = handlers::build_router(state);

    let port = env_port();
    let addr = format!("0.0.0.0:{port}");
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind gateway listener");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, version = GATEWAY_VERSION, "drishti gateway listening");

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "gateway server exited with error");
        std::process::exit(1);
    }
}
