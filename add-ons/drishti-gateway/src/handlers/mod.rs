//! HTTP surface: router, shared state, and the read-only endpoints.

mod guidance;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use drishti_core::{resolve_view, GuidanceEngine, DEFAULT_LOCALE, SUPPORTED_LOCALES};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

/// Shared application state. Cheap to clone; the engine is `Arc`-backed.
#[derive(Clone)]
pub struct AppState {
    pub engine: GuidanceEngine,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: GuidanceEngine) -> Self {
        Self {
            engine,
            started_at: Utc::now(),
        }
    }
}

/// Builds the gateway router. CORS is permissive: the engine holds no
/// secrets and every mutation is a generation request.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/guidance", post(guidance::resolve_guidance))
        .route("/api/patterns", get(list_patterns))
        .route("/api/locales", get(list_locales))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct PatternsQuery {
    #[serde(default)]
    locale: Option<String>,
}

#[derive(Serialize)]
struct PatternSummary {
    id: String,
    name: String,
    modern_context: String,
    keywords: Vec<String>,
}

/// Catalog listing, localized for the requested locale. Backs the
/// theme-chooser on the consuming side.
async fn list_patterns(
    State(state): State<AppState>,
    Query(query): Query<PatternsQuery>,
) -> Json<serde_json::Value> {
    let locale = drishti_core::normalize_locale(query.locale.as_deref().unwrap_or(""));
    let patterns: Vec<PatternSummary> = state
        .engine
        .catalog()
        .iter()
        .map(|pattern| {
            let view = resolve_view(pattern, &locale);
            PatternSummary {
                id: view.id,
                name: view.name,
                modern_context: view.modern_context,
                keywords: pattern.keywords.clone(),
            }
        })
        .collect();
    Json(serde_json::json!({ "locale": locale, "patterns": patterns }))
}

async fn list_locales() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "default": DEFAULT_LOCALE,
        "supported": SUPPORTED_LOCALES,
    }))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::GATEWAY_VERSION,
        "started_at": state.started_at.to_rfc3339(),
        "catalog_patterns": state.engine.catalog().len(),
        "cache_entries": state.engine.cache_len(),
        "stats": state.engine.stats(),
    }))
}
