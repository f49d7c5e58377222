use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::{Json, Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use waratah_catalog::Catalog;
use waratah_core::{chat_reply, nearest, NearbyPlace};
use waratah_observability::{AppMetrics, MetricsSnapshot};

const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<Catalog>,
    pub metrics: Arc<AppMetrics>,
    pub default_city: Arc<str>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_kind() -> String {
    "any".to_string()
}

fn default_limit() -> i64 {
    5
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
}

/// Load the catalog and assemble the router. Any catalog problem is fatal
/// here, before the listener is bound.
pub fn build_app(places_path: impl AsRef<Path>) -> Result<Router> {
    let places_path = places_path.as_ref();
    let catalog = Catalog::load(places_path)
        .with_context(|| format!("failed loading place catalog from {}", places_path.display()))?;

    let default_city = env::var("WARATAH_DEFAULT_CITY")
        .map(|value| value.trim().to_lowercase())
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "sydney".to_string());

    info!(
        places = catalog.len(),
        default_city = %default_city,
        "catalog loaded"
    );

    let state = ApiState {
        catalog: Arc::new(catalog),
        metrics: AppMetrics::shared(),
        default_city: default_city.into(),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/nearby", get(nearby))
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

// The mobile app calls from a file:// webview, so the origin is reflected
// rather than pinned.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        ok: true,
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn chat(
    State(state): State<ApiState>,
    Json(input): Json<ChatRequest>,
) -> impl IntoResponse {
    let started = Instant::now();
    state.metrics.inc_request();
    state.metrics.inc_chat();

    let message = input.message.unwrap_or_default();
    let outcome = chat_reply(
        state.catalog.places(),
        message.trim(),
        input.city.as_deref(),
        &state.default_city,
    );

    if !outcome.matched_city {
        state.metrics.inc_no_data_reply();
    }
    state.metrics.observe_latency(started.elapsed());

    info!(
        city = %outcome_city(&input.city, &state.default_city),
        matched_city = outcome.matched_city,
        message_len = message.len(),
        "chat handled"
    );

    Json(ChatResponse {
        reply: outcome.reply,
    })
}

async fn nearby(
    State(state): State<ApiState>,
    Query(query): Query<NearbyQuery>,
) -> impl IntoResponse {
    let started = Instant::now();
    state.metrics.inc_request();
    state.metrics.inc_nearby();

    let hits: Vec<NearbyPlace> = nearest(
        state.catalog.places(),
        query.lat,
        query.lng,
        &query.kind,
        query.city.as_deref(),
        query.limit,
    );

    state.metrics.observe_latency(started.elapsed());
    info!(
        kind = %query.kind,
        limit = query.limit,
        hits = hits.len(),
        "nearby handled"
    );

    Json(hits)
}

fn outcome_city(requested: &Option<String>, default_city: &str) -> String {
    waratah_core::resolve_city(requested.as_deref(), default_city)
}
