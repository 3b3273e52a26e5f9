use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use desk_agents::SupportAgent;
use desk_connectors::{
    HttpCommerceClient, HttpKnowledgeClient, HttpTicketingClient, HttpTimeouts, SheetLookup,
};
use desk_core::{ReplyLanguage, WebhookRequest};
use desk_observability::{AppMetrics, MetricsSnapshot};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<SupportAgent>,
    pub metrics: Arc<AppMetrics>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
}

/// Wires the HTTP collaborators from environment configuration and builds
/// the webhook router. Collaborator endpoints without overrides point at
/// localhost stand-ins so a dev instance starts without any setup.
pub fn build_app() -> Result<Router> {
    let metrics = AppMetrics::shared();

    let timeouts = HttpTimeouts {
        connect: Duration::from_secs(6),
        total: Duration::from_secs(
            env::var("DESK_HTTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(20),
        ),
    };

    let knowledge_url = env::var("DESK_KNOWLEDGE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:9101/ask".to_string());
    let ticketing_url = env::var("DESK_TICKETING_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:9102/api/v2".to_string());
    let commerce_url = env::var("DESK_COMMERCE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:9103/api".to_string());

    let knowledge = HttpKnowledgeClient::new(knowledge_url, timeouts)
        .context("failed to build knowledge client")?;
    let ticketing = HttpTicketingClient::new(ticketing_url, timeouts)
        .context("failed to build ticketing client")?;
    let commerce = HttpCommerceClient::new(commerce_url, timeouts)
        .context("failed to build commerce client")?;

    let lookup = match env::var("DESK_FAQ_SHEET") {
        Ok(path) => SheetLookup::from_path(&path)?,
        Err(_) => SheetLookup::empty(),
    };
    if lookup.row_count() == 0 {
        tracing::warn!("FAQ sheet is empty; lookup fallback will never answer");
    }

    let language = ReplyLanguage::from_optional_str(env::var("DESK_LANG").ok().as_deref());

    let agent = Arc::new(SupportAgent::new(
        Arc::new(knowledge),
        Arc::new(lookup),
        Arc::new(ticketing),
        Arc::new(commerce),
        metrics.clone(),
        language,
    ));

    Ok(build_router(ApiState { agent, metrics }))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook/chat", post(webhook_chat))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn webhook_chat(
    State(state): State<ApiState>,
    Json(request): Json<WebhookRequest>,
) -> impl IntoResponse {
    let envelope = state.agent.handle_chat(request).await;
    (StatusCode::OK, Json(envelope))
}
