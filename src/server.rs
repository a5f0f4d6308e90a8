//! HTTP surface: the webhook endpoint plus status routes.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::WebhookError;
use crate::platform::Messenger;
use crate::router::CommandRouter;
use crate::update::{Update, UpdateKind};

/// Everything a request needs, built once by the bootstrap.
pub struct AppState {
    pub config: Config,
    pub router: CommandRouter,
    pub messenger: Arc<dyn Messenger>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        config: Config,
        router: CommandRouter,
        messenger: Arc<dyn Messenger>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            config,
            router,
            messenger,
            started_at,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/webhook/{token}", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "bot": state.config.general.bot_name,
        "mode": "webhook",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn version(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "commit": state.config.general.commit,
        "started": state.started_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        "utc_now": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    }))
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, WebhookError> {
    match process_webhook(&state, &token, &body).await {
        Ok(()) => Ok(Json(json!({ "status": "ok" }))),
        Err(e) => {
            match &e {
                WebhookError::Forbidden => warn!("Rejected webhook call with wrong token"),
                WebhookError::MalformedPayload(_) => warn!("{}", e),
                WebhookError::Processing(_) => error!("{}", e),
            }
            Err(e)
        }
    }
}

/// authorize → parse JSON → decode update → dispatch.
async fn process_webhook(state: &AppState, token: &str, body: &[u8]) -> Result<(), WebhookError> {
    authorize(&state.config, token)?;
    let payload: Value = serde_json::from_slice(body).map_err(WebhookError::MalformedPayload)?;
    let update = Update::from_json(payload)
        .map_err(|e| WebhookError::Processing(anyhow::Error::new(e).context("malformed update")))?;

    log_update(&update);
    state.router.dispatch(&update, state.messenger.as_ref()).await;
    Ok(())
}

fn authorize(config: &Config, token: &str) -> Result<(), WebhookError> {
    if token == config.telegram.bot_token {
        Ok(())
    } else {
        Err(WebhookError::Forbidden)
    }
}

fn log_update(update: &Update) {
    let sender = |id: Option<i64>| id.map_or_else(|| "unknown".to_string(), |id| id.to_string());

    match &update.kind {
        UpdateKind::Message(message) if message.text.is_some() => info!(
            "Update: message from {} - {}",
            sender(message.sender_id),
            message.text.as_deref().unwrap_or_default()
        ),
        UpdateKind::Callback(callback) => info!(
            "Update: callback from {} - {}",
            sender(callback.sender_id),
            callback.data.as_deref().unwrap_or_default()
        ),
        _ => info!("Update: {} of another type", update.id),
    }
}
