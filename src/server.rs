//! HTTP side of the relay.
//!
//! Every webhook request gets its own dispatch of the handler tree. The
//! dispatch runs in a spawned task that is joined before the response is
//! built, so all outbound Telegram calls have finished when the platform sees
//! the acknowledgement.

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
};
use serde::de::IgnoredAny;
use serde_json::json;
use teloxide::{prelude::*, types::Update};
use tracing::{error, info, warn};

use crate::{
    BoxError,
    api::ApiClient,
    config::{AppConfig, ConfigError},
    conversation::Conversations,
    error::RelayResult,
    handlers::get_update_handler,
    rules::RuleSet,
};

pub const ACK_BODY: &str = "OK";
pub const LIVENESS_BODY: &str = "Hello! Telegram Bot is waiting for POST requests.";
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Everything a dispatch needs, shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: ApiClient,
    pub rules: Arc<RuleSet>,
    pub conversations: Conversations,
    bot: Option<Bot>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, BoxError> {
        let api = ApiClient::new(&config)?;
        let rules = RuleSet::standard()?;
        let bot = config.token.as_deref().map(Bot::new);
        Ok(Self {
            config: Arc::new(config),
            api,
            rules: Arc::new(rules),
            conversations: Conversations::new(),
            bot,
        })
    }

    /// Replace the Telegram client, e.g. to point it at another API server.
    pub fn with_bot(mut self, bot: Bot) -> Self {
        self.bot = Some(bot);
        self
    }

    pub fn bot(&self) -> Result<Bot, ConfigError> {
        self.bot
            .clone()
            .ok_or(ConfigError::MissingEnv("TELEGRAM_TOKEN"))
    }

    /// Run one update through a fresh handler tree. `Ok(false)` means no
    /// handler matched.
    pub async fn dispatch(&self, bot: Bot, update: Update) -> RelayResult<bool> {
        let handler = get_update_handler();
        let deps = dptree::deps![
            bot,
            update,
            self.config.clone(),
            self.api.clone(),
            self.rules.clone(),
            self.conversations.clone()
        ];

        match handler.dispatch(deps).await {
            ControlFlow::Break(result) => result.map(|()| true),
            ControlFlow::Continue(_) => Ok(false),
        }
    }
}

pub async fn health_handler() -> axum::Json<serde_json::Value> {
    axum::Json(json!({ "status": "ok" }))
}

pub async fn liveness_handler() -> &'static str {
    LIVENESS_BODY
}

pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    if let Some(secret) = state.config.webhook_secret.as_deref() {
        let given = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if given != Some(secret) {
            warn!("Rejected webhook call with a wrong secret token");
            return (StatusCode::UNAUTHORIZED, "Unauthorized");
        }
    }

    if body.is_empty() {
        warn!("Rejected webhook call with an empty body");
        return (StatusCode::BAD_REQUEST, "Empty body");
    }

    if let Err(e) = serde_json::from_slice::<IgnoredAny>(&body) {
        warn!("Rejected webhook call with malformed JSON: {e}");
        return (StatusCode::BAD_REQUEST, "Malformed JSON");
    }

    let bot = match state.bot() {
        Ok(bot) => bot,
        Err(e) => {
            error!("Cannot process update: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Bot token not configured");
        }
    };

    // Decoded from the raw bytes: teloxide's `Update` does not round-trip
    // through `serde_json::Value`. Answered with 200 so Telegram does not
    // redeliver an update we can never read.
    let update: Update = match serde_json::from_slice(&body) {
        Ok(u) => u,
        Err(e) => {
            warn!("Ignoring payload that is not an update: {e}");
            return (StatusCode::OK, ACK_BODY);
        }
    };

    let update_id = update.id.0;
    info!("Update received: update_id = {update_id}");

    let relay = state.clone();
    let task = tokio::spawn(async move { relay.dispatch(bot, update).await });

    match task.await {
        Ok(Ok(true)) => (StatusCode::OK, ACK_BODY),
        Ok(Ok(false)) => {
            info!("No handler for update {update_id}");
            (StatusCode::OK, ACK_BODY)
        }
        Ok(Err(e)) => {
            error!("Dispatch of update {update_id} failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
        Err(e) => {
            error!("Dispatch task for update {update_id} aborted: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// Liveness on `GET`, webhook on `POST`, for both `/` and `/api/webhook`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(liveness_handler).post(webhook_handler))
        .route("/api/webhook", get(liveness_handler).post(webhook_handler))
        .with_state(state)
}
