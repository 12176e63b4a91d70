//! Webhook HTTP server
//!
//! Exposes two endpoints:
//! - `POST {webhook-path}` - Telegram update delivery
//! - `GET /health` - liveness check
//!
//! Every update that passes the secret check is acknowledged with 200, even
//! when it can't be parsed or processing fails, so Telegram doesn't redeliver.

use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;

use super::{process_update, Update};
use crate::application::errors::BotError;
use crate::application::messaging::{Dispatcher, MessageParser};
use crate::domain::traits::Bot;

/// Header Telegram echoes the configured secret token in
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// How many update ids to remember for redelivery detection
const RECENT_CAPACITY: usize = 1024;

/// Bounded memory of recently seen update ids
#[derive(Debug)]
pub struct RecentUpdates {
    capacity: usize,
    inner: Mutex<RecentInner>,
}

#[derive(Debug, Default)]
struct RecentInner {
    order: VecDeque<i64>,
    seen: HashSet<i64>,
}

impl RecentUpdates {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(RecentInner::default()),
        }
    }

    /// Remember `update_id`; false if it was already seen
    pub fn first_seen(&self, update_id: i64) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !inner.seen.insert(update_id) {
            return false;
        }
        inner.order.push_back(update_id);
        if inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.seen.remove(&oldest);
            }
        }
        true
    }
}

/// Shared state of the webhook handlers
#[derive(Clone)]
pub struct WebhookState {
    bot: Arc<dyn Bot>,
    dispatcher: Arc<Dispatcher>,
    parser: Arc<MessageParser>,
    secret_token: Option<String>,
    recent: Arc<RecentUpdates>,
}

impl WebhookState {
    pub fn new(
        bot: Arc<dyn Bot>,
        dispatcher: Arc<Dispatcher>,
        parser: MessageParser,
        secret_token: Option<String>,
    ) -> Self {
        Self {
            bot,
            dispatcher,
            parser: Arc::new(parser),
            secret_token: secret_token.filter(|s| !s.is_empty()),
            recent: Arc::new(RecentUpdates::new(RECENT_CAPACITY)),
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.secret_token else {
            return true;
        };
        headers
            .get(SECRET_HEADER)
            .map(|value| constant_time_eq(value.as_bytes(), expected.as_bytes()))
            .unwrap_or(false)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Build the webhook router
pub fn router(state: WebhookState, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(receive_update))
        .route("/health", get(health))
        .with_state(state)
}

/// Router with only the liveness endpoint, served alongside long polling
pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}

/// Bind `host:port` and serve until `shutdown` resolves
pub async fn serve<F>(host: &str, port: u16, app: Router, shutdown: F) -> Result<(), BotError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|e| BotError::Network(format!("Failed to bind {}:{}: {}", host, port, e)))?;

    tracing::info!("Webhook server listening on http://{}:{}", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| BotError::Internal(format!("Webhook server failed: {}", e)))
}

async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !state.authorized(&headers) {
        tracing::warn!("Rejected webhook call with missing or wrong secret token");
        return StatusCode::UNAUTHORIZED;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed update payload, acknowledging anyway");
            return StatusCode::OK;
        }
    };

    if !state.recent.first_seen(update.update_id) {
        tracing::debug!(update_id = update.update_id, "Duplicate delivery ignored");
        return StatusCode::OK;
    }

    tokio::spawn(async move {
        if let Err(e) =
            process_update(state.bot.as_ref(), &state.dispatcher, &state.parser, &update).await
        {
            tracing::error!(update_id = update.update_id, error = %e, "Failed to handle update");
        }
    });

    StatusCode::OK
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}
