// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP ingest surface for trigger messages.
//!
//! The stream transport (a Kafka consumer bridge in the reference
//! deployment) delivers chat events here as JSON. Accepted events are
//! queued for the worker loop; the response says only that the event was
//! queued, never whether it produced an unfurl.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use unfurlbot_core::{SenderKind, TriggerMessage};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct IngestState {
    /// Queue feeding the worker loop.
    pub queue: mpsc::Sender<TriggerMessage>,
    /// Service name reported by the health endpoint.
    pub service_name: String,
}

/// Request body for POST /ingest: one chat message event.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Conversation the message was posted in.
    pub channel: String,
    /// Raw message text.
    pub text: String,
    /// Slack timestamp of the message.
    pub ts: String,
    /// Thread root timestamp, when the message is a threaded reply.
    #[serde(default)]
    pub thread_ts: Option<String>,
    /// Posting bot's ID; presence marks the sender as a bot.
    #[serde(default)]
    pub bot_id: Option<String>,
    /// Timestamp of the last edit, if the event is an edit.
    #[serde(default)]
    pub edited_ts: Option<String>,
}

impl IngestRequest {
    fn into_trigger_message(self) -> TriggerMessage {
        let sender = if self.bot_id.is_some() {
            SenderKind::Bot
        } else {
            SenderKind::Human
        };
        TriggerMessage {
            channel: self.channel,
            thread_ts: self.thread_ts,
            ts: self.ts,
            text: self.text,
            sender,
            edited_ts: self.edited_ts,
        }
    }
}

/// Response body for accepted events.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// Always `"queued"`.
    pub status: &'static str,
}

/// Response body for GET /healthz.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service name from configuration.
    pub name: String,
    /// Binary version.
    pub version: &'static str,
    /// Health status string.
    pub status: &'static str,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Build the ingest router.
pub fn router(state: IngestState) -> Router {
    Router::new()
        .route("/ingest", post(post_ingest))
        .route("/healthz", get(get_healthz))
        .with_state(state)
}

/// POST /ingest
///
/// Queues one chat event for processing. Returns 202 once queued; a full
/// queue is reported as 503 so the transport can back off and redeliver.
pub async fn post_ingest(
    State(state): State<IngestState>,
    Json(body): Json<IngestRequest>,
) -> Response {
    if body.channel.is_empty() || body.ts.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "channel and ts must be non-empty".to_string(),
            }),
        )
            .into_response();
    }

    let message = body.into_trigger_message();
    debug!(channel = %message.channel, ts = %message.ts, "event received");

    match state.queue.try_send(message) {
        Ok(()) => (StatusCode::ACCEPTED, Json(IngestResponse { status: "queued" })).into_response(),
        Err(mpsc::error::TrySendError::Full(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "ingest queue full, retry later".to_string(),
            }),
        )
            .into_response(),
        Err(mpsc::error::TrySendError::Closed(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "service shutting down".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /healthz
pub async fn get_healthz(State(state): State<IngestState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        name: state.service_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}
