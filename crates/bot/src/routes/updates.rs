//! Webhook endpoint receiving chat events.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use conversation::{InboundEvent, Reply};
use dispatch::Transport;
use serde::Serialize;
use store::Store;
use tracing::Instrument;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

/// Longest payload accepted, in characters.
pub const MAX_PAYLOAD_LEN: usize = 4096;

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub update_id: Uuid,
    /// The event arrived too soon after the previous one and was dropped.
    pub throttled: bool,
    pub replies: Vec<Reply>,
}

/// POST /updates: runs one event through throttling, the conversation
/// engine and notification delivery.
pub async fn handle<S: Store + 'static, T: Transport + 'static>(
    State(state): State<Arc<AppState<S, T>>>,
    Json(event): Json<InboundEvent>,
) -> Result<Json<UpdateResponse>, ApiError> {
    if event.payload.chars().count() > MAX_PAYLOAD_LEN {
        return Err(ApiError::BadRequest(format!(
            "payload exceeds {MAX_PAYLOAD_LEN} characters"
        )));
    }

    let update_id = Uuid::new_v4();
    let span = tracing::info_span!("update", %update_id, user_id = %event.source_user_id);
    async move {
        if !state.throttle.allow(event.source_user_id).await {
            metrics::counter!("bot_events_throttled_total").increment(1);
            tracing::debug!("event throttled");
            return Ok::<_, ApiError>(Json(UpdateResponse {
                update_id,
                throttled: true,
                replies: Vec::new(),
            }));
        }

        let kind = match event.kind {
            conversation::EventKind::Text => "text",
            conversation::EventKind::Button => "button",
        };
        metrics::counter!("bot_events_total", "kind" => kind).increment(1);
        let started = Instant::now();

        let outcome = state.engine.handle(event).await;
        metrics::histogram!("bot_event_duration_seconds").record(started.elapsed().as_secs_f64());

        if !outcome.notifications.is_empty() {
            let report = state.dispatcher.dispatch_all(&outcome.notifications).await;
            tracing::debug!(
                delivered = report.delivered,
                failed = report.failed,
                "notifications dispatched"
            );
        }

        Ok(Json(UpdateResponse {
            update_id,
            throttled: false,
            replies: outcome.replies,
        }))
    }
    .instrument(span)
    .await
}
