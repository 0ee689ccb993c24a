/**
 * Real-time Subscription Handler
 *
 * Implements `GET /api/realtime`, a Server-Sent Events stream of the caller's own
 * events. Browsers cannot set headers on `EventSource`, so the session token may
 * also be passed as `?token=`.
 *
 * # Connection Management
 *
 * - Connections are kept alive using the SSE keep-alive mechanism
 * - Lagged receivers log the number of skipped events and keep going; clients
 *   re-fetch their lists on the next event anyway
 */

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream};
use tokio::sync::broadcast::{error::RecvError, Receiver};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::auth::{authenticate, bearer_token};
use crate::backend::server::state::AppState;
use crate::shared::RealtimeEvent;

/// Wait for the next event addressed to `profile_id`
///
/// Returns `None` when the channel is closed.
pub async fn next_event_for(rx: &mut Receiver<RealtimeEvent>, profile_id: Uuid) -> Option<RealtimeEvent> {
    loop {
        match rx.recv().await {
            Ok(event) if event.is_for(profile_id) => return Some(event),
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("[Realtime] Receiver lagged, skipped {} events", skipped);
                continue;
            }
            Err(RecvError::Closed) => {
                tracing::debug!("[Realtime] Broadcast channel closed, ending stream");
                return None;
            }
        }
    }
}

/// Handle real-time subscription (GET /api/realtime)
pub async fn handle_realtime_subscription(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, BackendError> {
    let token = bearer_token(&headers)
        .or_else(|| query.get("token").map(String::as_str))
        .ok_or_else(|| BackendError::unauthorized("Authentication required"))?;
    let user = authenticate(&state, token).await?;
    let profile_id = user.profile_id;

    tracing::info!("[Realtime] Subscription opened for {}", profile_id);

    let rx = state.realtime_broadcast.subscribe();
    let stream = stream::unfold(rx, move |mut rx| async move {
        loop {
            let event = next_event_for(&mut rx, profile_id).await?;
            match serde_json::to_string(&event) {
                Ok(data) => {
                    let sse_event = Event::default().event(event.event_type.as_str()).data(data);
                    return Some((Ok(sse_event), rx));
                }
                Err(e) => {
                    tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                    continue;
                }
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::realtime::broadcast::{broadcast_event, realtime_channel};

    #[tokio::test]
    async fn test_events_for_other_profiles_are_skipped() {
        let tx = realtime_channel();
        let mut rx = tx.subscribe();
        let me = Uuid::new_v4();

        broadcast_event(&tx, RealtimeEvent::ring(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())).await;
        let mine = RealtimeEvent::ring(me, Uuid::new_v4(), Uuid::new_v4());
        broadcast_event(&tx, mine.clone()).await;

        assert_eq!(next_event_for(&mut rx, me).await, Some(mine));
    }

    #[tokio::test]
    async fn test_closed_channel_ends_stream() {
        let tx = realtime_channel();
        let mut rx = tx.subscribe();
        drop(tx);
        assert_eq!(next_event_for(&mut rx, Uuid::new_v4()).await, None);
    }
}
