/**
 * Real-time Event Broadcasting
 *
 * Events are broadcast using `tokio::sync::broadcast`. Every subscriber receives a
 * copy of every event and keeps only those addressed to its own profile.
 */

use crate::shared::RealtimeEvent;
use tokio::sync::broadcast;

/// Channel capacity; slower receivers lag and resynchronise by re-fetching
pub const REALTIME_CHANNEL_CAPACITY: usize = 1000;

/// Real-time update event broadcast
pub type RealtimeEventBroadcast = broadcast::Sender<RealtimeEvent>;

/// Create the broadcast channel
pub fn realtime_channel() -> RealtimeEventBroadcast {
    broadcast::channel::<RealtimeEvent>(REALTIME_CHANNEL_CAPACITY).0
}

/// Broadcast a real-time event to all subscribers
///
/// # Returns
///
/// Number of active subscribers that received the event (0 if no subscribers)
pub async fn broadcast_event(broadcast_tx: &RealtimeEventBroadcast, event: RealtimeEvent) -> usize {
    let event_name = event.event_type.as_str();
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] {} event broadcast to {} subscribers", event_name, subscriber_count);
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Realtime] No subscribers to receive {} event", event_name);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_broadcast_event_with_subscribers() {
        let tx = realtime_channel();
        let mut rx = tx.subscribe();

        let recipient = Uuid::new_v4();
        let event = RealtimeEvent::ring(recipient, Uuid::new_v4(), Uuid::new_v4());
        let count = broadcast_event(&tx, event.clone()).await;

        assert_eq!(count, 1);
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_broadcast_event_no_subscribers() {
        let tx = realtime_channel();
        let event = RealtimeEvent::message(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(broadcast_event(&tx, event).await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_multiple_subscribers() {
        let tx = realtime_channel();
        let _sub1 = tx.subscribe();
        let _sub2 = tx.subscribe();
        let _sub3 = tx.subscribe();

        let event = RealtimeEvent::request_status(Uuid::new_v4(), Uuid::new_v4(), "declined");
        assert_eq!(broadcast_event(&tx, event).await, 3);
    }
}
