//! In-process change-event broadcast
//!
//! Every mutating operation emits a [`ShopEvent`] here immediately after
//! persistence succeeds. Subscribers are presentation components and the
//! notification workers; the engine never waits on them and keeps working
//! when nobody is listening.

use shared::ShopEvent;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Typed publish/subscribe bus owned by the application context
#[derive(Clone)]
pub struct ShopEvents {
    tx: broadcast::Sender<ShopEvent>,
}

impl Default for ShopEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl ShopEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Register a new subscriber; events emitted before this call are not
    /// replayed
    pub fn subscribe(&self) -> broadcast::Receiver<ShopEvent> {
        self.tx.subscribe()
    }

    /// Broadcast an event to all current subscribers
    pub fn emit(&self, event: ShopEvent) {
        tracing::debug!(event = ?event, "Broadcasting shop event");
        // A send error only means there are no subscribers right now
        let _ = self.tx.send(event);
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_emitted_events() {
        let events = ShopEvents::new();
        let mut rx = events.subscribe();

        events.emit(ShopEvent::StockChanged {
            product_id: "prod-1".to_string(),
            stock: 4,
        });

        match rx.recv().await.unwrap() {
            ShopEvent::StockChanged { product_id, stock } => {
                assert_eq!(product_id, "prod-1");
                assert_eq!(stock, 4);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let events = ShopEvents::new();
        assert_eq!(events.subscriber_count(), 0);
        events.emit(ShopEvent::CategoryChanged {
            name: "accessoires".to_string(),
        });
    }
}
