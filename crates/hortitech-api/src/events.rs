use tokio::sync::broadcast;
use tracing::debug;

use hortitech_core::{Audience, DomainEvent, Notifier};

#[derive(Debug, Clone)]
pub struct RoomMessage {
    pub audience: Audience,
    pub event: DomainEvent,
}

/// Fan-out of domain events to connected WebSocket clients.
pub struct EventBus {
    tx: broadcast::Sender<RoomMessage>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Notifier for EventBus {
    fn broadcast(&self, audience: Audience, event: DomainEvent) {
        if let Err(e) = self.tx.send(RoomMessage { audience, event }) {
            // Nobody connected
            debug!("Event not delivered: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hortitech_core::Room;

    #[tokio::test]
    async fn test_subscribers_receive_broadcasts() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.broadcast(Audience::Admin, DomainEvent::GreenhouseDeleted { greenhouse_id: 7 });

        let message = rx.recv().await.unwrap();
        assert!(message.audience.reaches(Room::Admin));
        assert!(!message.audience.reaches(Room::Operator));
        assert_eq!(message.event, DomainEvent::GreenhouseDeleted { greenhouse_id: 7 });
    }

    #[test]
    fn test_broadcast_without_subscribers_is_silent() {
        let bus = EventBus::new(8);
        bus.broadcast(Audience::All, DomainEvent::GreenhouseUpdated { greenhouse_id: 1 });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
