//! Notifier port
//!
//! Services receive an implementation by injection; the transport (WebSocket
//! rooms in the API crate) is not visible from here.

use crate::domain::{Audience, DomainEvent};

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Fire-and-forget delivery to every client in the audience.
    fn broadcast(&self, audience: Audience, event: DomainEvent);
}

/// Drops every event. Used where no real-time channel is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn broadcast(&self, _audience: Audience, _event: DomainEvent) {}
}
