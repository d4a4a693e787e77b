//! Identity-change notifications.

use confluence_core::models::identity::IdentityEvent;
use tokio::sync::broadcast;

/// Broadcast channel for identity changes.
///
/// Every sign-in and sign-out is published here so that consumers (the
/// submission flow, the dashboard) can react without polling. Dropping
/// a receiver unsubscribes it.
#[derive(Debug, Clone)]
pub struct IdentityEvents {
    tx: broadcast::Sender<IdentityEvent>,
}

impl IdentityEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IdentityEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. A send error only means nobody is listening.
    pub fn emit(&self, event: IdentityEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for IdentityEvents {
    fn default() -> Self {
        Self::new(16)
    }
}
