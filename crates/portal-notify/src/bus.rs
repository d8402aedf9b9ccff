//! Publish/subscribe channel for notifications crossing module boundaries.

use tokio::sync::broadcast;
use tracing::trace;

use crate::event::MfeNotification;

/// Default number of buffered events per subscriber before it lags.
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// Fire-and-forget broadcast of [`MfeNotification`] events.
///
/// Cloning yields another handle onto the same channel.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<MfeNotification>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish to every current subscriber.
    ///
    /// Returns the number of subscribers reached; zero when nobody listens,
    /// which is not an error.
    pub fn publish(&self, notification: MfeNotification) -> usize {
        match self.tx.send(notification) {
            Ok(n) => {
                trace!(receivers = n, "Notification broadcast");
                n
            }
            Err(_) => {
                trace!("No notification subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MfeNotification> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}
