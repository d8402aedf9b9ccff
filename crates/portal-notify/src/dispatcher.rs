//! Emits a module's notifications to the bus and its local inbox.

use portal_telemetry::Metrics;
use tracing::debug;

use crate::bus::NotificationBus;
use crate::event::{MfeNotification, NotificationKind};
use crate::inbox::NotificationInbox;

/// Per-module notification emitter.
///
/// Both sinks are written before [`dispatch`](Self::dispatch) returns.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    source: String,
    bus: NotificationBus,
    inbox: NotificationInbox,
}

impl NotificationDispatcher {
    pub fn new(source: impl Into<String>, bus: NotificationBus, inbox: NotificationInbox) -> Self {
        Self {
            source: source.into(),
            bus,
            inbox,
        }
    }

    /// Stamp, broadcast and record a notification.
    pub fn dispatch(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> MfeNotification {
        let notification = MfeNotification::now(self.source.clone(), kind, title, message);

        let receivers = self.bus.publish(notification.clone());
        self.inbox.add(notification.clone());
        Metrics::notification(&self.source, kind.as_str());

        debug!(
            source = %self.source,
            kind = %kind,
            title = %notification.title,
            receivers,
            "Notification dispatched"
        );
        notification
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) -> MfeNotification {
        self.dispatch(NotificationKind::Success, title, message)
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) -> MfeNotification {
        self.dispatch(NotificationKind::Error, title, message)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The module-local inbox.
    pub fn inbox(&self) -> &NotificationInbox {
        &self.inbox
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }
}
