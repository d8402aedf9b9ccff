//! Host-side subscriber that surfaces remote notifications.

use portal_telemetry::Metrics;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{error, info, warn};

use crate::event::{MfeNotification, NotificationKind, NOTIFICATION_EVENT};
use crate::inbox::NotificationInbox;

/// Consume bus events until the channel closes.
///
/// Every event is logged at a level matching its kind and recorded in the
/// host inbox. A lagging receiver skips the missed events and keeps going.
pub async fn run_host_listener(mut rx: Receiver<MfeNotification>, inbox: NotificationInbox) {
    loop {
        match rx.recv().await {
            Ok(notification) => {
                surface(&notification);
                inbox.add(notification);
                Metrics::inbox_unread(inbox.unread_count());
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Host notification listener lagged");
            }
            Err(RecvError::Closed) => {
                info!("Notification bus closed, host listener stopping");
                break;
            }
        }
    }
}

fn surface(n: &MfeNotification) {
    match n.kind {
        NotificationKind::Error => {
            error!(event = NOTIFICATION_EVENT, source = %n.source, title = %n.title, message = %n.message, "Notification")
        }
        NotificationKind::Warning => {
            warn!(event = NOTIFICATION_EVENT, source = %n.source, title = %n.title, message = %n.message, "Notification")
        }
        NotificationKind::Success | NotificationKind::Info => {
            info!(event = NOTIFICATION_EVENT, source = %n.source, kind = %n.kind, title = %n.title, message = %n.message, "Notification")
        }
    }
}
