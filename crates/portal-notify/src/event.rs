//! Notification event contract shared by the host and its remotes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event name every host listens on.
pub const NOTIFICATION_EVENT: &str = "mfe:notification";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    /// Also the fallback for unrecognised kinds on the wire.
    #[serde(other)]
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an `mfe:notification` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MfeNotification {
    /// Emitting module, e.g. `oms`.
    pub source: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl MfeNotification {
    /// Build a notification stamped with the current time.
    pub fn now(
        source: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl fmt::Display for MfeNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MfeNotification {
        MfeNotification {
            source: "oms".to_string(),
            kind: NotificationKind::Success,
            title: "Order Placed Successfully".to_string(),
            message: "BUY MKT order for AAPL placed at USD 8,542.8.".to_string(),
            timestamp: 1_739_874_600_000,
        }
    }

    #[test]
    fn test_payload_matches_event_contract() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["source"], "oms");
        assert_eq!(value["type"], "success");
        assert_eq!(value["title"], "Order Placed Successfully");
        assert_eq!(value["timestamp"], 1_739_874_600_000_i64);
        assert_eq!(value.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_unknown_kind_falls_back_to_info() {
        let json = r#"{"source":"dashboard","type":"debug","title":"t","message":"m","timestamp":0}"#;
        let n: MfeNotification = serde_json::from_str(json).unwrap();
        assert_eq!(n.kind, NotificationKind::Info);
    }

    #[test]
    fn test_display_line() {
        assert_eq!(
            sample().to_string(),
            "[success] Order Placed Successfully: BUY MKT order for AAPL placed at USD 8,542.8."
        );
    }
}
