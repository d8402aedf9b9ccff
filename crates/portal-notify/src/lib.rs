//! Cross-module notifications for the banking portal.
//!
//! Remotes report outcomes as [`MfeNotification`] events. Each event goes
//! to two sinks at once:
//!
//! ```text
//!  remote (oms)                              host shell (core)
//! ┌────────────────────────┐               ┌──────────────────────────┐
//! │ NotificationDispatcher │── publish ──▶ │ NotificationBus          │
//! │   └─ local inbox (50)  │               │   └─ run_host_listener   │
//! └────────────────────────┘               │        └─ host inbox (50)│
//!                                          └──────────────────────────┘
//! ```
//!
//! The bus is handed to each module at composition time; there is no
//! hidden global. Delivery across the bus is asynchronous and listeners
//! must not assume ordering relative to the local inbox.

pub mod bus;
pub mod dispatcher;
pub mod event;
pub mod inbox;
pub mod listener;

pub use bus::{NotificationBus, DEFAULT_BUS_CAPACITY};
pub use dispatcher::NotificationDispatcher;
pub use event::{MfeNotification, NotificationKind, NOTIFICATION_EVENT};
pub use inbox::{NotificationInbox, NotificationItem, DEFAULT_INBOX_CAPACITY};
pub use listener::run_host_listener;
