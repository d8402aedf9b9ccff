//! Bounded notification history with read state.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::MfeNotification;

/// Default number of notifications kept.
pub const DEFAULT_INBOX_CAPACITY: usize = 50;

/// A stored notification with its inbox id and read flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: String,
    pub read: bool,
    #[serde(flatten)]
    pub detail: MfeNotification,
}

/// Newest-first notification history.
///
/// Holds at most `capacity` items; adding past capacity evicts the oldest.
/// Cloning yields another handle onto the same history.
#[derive(Debug, Clone)]
pub struct NotificationInbox {
    capacity: usize,
    items: Arc<RwLock<VecDeque<NotificationItem>>>,
}

impl NotificationInbox {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
        }
    }

    /// Insert as unread at the front. Returns the new item's id.
    pub fn add(&self, detail: MfeNotification) -> String {
        let id = Uuid::new_v4().to_string();
        let mut items = self.items.write();
        items.push_front(NotificationItem {
            id: id.clone(),
            read: false,
            detail,
        });
        items.truncate(self.capacity);
        id
    }

    /// Mark one item read. Returns `false` if the id is unknown.
    pub fn mark_as_read(&self, id: &str) -> bool {
        let mut items = self.items.write();
        match items.iter_mut().find(|n| n.id == id) {
            Some(item) => {
                item.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&self) {
        for item in self.items.write().iter_mut() {
            item.read = true;
        }
    }

    pub fn clear_all(&self) {
        self.items.write().clear();
    }

    pub fn unread_count(&self) -> usize {
        self.items.read().iter().filter(|n| !n.read).count()
    }

    /// Snapshot of all items, newest first.
    pub fn items(&self) -> Vec<NotificationItem> {
        self.items.read().iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<NotificationItem> {
        self.items.read().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for NotificationInbox {
    fn default() -> Self {
        Self::new(DEFAULT_INBOX_CAPACITY)
    }
}
