//! In-app notifications
//!
//! State changes go through [`NotificationCenter::dispatch`]; each action is
//! applied in place and the list stays ordered newest first. Ids are
//! sequential per center.

use shared::models::{Notification, NotificationCategory};
use shared::types::Timestamp;
use shared::util::now_millis;

/// Oldest entries are dropped beyond this many
pub const MAX_NOTIFICATIONS: usize = 50;

/// Actions accepted by the notification center
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationAction {
    Add {
        title: String,
        message: String,
        category: NotificationCategory,
    },
    MarkRead(i64),
    MarkAllRead,
    Remove(i64),
    ClearAll,
}

impl NotificationAction {
    pub fn add(
        title: impl Into<String>,
        message: impl Into<String>,
        category: NotificationCategory,
    ) -> Self {
        Self::Add {
            title: title.into(),
            message: message.into(),
            category,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    /// Newest first
    items: Vec<Notification>,
    next_id: i64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action
    ///
    /// Returns the id of the new notification for `Add`, `None` otherwise.
    /// Unknown ids are ignored.
    pub fn dispatch(&mut self, action: NotificationAction) -> Option<i64> {
        match action {
            NotificationAction::Add {
                title,
                message,
                category,
            } => Some(self.push(title, message, category, now_millis())),
            NotificationAction::MarkRead(id) => {
                if let Some(n) = self.items.iter_mut().find(|n| n.id == id) {
                    n.read = true;
                }
                None
            }
            NotificationAction::MarkAllRead => {
                self.items.iter_mut().for_each(|n| n.read = true);
                None
            }
            NotificationAction::Remove(id) => {
                self.items.retain(|n| n.id != id);
                None
            }
            NotificationAction::ClearAll => {
                self.items.clear();
                None
            }
        }
    }

    fn push(
        &mut self,
        title: String,
        message: String,
        category: NotificationCategory,
        timestamp: Timestamp,
    ) -> i64 {
        self.next_id += 1;
        let id = self.next_id;
        tracing::debug!(id, ?category, %title, "Notification added");
        self.items.insert(
            0,
            Notification {
                id,
                title,
                message,
                timestamp,
                read: false,
                category,
            },
        );
        self.items.truncate(MAX_NOTIFICATIONS);
        id
    }

    pub fn list(&self) -> &[Notification] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn by_category(&self, category: NotificationCategory) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.category == category).collect()
    }
}
