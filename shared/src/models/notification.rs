//! Notification Model

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Order,
    Kitchen,
    Inventory,
    Table,
    Payment,
    System,
}

/// In-app notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub timestamp: Timestamp,
    pub read: bool,
    pub category: NotificationCategory,
}
