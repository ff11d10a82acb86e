//! Notification records
//!
//! The admin notification feed and the order-confirmation log, both
//! persisted append-only.

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Admin-facing notification (bell feed entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminNotification {
    pub id: String,
    pub title: String,
    pub message: String,
    /// Order this notification points at, if any
    pub order_id: Option<String>,
    pub timestamp: Timestamp,
    pub read: bool,
}

impl AdminNotification {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        order_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            order_id,
            timestamp: crate::util::now_millis(),
            read: false,
        }
    }
}

/// Order confirmation record (simulated email send)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub email: String,
    pub sent_at: Timestamp,
}
