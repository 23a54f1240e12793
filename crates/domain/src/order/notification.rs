//! Order notification log entries.

use chrono::{DateTime, Utc};
use common::{NotificationId, OrderId};
use serde::{Deserialize, Serialize};
use store::Record;
use uuid::Uuid;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(NotificationKind::Info),
            "warning" => Ok(NotificationKind::Warning),
            "error" => Ok(NotificationKind::Error),
            other => Err(format!("unknown notification type '{other}'")),
        }
    }
}

/// A timestamped audit entry attached to an order.
///
/// Notifications are append-only; the only mutation is marking them read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub order_id: OrderId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

impl Notification {
    pub fn new(order_id: OrderId, message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: NotificationId::new(),
            order_id,
            message: message.into(),
            kind,
            timestamp: Utc::now(),
            is_read: false,
        }
    }

    pub fn mark_as_read(&mut self) {
        self.is_read = true;
    }

    /// Human readable rendering used by the notification endpoints.
    pub fn formatted_message(&self) -> String {
        format!(
            "Type: {}\nMessage: {}\nDate: {}",
            self.kind,
            self.message,
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

impl Record for Notification {
    type Id = NotificationId;

    fn record_type() -> &'static str {
        "Notification"
    }

    fn id(&self) -> NotificationId {
        self.id
    }

    fn foreign_key(&self, field: &str) -> Option<Uuid> {
        match field {
            "order_id" => Some(self.order_id.as_uuid()),
            _ => None,
        }
    }
}
