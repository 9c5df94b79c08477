//! Notification Store
//!
//! Process-wide list of transient, user-facing messages. Each notification
//! with a positive duration removes itself once the duration elapses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::ids::TimestampIds;

pub type NotificationId = i64;

/// How a notification should be presented
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A single user-facing message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    /// Display duration; `None` means it stays until dismissed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Shared, self-expiring notification list
#[derive(Clone)]
pub struct NotificationStore {
    notifications: Arc<RwLock<Vec<Notification>>>,
    ids: Arc<TimestampIds>,
    default_duration: Duration,
}

impl NotificationStore {
    /// Create a store whose notifications expire after `default_duration`
    /// unless told otherwise
    pub fn new(default_duration: Duration) -> Self {
        Self {
            notifications: Arc::new(RwLock::new(Vec::new())),
            ids: Arc::new(TimestampIds::new()),
            default_duration,
        }
    }

    /// Append a notification and schedule its removal
    ///
    /// `None` uses the store default; `Some(Duration::ZERO)` keeps the
    /// notification until it is removed by hand. The scheduled removal is
    /// never cancelled; if the id is already gone it does nothing.
    pub async fn add(
        &self,
        message: impl Into<String>,
        severity: Severity,
        duration: Option<Duration>,
    ) -> NotificationId {
        let duration = duration.unwrap_or(self.default_duration);
        let notification = Notification {
            id: self.ids.next(),
            message: message.into(),
            severity,
            duration_ms: (!duration.is_zero()).then(|| duration.as_millis() as u64),
            created_at: Utc::now(),
        };
        let id = notification.id;

        match severity {
            Severity::Error => tracing::warn!(notification_id = id, message = %notification.message, "Notification raised"),
            _ => tracing::info!(notification_id = id, severity = %severity, message = %notification.message, "Notification raised"),
        }

        self.notifications.write().await.push(notification);

        if !duration.is_zero() {
            let store = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                if store.remove(id).await {
                    tracing::debug!(notification_id = id, "Notification expired");
                }
            });
        }

        id
    }

    /// Shorthand for a success notification with the default duration
    pub async fn success(&self, message: impl Into<String>) -> NotificationId {
        self.add(message, Severity::Success, None).await
    }

    /// Shorthand for an error notification with the default duration
    pub async fn error(&self, message: impl Into<String>) -> NotificationId {
        self.add(message, Severity::Error, None).await
    }

    /// Remove a notification; returns false if it was already gone
    pub async fn remove(&self, id: NotificationId) -> bool {
        let mut notifications = self.notifications.write().await;
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        notifications.len() != before
    }

    /// Snapshot in insertion order
    pub async fn list(&self) -> Vec<Notification> {
        self.notifications.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.notifications.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notifications.read().await.is_empty()
    }

    /// Drop every notification
    pub async fn clear(&self) {
        self.notifications.write().await.clear();
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}
