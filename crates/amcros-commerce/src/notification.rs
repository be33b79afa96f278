//! Broadcast notifications.

use crate::error::CommerceError;
use crate::ids::NotificationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification shown to every user. There is no per-user read state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Store-assigned key; not part of the document body.
    #[serde(skip)]
    pub id: Option<NotificationId>,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn with_id(mut self, id: NotificationId) -> Self {
        self.id = Some(id);
        self
    }
}

/// An admin's draft before it is broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub title: String,
    pub description: String,
}

impl NewNotification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Trim both fields and stamp the creation time.
    pub fn into_notification(self, now: DateTime<Utc>) -> Result<Notification, CommerceError> {
        let title = self.title.trim();
        let description = self.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(CommerceError::ValidationError(
                "notification needs a title and a message".to_string(),
            ));
        }
        Ok(Notification {
            id: None,
            title: title.to_string(),
            description: description.to_string(),
            created_at: now,
        })
    }
}

/// Newest first.
pub fn sort_newest_first(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
