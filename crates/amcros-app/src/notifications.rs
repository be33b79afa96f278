//! The broadcast notification feed every user sees.

use crate::AppResult;
use amcros_commerce::notification::{sort_newest_first, Notification};
use amcros_commerce::NotificationId;
use amcros_store::{ChangeKind, Collection, DocumentStore, DocumentStoreExt, Subscription};
use std::sync::Arc;

pub struct NotificationFeed {
    store: Arc<dyn DocumentStore>,
}

impl NotificationFeed {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All notifications, newest first.
    pub async fn list(&self) -> AppResult<Vec<Notification>> {
        let rows: Vec<(String, Notification)> =
            self.store.list_as(Collection::Notifications).await?;
        let mut notifications: Vec<Notification> = rows
            .into_iter()
            .map(|(id, n)| n.with_id(NotificationId::new(id)))
            .collect();
        sort_newest_first(&mut notifications);
        Ok(notifications)
    }

    pub fn subscribe(&self) -> NotificationStream {
        NotificationStream {
            inner: self.store.subscribe(Collection::Notifications),
        }
    }
}

/// Yields notifications as they are created.
pub struct NotificationStream {
    inner: Subscription,
}

impl NotificationStream {
    /// The next newly created notification, `None` once the store closes.
    ///
    /// Edits, deletions and undecodable documents are skipped.
    pub async fn next(&mut self) -> Option<Notification> {
        while let Some(event) = self.inner.next().await {
            if event.kind != ChangeKind::Created {
                continue;
            }
            match event.document().map(|doc| doc.decode::<Notification>()) {
                Some(Ok(n)) => return Some(n.with_id(NotificationId::new(event.id.clone()))),
                Some(Err(e)) => {
                    tracing::warn!(id = %event.id, error = %e, "skipping malformed notification");
                }
                None => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amcros_commerce::notification::NewNotification;
    use amcros_store::MemoryStore;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        for (title, age) in [("old", 3), ("new", 0), ("mid", 1)] {
            let n = NewNotification::new(title, "body")
                .into_notification(now - Duration::hours(age))
                .unwrap();
            store.create_as(Collection::Notifications, &n).await.unwrap();
        }

        let list = NotificationFeed::new(store).list().await.unwrap();
        let titles: Vec<_> = list.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["new", "mid", "old"]);
        assert!(list.iter().all(|n| n.id.is_some()));
    }

    #[tokio::test]
    async fn test_stream_yields_created() {
        let store = Arc::new(MemoryStore::new());
        let feed = NotificationFeed::new(store.clone());
        let mut stream = feed.subscribe();

        let n = NewNotification::new("Restock", "5-packs are back")
            .into_notification(Utc::now())
            .unwrap();
        let id = store.create_as(Collection::Notifications, &n).await.unwrap();

        let got = stream.next().await.unwrap();
        assert_eq!(got.title, "Restock");
        assert_eq!(got.id, Some(NotificationId::new(id)));
    }
}
