//! Read side over the order notification log.

use std::sync::Arc;

use common::{NotificationId, OrderId};
use store::RepositoryExt;

use crate::error::{DomainError, StoreResultExt};
use crate::locks::KeyedLocks;
use crate::order::{Notification, NotificationKind};
use crate::repositories::Repositories;

/// Queries and read-state updates for notifications.
///
/// Writes take the owning order's lock so they cannot resurrect a
/// notification that a concurrent order removal just deleted.
#[derive(Clone)]
pub struct NotificationService {
    repos: Repositories,
    order_locks: Arc<KeyedLocks<OrderId>>,
}

impl NotificationService {
    pub fn new(repos: Repositories) -> Self {
        Self::with_order_locks(repos, Arc::new(KeyedLocks::new()))
    }

    /// Shares the order locks of a [`RestaurantService`](super::RestaurantService).
    pub fn with_order_locks(repos: Repositories, order_locks: Arc<KeyedLocks<OrderId>>) -> Self {
        Self { repos, order_locks }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Notification>, DomainError> {
        self.repos
            .notifications
            .list_all()
            .await
            .context("listing notifications")
    }

    pub async fn get(&self, id: NotificationId) -> Result<Notification, DomainError> {
        self.repos
            .notifications
            .find_by_id(id)
            .await
            .context("loading notification")
    }

    pub async fn unread(&self) -> Result<Vec<Notification>, DomainError> {
        Ok(self.list().await?.into_iter().filter(|n| !n.is_read).collect())
    }

    pub async fn by_kind(&self, kind: NotificationKind) -> Result<Vec<Notification>, DomainError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|n| n.kind == kind)
            .collect())
    }

    pub async fn for_order(&self, order_id: OrderId) -> Result<Vec<Notification>, DomainError> {
        self.repos
            .notifications
            .list_by("order_id", order_id.as_uuid())
            .await
            .context("listing order notifications")
    }

    #[tracing::instrument(skip(self))]
    pub async fn mark_as_read(&self, id: NotificationId) -> Result<Notification, DomainError> {
        let owner = self.get(id).await?.order_id;
        let _order_guard = self.order_locks.acquire(owner).await;

        // Re-read under the lock; the order may have been removed meanwhile.
        let mut notification = self.get(id).await?;
        if !notification.is_read {
            notification.mark_as_read();
            self.repos
                .notifications
                .save(notification.clone())
                .await
                .context("saving notification")?;
        }
        Ok(notification)
    }

    /// Marks every unread notification as read and returns how many changed.
    #[tracing::instrument(skip(self))]
    pub async fn mark_all_as_read(&self) -> Result<usize, DomainError> {
        let mut count = 0;
        for unread in self.unread().await? {
            let _order_guard = self.order_locks.acquire(unread.order_id).await;
            let current = self
                .repos
                .notifications
                .find_optional(unread.id)
                .await
                .context("loading notification")?;
            let Some(mut notification) = current.filter(|n| !n.is_read) else {
                continue;
            };

            notification.mark_as_read();
            self.repos
                .notifications
                .save(notification)
                .await
                .context("saving notification")?;
            count += 1;
        }
        tracing::debug!(count, "notifications marked as read");
        Ok(count)
    }

    pub async fn formatted_message(&self, id: NotificationId) -> Result<String, DomainError> {
        Ok(self.get(id).await?.formatted_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    async fn seeded() -> (NotificationService, OrderId, Vec<NotificationId>) {
        let repos = Repositories::in_memory();
        let order_id = OrderId::new();
        let mut ids = Vec::new();
        for (message, kind) in [
            ("created", NotificationKind::Info),
            ("rejected", NotificationKind::Warning),
            ("other order", NotificationKind::Info),
        ] {
            let owner = if message == "other order" {
                OrderId::new()
            } else {
                order_id
            };
            let n = Notification::new(owner, message, kind);
            ids.push(n.id);
            repos.notifications.save(n).await.unwrap();
        }
        (NotificationService::new(repos), order_id, ids)
    }

    #[tokio::test]
    async fn filters_by_kind_and_order() {
        let (service, order_id, _) = seeded().await;
        assert_eq!(service.by_kind(NotificationKind::Warning).await.unwrap().len(), 1);
        assert_eq!(service.by_kind(NotificationKind::Error).await.unwrap().len(), 0);
        assert_eq!(service.for_order(order_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn mark_as_read_updates_unread() {
        let (service, _, ids) = seeded().await;
        assert_eq!(service.unread().await.unwrap().len(), 3);

        let n = service.mark_as_read(ids[0]).await.unwrap();
        assert!(n.is_read);
        assert_eq!(service.unread().await.unwrap().len(), 2);

        assert_eq!(service.mark_all_as_read().await.unwrap(), 2);
        assert!(service.unread().await.unwrap().is_empty());
        assert_eq!(service.mark_all_as_read().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mark_as_read_does_not_restore_deleted_notification() {
        let repos = Repositories::in_memory();
        let locks = Arc::new(KeyedLocks::new());
        let service = NotificationService::with_order_locks(repos.clone(), Arc::clone(&locks));

        let order_id = OrderId::new();
        let n = Notification::new(order_id, "created", NotificationKind::Info);
        let id = n.id;
        repos.notifications.save(n).await.unwrap();

        // Hold the order lock as an order removal would.
        let guard = locks.acquire(order_id).await;
        let task = tokio::spawn({
            let service = service.clone();
            async move { service.mark_as_read(id).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        repos
            .notifications
            .delete_by("order_id", order_id.as_uuid())
            .await
            .unwrap();
        drop(guard);

        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(repos.notifications.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_notification_is_not_found() {
        let (service, _, _) = seeded().await;
        let err = service
            .formatted_message(NotificationId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn formatted_message_starts_with_type() {
        let (service, _, ids) = seeded().await;
        let text = service.formatted_message(ids[1]).await.unwrap();
        assert!(text.starts_with("Type: warning\nMessage: rejected\nDate: "));
    }
}
