use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Record, Result, StoreError, store::Repository};

/// In-memory repository implementation.
///
/// Records are kept in insertion order. Cloning the repository shares the
/// underlying storage.
pub struct InMemoryRepository<R: Record> {
    records: Arc<RwLock<Vec<R>>>,
}

impl<R: Record> InMemoryRepository<R> {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Removes all records.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Clone for InMemoryRepository<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

#[async_trait]
impl<R: Record> Repository<R> for InMemoryRepository<R> {
    async fn find_by_id(&self, id: R::Id) -> Result<R> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(R::record_type(), id))
    }

    async fn list_all(&self) -> Result<Vec<R>> {
        Ok(self.records.read().await.clone())
    }

    async fn list_by(&self, field: &str, value: Uuid) -> Result<Vec<R>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.foreign_key(field) == Some(value))
            .cloned()
            .collect())
    }

    async fn save(&self, record: R) -> Result<R::Id> {
        let id = record.id();
        let mut records = self.records.write().await;

        match records.iter_mut().find(|r| r.id() == id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }

        tracing::trace!(record_type = R::record_type(), %id, "record saved");
        Ok(id)
    }

    async fn delete(&self, id: R::Id) -> Result<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RepositoryExt;

    #[derive(Debug, Clone, PartialEq)]
    struct Line {
        id: Uuid,
        parent: Uuid,
        label: &'static str,
    }

    impl Record for Line {
        type Id = Uuid;

        fn record_type() -> &'static str {
            "Line"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn foreign_key(&self, field: &str) -> Option<Uuid> {
            match field {
                "parent" => Some(self.parent),
                _ => None,
            }
        }
    }

    fn line(parent: Uuid, label: &'static str) -> Line {
        Line {
            id: Uuid::new_v4(),
            parent,
            label,
        }
    }

    #[tokio::test]
    async fn save_and_find() {
        let repo = InMemoryRepository::new();
        let record = line(Uuid::new_v4(), "a");

        let id = repo.save(record.clone()).await.unwrap();
        assert_eq!(id, record.id);
        assert_eq!(repo.find_by_id(id).await.unwrap(), record);
    }

    #[tokio::test]
    async fn save_replaces_existing_record() {
        let repo = InMemoryRepository::new();
        let mut record = line(Uuid::new_v4(), "a");
        repo.save(record.clone()).await.unwrap();

        record.label = "b";
        repo.save(record.clone()).await.unwrap();

        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.find_by_id(record.id).await.unwrap().label, "b");
    }

    #[tokio::test]
    async fn find_missing_is_not_found() {
        let repo: InMemoryRepository<Line> = InMemoryRepository::new();
        let err = repo.find_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(repo.find_optional(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_all_keeps_insertion_order() {
        let repo = InMemoryRepository::new();
        let parent = Uuid::new_v4();
        for label in ["first", "second", "third"] {
            repo.save(line(parent, label)).await.unwrap();
        }

        let labels: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.label)
            .collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn list_by_foreign_key() {
        let repo = InMemoryRepository::new();
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        repo.save(line(p1, "a")).await.unwrap();
        repo.save(line(p2, "b")).await.unwrap();
        repo.save(line(p1, "c")).await.unwrap();

        assert_eq!(repo.list_by("parent", p1).await.unwrap().len(), 2);
        assert_eq!(repo.list_by("parent", p2).await.unwrap().len(), 1);
        assert!(repo.list_by("unknown", p1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_returns_count() {
        let repo = InMemoryRepository::new();
        let record = line(Uuid::new_v4(), "a");
        repo.save(record.clone()).await.unwrap();

        assert_eq!(repo.delete(record.id).await.unwrap(), 1);
        assert_eq!(repo.delete(record.id).await.unwrap(), 0);
        assert!(!repo.exists(record.id).await.unwrap());
    }

    #[tokio::test]
    async fn delete_by_foreign_key() {
        let repo = InMemoryRepository::new();
        let parent = Uuid::new_v4();
        repo.save(line(parent, "a")).await.unwrap();
        repo.save(line(parent, "b")).await.unwrap();
        repo.save(line(Uuid::new_v4(), "c")).await.unwrap();

        assert_eq!(repo.delete_by("parent", parent).await.unwrap(), 2);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = InMemoryRepository::new();
        let other = repo.clone();
        repo.save(line(Uuid::new_v4(), "a")).await.unwrap();
        assert_eq!(other.len().await, 1);

        other.clear().await;
        assert!(repo.is_empty().await);
    }
}
