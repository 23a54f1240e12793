use async_trait::async_trait;
use uuid::Uuid;

use crate::{Record, Result};

/// Core trait for repository implementations.
///
/// A repository persists one record type. All implementations must be
/// thread-safe (Send + Sync) so services can share them behind an `Arc`.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Retrieves a record by id.
    ///
    /// Fails with `StoreError::NotFound` if the record doesn't exist.
    async fn find_by_id(&self, id: R::Id) -> Result<R>;

    /// Retrieves all records, in insertion order.
    async fn list_all(&self) -> Result<Vec<R>>;

    /// Retrieves all records whose foreign key `field` equals `value`.
    async fn list_by(&self, field: &str, value: Uuid) -> Result<Vec<R>>;

    /// Inserts or replaces a record.
    ///
    /// Returns the id of the saved record.
    async fn save(&self, record: R) -> Result<R::Id>;

    /// Deletes a record by id.
    ///
    /// Returns the number of deleted records (0 or 1).
    async fn delete(&self, id: R::Id) -> Result<u64>;
}

/// Extension trait providing convenience methods for repositories.
#[async_trait]
pub trait RepositoryExt<R: Record>: Repository<R> {
    /// Retrieves a record, mapping a missing record to `None`.
    async fn find_optional(&self, id: R::Id) -> Result<Option<R>> {
        match self.find_by_id(id).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Checks if a record exists.
    async fn exists(&self, id: R::Id) -> Result<bool> {
        Ok(self.find_optional(id).await?.is_some())
    }

    /// Deletes every record whose foreign key `field` equals `value`.
    ///
    /// Returns the number of deleted records.
    async fn delete_by(&self, field: &str, value: Uuid) -> Result<u64> {
        let mut deleted = 0;
        for record in self.list_by(field, value).await? {
            deleted += self.delete(record.id()).await?;
        }
        Ok(deleted)
    }
}

// Blanket implementation for all repositories, including trait objects
impl<R: Record, T: Repository<R> + ?Sized> RepositoryExt<R> for T {}
