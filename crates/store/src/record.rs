use std::fmt::Display;
use std::hash::Hash;

use uuid::Uuid;

/// A persistable entity.
///
/// Records are addressed by their own id type and may expose foreign keys
/// by field name so that [`Repository::list_by`](crate::Repository::list_by)
/// can filter on them.
pub trait Record: Clone + Send + Sync + 'static {
    /// The identifier type of this record.
    type Id: Copy + Eq + Hash + Display + Send + Sync + 'static;

    /// Returns the record type name, used in errors and logs.
    fn record_type() -> &'static str;

    /// Returns the record's identifier.
    fn id(&self) -> Self::Id;

    /// Returns the value of a foreign key field, if this record has one
    /// with that name.
    fn foreign_key(&self, _field: &str) -> Option<Uuid> {
        None
    }
}
