//! Generic persistence collaborator.
//!
//! Every entity of the restaurant domain is stored through the same
//! [`Repository`] shape: find by id, list, list by foreign key, save and
//! delete. [`InMemoryRepository`] is the implementation used by the server
//! and the tests.

pub mod error;
pub mod memory;
pub mod record;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryRepository;
pub use record::Record;
pub use store::{Repository, RepositoryExt};
