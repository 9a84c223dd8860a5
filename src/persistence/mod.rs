//! The `persistence` module owns the record store the mutation handlers
//! work against.
//!
//! The store is an explicitly owned value passed to whoever mutates it;
//! there is no process-wide state. Two backends exist:
//! - [`MemoryStore`]: plain in-process tables, the default
//! - [`SledStore`]: one `sled` tree per table with JSON-encoded rows

pub mod memory_store;
pub mod sled_store;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::{Comment, Id, Post, User};
use crate::utils::error::StoreError;

pub use memory_store::MemoryStore;
pub use sled_store::SledStore;

/// A type that can live in a [`Store`] table.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABLE: &'static str;

    fn id(&self) -> &Id;
}

impl Record for User {
    const TABLE: &'static str = "users";

    fn id(&self) -> &Id {
        &self.id
    }
}

impl Record for Post {
    const TABLE: &'static str = "posts";

    fn id(&self) -> &Id {
        &self.id
    }
}

impl Record for Comment {
    const TABLE: &'static str = "comments";

    fn id(&self) -> &Id {
        &self.id
    }
}

/// Record storage used by the mutation handlers.
///
/// Every read returns an owned copy, so whatever a caller holds is a
/// snapshot that later writes cannot change.
pub trait Store {
    fn get<R: Record>(&self, id: &Id) -> Result<Option<R>, StoreError>;

    fn list<R: Record>(&self) -> Result<Vec<R>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] if the id is taken.
    fn insert<R: Record>(&mut self, record: R) -> Result<(), StoreError>;

    /// Overwrites an existing record and returns the previous version.
    /// Fails with [`StoreError::Missing`] if there is nothing to overwrite.
    fn replace<R: Record>(&mut self, record: R) -> Result<R, StoreError>;

    fn remove<R: Record>(&mut self, id: &Id) -> Result<Option<R>, StoreError>;

    /// Removes every record matching `predicate` and returns them.
    fn remove_where<R, F>(&mut self, mut predicate: F) -> Result<Vec<R>, StoreError>
    where
        R: Record,
        F: FnMut(&R) -> bool,
    {
        let doomed: Vec<R> = self
            .list::<R>()?
            .into_iter()
            .filter(|r| predicate(r))
            .collect();
        for record in &doomed {
            self.remove::<R>(record.id())?;
        }
        Ok(doomed)
    }

    /// Removes all comments under `post_id`.
    fn cascade_delete_comments(&mut self, post_id: &Id) -> Result<Vec<Comment>, StoreError> {
        self.remove_where(|c: &Comment| &c.post == post_id)
    }
}
