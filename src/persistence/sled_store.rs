//! Store backed by `sled`
//!
//! Each record table is a sled tree named after [`Record::TABLE`]. Keys are
//! the record id bytes, values the record encoded as JSON. Listing follows
//! key order, not insertion order.

use std::path::Path;

use sled::{Db, Tree};

use crate::model::Id;
use crate::persistence::{Record, Store};
use crate::utils::error::StoreError;

#[derive(Clone)]
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open or create a sled database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            db: sled::open(path)?,
        })
    }

    /// A database that is removed when the last handle drops.
    pub fn temporary() -> Result<Self, StoreError> {
        Ok(Self {
            db: sled::Config::new().temporary(true).open()?,
        })
    }

    /// Flush dirty pages to disk; returns the number of bytes written.
    pub fn flush(&self) -> Result<usize, StoreError> {
        Ok(self.db.flush()?)
    }

    fn tree<R: Record>(&self) -> Result<Tree, StoreError> {
        Ok(self.db.open_tree(R::TABLE)?)
    }
}

fn decode<R: Record>(bytes: &[u8]) -> Result<R, StoreError> {
    Ok(serde_json::from_slice(bytes)?)
}

impl Store for SledStore {
    fn get<R: Record>(&self, id: &Id) -> Result<Option<R>, StoreError> {
        self.tree::<R>()?
            .get(id.as_str())?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn list<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.tree::<R>()?
            .iter()
            .map(|entry| {
                let (_, bytes) = entry?;
                decode(&bytes)
            })
            .collect()
    }

    fn insert<R: Record>(&mut self, record: R) -> Result<(), StoreError> {
        let value = serde_json::to_vec(&record)?;
        self.tree::<R>()?
            .compare_and_swap(record.id().as_str(), None::<&[u8]>, Some(value))?
            .map_err(|_| StoreError::Duplicate {
                table: R::TABLE,
                id: record.id().clone(),
            })
    }

    /// Swaps the stored bytes atomically, so the returned record is exactly
    /// the version this write replaced even with other handles writing.
    fn replace<R: Record>(&mut self, record: R) -> Result<R, StoreError> {
        let tree = self.tree::<R>()?;
        let key = record.id().as_str();
        let value = serde_json::to_vec(&record)?;

        let mut current = tree.get(key)?;
        loop {
            let Some(previous) = current else {
                return Err(StoreError::Missing {
                    table: R::TABLE,
                    id: record.id().clone(),
                });
            };
            match tree.compare_and_swap(key, Some(&previous), Some(value.clone()))? {
                Ok(()) => return decode(&previous),
                Err(conflict) => current = conflict.current,
            }
        }
    }

    fn remove<R: Record>(&mut self, id: &Id) -> Result<Option<R>, StoreError> {
        self.tree::<R>()?
            .remove(id.as_str())?
            .map(|bytes| decode(&bytes))
            .transpose()
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("db", &"sled::Db")
            .finish()
    }
}
