use std::any::Any;
use std::collections::HashMap;

use crate::model::Id;
use crate::persistence::{Record, Store};
use crate::utils::error::StoreError;

type Row = Box<dyn Any + Send + Sync>;

/// In-process store. Tables keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: HashMap<&'static str, Vec<Row>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows<R: Record>(&self) -> impl Iterator<Item = &R> {
        self.tables
            .get(R::TABLE)
            .into_iter()
            .flatten()
            .filter_map(|row| row.downcast_ref::<R>())
    }

    fn rows_mut<R: Record>(&mut self) -> impl Iterator<Item = &mut R> {
        self.tables
            .get_mut(R::TABLE)
            .into_iter()
            .flatten()
            .filter_map(|row| row.downcast_mut::<R>())
    }
}

impl Store for MemoryStore {
    fn get<R: Record>(&self, id: &Id) -> Result<Option<R>, StoreError> {
        Ok(self.rows::<R>().find(|r| r.id() == id).cloned())
    }

    fn list<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.rows::<R>().cloned().collect())
    }

    fn insert<R: Record>(&mut self, record: R) -> Result<(), StoreError> {
        if self.rows::<R>().any(|r| r.id() == record.id()) {
            return Err(StoreError::Duplicate {
                table: R::TABLE,
                id: record.id().clone(),
            });
        }
        self.tables
            .entry(R::TABLE)
            .or_default()
            .push(Box::new(record));
        Ok(())
    }

    fn replace<R: Record>(&mut self, record: R) -> Result<R, StoreError> {
        match self.rows_mut::<R>().find(|r| r.id() == record.id()) {
            Some(slot) => Ok(std::mem::replace(slot, record)),
            None => Err(StoreError::Missing {
                table: R::TABLE,
                id: record.id().clone(),
            }),
        }
    }

    fn remove<R: Record>(&mut self, id: &Id) -> Result<Option<R>, StoreError> {
        let Some(table) = self.tables.get_mut(R::TABLE) else {
            return Ok(None);
        };
        let Some(index) = table
            .iter()
            .position(|row| row.downcast_ref::<R>().is_some_and(|r| r.id() == id))
        else {
            return Ok(None);
        };
        Ok(table.remove(index).downcast::<R>().ok().map(|row| *row))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sizes: HashMap<_, _> = self.tables.iter().map(|(t, rows)| (*t, rows.len())).collect();
        f.debug_struct("MemoryStore").field("tables", &sizes).finish()
    }
}
