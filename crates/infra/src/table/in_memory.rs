use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use stockroom_core::ProductId;
use stockroom_products::{Product, ProductFields};

use super::ProductTable;
use crate::error::{StoreError, StoreResult};

#[derive(Debug)]
struct TableState {
    rows: BTreeMap<ProductId, ProductFields>,
    /// Last id handed out; survives deletes so ids are never reused.
    last_id: i64,
}

/// In-memory products table.
///
/// Rows are keyed by id in a `BTreeMap`, so iteration order is insertion order.
/// Intended for tests/dev and for the `:memory:` configuration.
#[derive(Debug)]
pub struct InMemoryProductTable {
    state: RwLock<TableState>,
}

impl InMemoryProductTable {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(TableState {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, TableState>> {
        self.state
            .read()
            .map_err(|_| StoreError::unavailable("products table lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, TableState>> {
        self.state
            .write()
            .map_err(|_| StoreError::unavailable("products table lock poisoned"))
    }
}

impl Default for InMemoryProductTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductTable for InMemoryProductTable {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn insert(&self, fields: &ProductFields) -> StoreResult<ProductId> {
        let mut state = self.write()?;
        state.last_id += 1;
        let id = ProductId::new(state.last_id);
        state.rows.insert(id, fields.clone());
        Ok(id)
    }

    fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let state = self.read()?;
        Ok(state
            .rows
            .get(&id)
            .map(|fields| Product::new(id, fields.clone())))
    }

    fn list(&self) -> StoreResult<Vec<Product>> {
        let state = self.read()?;
        Ok(state
            .rows
            .iter()
            .map(|(id, fields)| Product::new(*id, fields.clone()))
            .collect())
    }

    fn replace(&self, id: ProductId, fields: &ProductFields) -> StoreResult<u64> {
        let mut state = self.write()?;
        match state.rows.get_mut(&id) {
            Some(row) => {
                *row = fields.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn set_quantity(&self, id: ProductId, quantity: i64) -> StoreResult<u64> {
        let mut state = self.write()?;
        match state.rows.get_mut(&id) {
            Some(row) => {
                row.quantity = quantity;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn remove(&self, id: ProductId) -> StoreResult<u64> {
        let mut state = self.write()?;
        Ok(u64::from(state.rows.remove(&id).is_some()))
    }

    fn clear(&self) -> StoreResult<u64> {
        let mut state = self.write()?;
        let removed = state.rows.len() as u64;
        state.rows.clear();
        Ok(removed)
    }
}
