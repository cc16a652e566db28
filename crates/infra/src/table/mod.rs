//! Storage backends for the `products` table.
//!
//! A table only moves rows; validation, write serialization and change notification
//! live in [`crate::store::ProductStore`].

pub mod in_memory;
pub mod sqlite;

use std::sync::Arc;

use stockroom_core::ProductId;
use stockroom_products::{Product, ProductFields};

use crate::error::StoreResult;

pub use in_memory::InMemoryProductTable;
pub use sqlite::SqliteProductTable;

/// Row-level access to the `products` table.
///
/// Implementations assign ids on insert (increasing, never reused), return rows in id
/// order, and report the number of rows a write touched. Every read observes either
/// all or none of a write.
pub trait ProductTable: Send + Sync {
    /// Short name for logs ("memory", "sqlite").
    fn backend_name(&self) -> &'static str;

    fn insert(&self, fields: &ProductFields) -> StoreResult<ProductId>;

    fn get(&self, id: ProductId) -> StoreResult<Option<Product>>;

    fn list(&self) -> StoreResult<Vec<Product>>;

    /// Replace every field of row `id`.
    fn replace(&self, id: ProductId, fields: &ProductFields) -> StoreResult<u64>;

    /// Overwrite the quantity of row `id`.
    fn set_quantity(&self, id: ProductId, quantity: i64) -> StoreResult<u64>;

    fn remove(&self, id: ProductId) -> StoreResult<u64>;

    /// Remove every row. Ids handed out so far stay retired.
    fn clear(&self) -> StoreResult<u64>;

    /// Release the underlying medium.
    fn close(&self) {}
}

impl<T> ProductTable for Arc<T>
where
    T: ProductTable + ?Sized,
{
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn insert(&self, fields: &ProductFields) -> StoreResult<ProductId> {
        (**self).insert(fields)
    }

    fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).get(id)
    }

    fn list(&self) -> StoreResult<Vec<Product>> {
        (**self).list()
    }

    fn replace(&self, id: ProductId, fields: &ProductFields) -> StoreResult<u64> {
        (**self).replace(id, fields)
    }

    fn set_quantity(&self, id: ProductId, quantity: i64) -> StoreResult<u64> {
        (**self).set_quantity(id, quantity)
    }

    fn remove(&self, id: ProductId) -> StoreResult<u64> {
        (**self).remove(id)
    }

    fn clear(&self) -> StoreResult<u64> {
        (**self).clear()
    }

    fn close(&self) {
        (**self).close()
    }
}

impl<T> ProductTable for Box<T>
where
    T: ProductTable + ?Sized,
{
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn insert(&self, fields: &ProductFields) -> StoreResult<ProductId> {
        (**self).insert(fields)
    }

    fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).get(id)
    }

    fn list(&self) -> StoreResult<Vec<Product>> {
        (**self).list()
    }

    fn replace(&self, id: ProductId, fields: &ProductFields) -> StoreResult<u64> {
        (**self).replace(id, fields)
    }

    fn set_quantity(&self, id: ProductId, quantity: i64) -> StoreResult<u64> {
        (**self).set_quantity(id, quantity)
    }

    fn remove(&self, id: ProductId) -> StoreResult<u64> {
        (**self).remove(id)
    }

    fn clear(&self) -> StoreResult<u64> {
        (**self).clear()
    }

    fn close(&self) {
        (**self).close()
    }
}
