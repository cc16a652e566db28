//! Product store: the sole gateway to persisted product rows.
//!
//! ```text
//! caller
//!   ↓ validate fields (fail fast, nothing written)
//!   ↓ take the writer gate (one write at a time)
//!   ↓ apply to the table
//!   ↓ publish a ProductChange (rows affected > 0 only)
//! ```
//!
//! Reads skip the writer gate; the table guarantees they never see half a write.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use stockroom_core::ProductId;
use stockroom_events::{ChangeEnvelope, EventBus, InMemoryEventBus, Subscription};
use stockroom_products::contract::PATH_PRODUCTS;
use stockroom_products::{Column, Product, ProductChange, ProductFields};

use crate::error::{StoreError, StoreResult};
use crate::table::ProductTable;

/// Bus carrying change notifications to list views.
pub type ChangeBus = Arc<InMemoryEventBus<ChangeEnvelope<ProductChange>>>;

/// Snapshot of every product at the time of the read, in id order.
///
/// Iterating does not consume the list; call [`ProductList::iter`] as often as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductList {
    rows: Arc<[Product]>,
}

impl ProductList {
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Product> {
        self.rows.get(index)
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.rows.iter().find(|p| p.id_typed() == id)
    }

    pub fn to_vec(&self) -> Vec<Product> {
        self.rows.to_vec()
    }
}

impl From<Vec<Product>> for ProductList {
    fn from(rows: Vec<Product>) -> Self {
        Self { rows: rows.into() }
    }
}

impl<'a> IntoIterator for &'a ProductList {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Validated, serialized access to a [`ProductTable`], with change notification.
///
/// ## Generic Parameters
///
/// - `T`: table backend (in-memory or SQLite)
/// - `B`: bus receiving one [`ProductChange`] per successful write
#[derive(Debug)]
pub struct ProductStore<T, B = ChangeBus> {
    table: T,
    bus: B,
    writer: Mutex<()>,
    sequence: AtomicU64,
}

impl<T, B> ProductStore<T, B> {
    pub fn new(table: T, bus: B) -> Self {
        Self {
            table,
            bus,
            writer: Mutex::new(()),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn table(&self) -> &T {
        &self.table
    }
}

impl<T> ProductStore<T, ChangeBus> {
    /// Store with its own private change bus.
    pub fn with_table(table: T) -> Self {
        Self::new(table, ChangeBus::default())
    }
}

impl<T, B> ProductStore<T, B>
where
    T: ProductTable,
    B: EventBus<ChangeEnvelope<ProductChange>>,
{
    /// Insert a new product and return its id.
    pub fn create(&self, fields: &ProductFields) -> StoreResult<ProductId> {
        self.reject_invalid("create", fields)?;

        let id = {
            let _gate = self.write_gate()?;
            self.table.insert(fields).inspect_err(|e| self.log_storage_error("create", e))?
        };

        tracing::info!(product_id = %id, backend = self.table.backend_name(), "product created");
        self.notify(ProductChange::Inserted {
            product_id: id,
            occurred_at: Utc::now(),
        });
        Ok(id)
    }

    /// The product with `id`, or `None` when no such row exists.
    pub fn read_one(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let product = self
            .table
            .get(id)
            .inspect_err(|e| self.log_storage_error("read_one", e))?;
        tracing::debug!(product_id = %id, found = product.is_some(), "product read");
        Ok(product)
    }

    /// Like [`read_one`](Self::read_one) but a missing row is [`StoreError::NotFound`].
    pub fn require(&self, id: ProductId) -> StoreResult<Product> {
        self.read_one(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Every product, in insertion order.
    pub fn read_all(&self) -> StoreResult<ProductList> {
        let rows = self
            .table
            .list()
            .inspect_err(|e| self.log_storage_error("read_all", e))?;
        tracing::debug!(rows = rows.len(), "products listed");
        Ok(ProductList::from(rows))
    }

    /// Replace every field of product `id`. Returns 0 when the id does not exist.
    pub fn update(&self, id: ProductId, fields: &ProductFields) -> StoreResult<u64> {
        self.reject_invalid("update", fields)?;

        let rows = {
            let _gate = self.write_gate()?;
            self.table
                .replace(id, fields)
                .inspect_err(|e| self.log_storage_error("update", e))?
        };

        if rows == 0 {
            tracing::warn!(product_id = %id, "update matched no product");
        } else {
            tracing::info!(product_id = %id, "product updated");
            self.notify(ProductChange::Updated {
                product_id: id,
                occurred_at: Utc::now(),
            });
        }
        Ok(rows)
    }

    /// Remove product `id`. Returns 0 when it was already gone.
    pub fn delete(&self, id: ProductId) -> StoreResult<u64> {
        let rows = {
            let _gate = self.write_gate()?;
            self.table
                .remove(id)
                .inspect_err(|e| self.log_storage_error("delete", e))?
        };

        if rows > 0 {
            tracing::info!(product_id = %id, "product deleted");
            self.notify(ProductChange::Deleted {
                product_id: id,
                occurred_at: Utc::now(),
            });
        } else {
            tracing::debug!(product_id = %id, "delete matched no product");
        }
        Ok(rows)
    }

    /// Remove every product. Ids already handed out are not reused.
    pub fn delete_all(&self) -> StoreResult<u64> {
        let rows = {
            let _gate = self.write_gate()?;
            self.table
                .clear()
                .inspect_err(|e| self.log_storage_error("delete_all", e))?
        };

        tracing::info!(rows, "products cleared");
        if rows > 0 {
            self.notify(ProductChange::Cleared {
                rows,
                occurred_at: Utc::now(),
            });
        }
        Ok(rows)
    }

    /// Record one sale given the caller's last known quantity.
    ///
    /// Stores `current_quantity - 1` and returns 1, or 0 when the row vanished.
    /// A `current_quantity` of 0 is [`StoreError::OutOfStock`] and writes nothing.
    /// The stored value is not re-read; see [`sell_one`](Self::sell_one) for that.
    pub fn decrement_quantity(&self, id: ProductId, current_quantity: i64) -> StoreResult<u64> {
        if current_quantity < 0 {
            return Err(StoreError::Validation {
                field: Column::Quantity.name(),
                reason: format!("quantity cannot be negative (got {current_quantity})"),
            });
        }
        if current_quantity == 0 {
            tracing::warn!(product_id = %id, "sale rejected: out of stock");
            return Err(StoreError::OutOfStock(id));
        }

        let quantity = current_quantity - 1;
        let rows = {
            let _gate = self.write_gate()?;
            self.table
                .set_quantity(id, quantity)
                .inspect_err(|e| self.log_storage_error("decrement_quantity", e))?
        };

        if rows == 0 {
            tracing::warn!(product_id = %id, "sale matched no product");
        } else {
            tracing::info!(product_id = %id, quantity, "sale recorded");
            self.notify(ProductChange::QuantityChanged {
                product_id: id,
                quantity,
                occurred_at: Utc::now(),
            });
        }
        Ok(rows)
    }

    /// Read the current quantity and decrement it if positive, as one write.
    pub fn sell_one(&self, id: ProductId) -> StoreResult<Product> {
        let updated = {
            let _gate = self.write_gate()?;
            let product = self
                .table
                .get(id)
                .inspect_err(|e| self.log_storage_error("sell_one", e))?
                .ok_or(StoreError::NotFound(id))?;
            let quantity = product.quantity_after_sale()?;

            // Nothing else writes while the gate is held, so the read is still current.
            self.table
                .set_quantity(id, quantity)
                .inspect_err(|e| self.log_storage_error("sell_one", e))?;

            let mut fields = product.into_fields();
            fields.quantity = quantity;
            Product::new(id, fields)
        };

        tracing::info!(product_id = %id, quantity = updated.quantity(), "sale recorded");
        self.notify(ProductChange::QuantityChanged {
            product_id: id,
            quantity: updated.quantity(),
            occurred_at: Utc::now(),
        });
        Ok(updated)
    }

    /// Register for change notifications.
    pub fn subscribe(&self) -> Subscription<ChangeEnvelope<ProductChange>> {
        self.bus.subscribe()
    }

    /// Release the table's medium. Later operations report `StorageUnavailable`
    /// on backends that hold an external resource.
    pub fn close(&self) {
        // Wait for an in-flight write before closing underneath it.
        let _gate = self.writer.lock();
        self.table.close();
    }

    fn reject_invalid(&self, op: &'static str, fields: &ProductFields) -> StoreResult<()> {
        fields.validate().map_err(|e| {
            tracing::warn!(op, error = %e, "rejected invalid product fields");
            StoreError::from(e)
        })
    }

    fn write_gate(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|_| StoreError::unavailable("writer gate poisoned"))
    }

    fn log_storage_error(&self, op: &'static str, err: &StoreError) {
        tracing::error!(op, backend = self.table.backend_name(), error = %err, "product storage failed");
    }

    fn notify(&self, change: ProductChange) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let envelope = ChangeEnvelope::wrap(PATH_PRODUCTS, sequence, change);
        if let Err(e) = self.bus.publish(envelope) {
            tracing::warn!(sequence, error = ?e, "failed to publish product change");
        }
    }
}
