//! Product list screen.
//!
//! Rows are materialized from `read_all` and re-read whenever the store reports a
//! change. The sale button passes the quantity the row was rendered with; the store
//! writes one less than that, whatever it currently holds.

use serde::Serialize;

use stockroom_core::ProductId;
use stockroom_events::{ChangeEnvelope, EventBus, Subscription};
use stockroom_infra::{ProductStore, ProductTable, StoreError, StoreResult};
use stockroom_products::{Product, ProductChange};

use crate::notice::Notice;

/// Currency suffix of price labels.
pub const CURRENCY: &str = "EGP";

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub price_label: String,
    /// Quantity at render time; handed back to the store on sale.
    pub quantity: i64,
    pub sale_label: &'static str,
    pub on_sale: bool,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id_typed(),
            name: product.name().to_string(),
            price_label: format!("{} {CURRENCY}", product.price()),
            quantity: product.quantity(),
            sale_label: product.sale().label(),
            on_sale: product.sale().is_on_sale(),
        }
    }
}

/// List of every product with a per-row sale action.
pub struct ListScreen<'s, T, B> {
    store: &'s ProductStore<T, B>,
    changes: Subscription<ChangeEnvelope<ProductChange>>,
    rows: Vec<ProductRow>,
    stale: bool,
}

impl<'s, T, B> ListScreen<'s, T, B>
where
    T: ProductTable,
    B: EventBus<ChangeEnvelope<ProductChange>>,
{
    /// Subscribe to changes, then render the current rows.
    pub fn open(store: &'s ProductStore<T, B>) -> StoreResult<Self> {
        let changes = store.subscribe();
        let mut screen = Self {
            store,
            changes,
            rows: Vec::new(),
            stale: true,
        };
        screen.refresh()?;
        Ok(screen)
    }

    pub fn rows(&self) -> &[ProductRow] {
        &self.rows
    }

    /// Whether the empty-state view should be shown instead of the list.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: ProductId) -> Option<&ProductRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Whether a change arrived since the last refresh.
    pub fn is_stale(&mut self) -> bool {
        if self.changes.drain() > 0 {
            self.stale = true;
        }
        self.stale
    }

    /// Re-read every row.
    pub fn refresh(&mut self) -> StoreResult<()> {
        // Changes that land after the drain flag the next refresh.
        self.changes.drain();
        let products = self.store.read_all()?;
        self.rows = products.iter().map(ProductRow::from).collect();
        self.stale = false;
        tracing::debug!(rows = self.rows.len(), "product list refreshed");
        Ok(())
    }

    /// Refresh only when a change was reported. Returns whether rows were re-read.
    pub fn refresh_if_stale(&mut self) -> StoreResult<bool> {
        if !self.is_stale() {
            return Ok(false);
        }
        self.refresh()?;
        Ok(true)
    }

    /// Sell one unit of the product shown in row `id`.
    ///
    /// Returns the notice to show, if any; a recorded sale shows none.
    pub fn sell(&mut self, id: ProductId) -> Option<Notice> {
        let Some(quantity) = self.row(id).map(|r| r.quantity) else {
            return Some(Notice::SaleFailed);
        };

        match self.store.decrement_quantity(id, quantity) {
            Ok(0) => Some(Notice::SaleFailed),
            Ok(_) => None,
            Err(StoreError::OutOfStock(_)) => Some(Notice::OutOfStock),
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "sale failed");
                Some(Notice::SaleFailed)
            }
        }
    }
}
