use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::ProductId;
use stockroom_events::Event;

/// A completed write to the products table.
///
/// Published by the store after the row change is applied; list views treat any change
/// as "cached rows are stale".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductChange {
    Inserted {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    Updated {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    QuantityChanged {
        product_id: ProductId,
        quantity: i64,
        occurred_at: DateTime<Utc>,
    },
    Deleted {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    Cleared {
        rows: u64,
        occurred_at: DateTime<Utc>,
    },
}

impl ProductChange {
    /// The affected product, if the change targeted a single row.
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            ProductChange::Inserted { product_id, .. }
            | ProductChange::Updated { product_id, .. }
            | ProductChange::QuantityChanged { product_id, .. }
            | ProductChange::Deleted { product_id, .. } => Some(*product_id),
            ProductChange::Cleared { .. } => None,
        }
    }
}

impl Event for ProductChange {
    fn event_type(&self) -> &'static str {
        match self {
            ProductChange::Inserted { .. } => "products.product.inserted",
            ProductChange::Updated { .. } => "products.product.updated",
            ProductChange::QuantityChanged { .. } => "products.product.quantity_changed",
            ProductChange::Deleted { .. } => "products.product.deleted",
            ProductChange::Cleared { .. } => "products.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductChange::Inserted { occurred_at, .. }
            | ProductChange::Updated { occurred_at, .. }
            | ProductChange::QuantityChanged { occurred_at, .. }
            | ProductChange::Deleted { occurred_at, .. }
            | ProductChange::Cleared { occurred_at, .. } => *occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_types_are_stable() {
        let now = Utc::now();
        let id = ProductId::new(1);
        let changes = [
            ProductChange::Inserted { product_id: id, occurred_at: now },
            ProductChange::Updated { product_id: id, occurred_at: now },
            ProductChange::QuantityChanged { product_id: id, quantity: 3, occurred_at: now },
            ProductChange::Deleted { product_id: id, occurred_at: now },
            ProductChange::Cleared { rows: 2, occurred_at: now },
        ];
        let types: Vec<_> = changes.iter().map(Event::event_type).collect();
        assert_eq!(
            types,
            [
                "products.product.inserted",
                "products.product.updated",
                "products.product.quantity_changed",
                "products.product.deleted",
                "products.cleared",
            ]
        );
        assert!(changes.iter().all(|c| c.occurred_at() == now));
    }

    #[test]
    fn cleared_has_no_single_product() {
        let change = ProductChange::Cleared { rows: 4, occurred_at: Utc::now() };
        assert_eq!(change.product_id(), None);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let change = ProductChange::Deleted {
            product_id: ProductId::new(9),
            occurred_at: Utc::now(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["kind"], "deleted");
        assert_eq!(json["product_id"], 9);
    }
}
