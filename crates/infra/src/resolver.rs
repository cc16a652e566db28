//! Content-path addressing over the product store.
//!
//! `products` addresses the collection and `products/<id>` a single row. Both forms may
//! carry the `content://<authority>/` prefix. Raw [`ProductValues`] are validated here,
//! before anything reaches the store.

use core::fmt;
use core::str::FromStr;

use stockroom_core::ProductId;
use stockroom_events::{ChangeEnvelope, EventBus};
use stockroom_products::contract::{
    CONTENT_AUTHORITY, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE, CONTENT_SCHEME, PATH_PRODUCTS,
};
use stockroom_products::{ProductChange, ProductFields, ProductValues};

use crate::error::{StoreError, StoreResult};
use crate::store::{ProductList, ProductStore};
use crate::table::ProductTable;

/// A parsed content path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductUri {
    Collection,
    Item(ProductId),
}

impl ProductUri {
    pub fn parse(raw: &str) -> StoreResult<Self> {
        let path = raw.trim();
        let path = match path.strip_prefix(CONTENT_SCHEME) {
            Some(rest) => rest
                .strip_prefix(CONTENT_AUTHORITY)
                .ok_or_else(|| StoreError::unsupported(raw))?,
            None => path,
        };
        let path = path.trim_start_matches('/');

        let mut segments = path.split('/');
        if segments.next() != Some(PATH_PRODUCTS) {
            return Err(StoreError::unsupported(raw));
        }
        match (segments.next(), segments.next()) {
            (None, _) | (Some(""), None) => Ok(ProductUri::Collection),
            (Some(id), None) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => id
                .parse::<ProductId>()
                .map(ProductUri::Item)
                .map_err(|_| StoreError::unsupported(raw)),
            _ => Err(StoreError::unsupported(raw)),
        }
    }

    /// MIME-like type of the rows this path yields.
    pub fn content_type(self) -> &'static str {
        match self {
            ProductUri::Collection => CONTENT_LIST_TYPE,
            ProductUri::Item(_) => CONTENT_ITEM_TYPE,
        }
    }
}

impl FromStr for ProductUri {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProductUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CONTENT_SCHEME}{CONTENT_AUTHORITY}/{PATH_PRODUCTS}")?;
        if let ProductUri::Item(id) = self {
            write!(f, "/{id}")?;
        }
        Ok(())
    }
}

/// Generic verbs (insert/query/update/delete) dispatched to store operations by path.
#[derive(Debug)]
pub struct ContentResolver<'s, T, B> {
    store: &'s ProductStore<T, B>,
}

impl<'s, T, B> ContentResolver<'s, T, B>
where
    T: ProductTable,
    B: EventBus<ChangeEnvelope<ProductChange>>,
{
    pub fn new(store: &'s ProductStore<T, B>) -> Self {
        Self { store }
    }

    /// Create a product from raw values; only valid on the collection path.
    pub fn insert(&self, uri: &str, values: ProductValues) -> StoreResult<ProductUri> {
        match ProductUri::parse(uri)? {
            ProductUri::Collection => {
                let fields = ProductFields::try_from(values)?;
                let id = self.store.create(&fields)?;
                Ok(ProductUri::Item(id))
            }
            ProductUri::Item(_) => Err(StoreError::unsupported(format!("insert on {uri}"))),
        }
    }

    pub fn query(&self, uri: &str) -> StoreResult<ProductList> {
        match ProductUri::parse(uri)? {
            ProductUri::Collection => self.store.read_all(),
            ProductUri::Item(id) => {
                let rows: Vec<_> = self.store.read_one(id)?.into_iter().collect();
                Ok(rows.into())
            }
        }
    }

    /// Replace every field of one product; only valid on an item path.
    pub fn update(&self, uri: &str, values: ProductValues) -> StoreResult<u64> {
        match ProductUri::parse(uri)? {
            ProductUri::Item(id) => {
                let fields = ProductFields::try_from(values)?;
                self.store.update(id, &fields)
            }
            ProductUri::Collection => Err(StoreError::unsupported(format!("update on {uri}"))),
        }
    }

    /// Delete one product, or every product on the collection path.
    pub fn delete(&self, uri: &str) -> StoreResult<u64> {
        match ProductUri::parse(uri)? {
            ProductUri::Collection => self.store.delete_all(),
            ProductUri::Item(id) => self.store.delete(id),
        }
    }

    pub fn get_type(&self, uri: &str) -> StoreResult<&'static str> {
        ProductUri::parse(uri).map(ProductUri::content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::InMemoryProductTable;

    fn values(name: &str, price: i64, quantity: i64) -> ProductValues {
        ProductValues {
            name: Some(name.into()),
            price: Some(price),
            quantity: Some(quantity),
            ..ProductValues::default()
        }
    }

    #[test]
    fn parses_short_and_qualified_paths() {
        assert_eq!(ProductUri::parse("products").unwrap(), ProductUri::Collection);
        assert_eq!(ProductUri::parse("/products/").unwrap(), ProductUri::Collection);
        assert_eq!(
            ProductUri::parse("content://com.example.android.storeapp/products/7").unwrap(),
            ProductUri::Item(ProductId::new(7))
        );
        assert_eq!("products/12".parse::<ProductUri>().unwrap(), ProductUri::Item(ProductId::new(12)));
    }

    #[test]
    fn rejects_foreign_or_malformed_paths() {
        for raw in [
            "",
            "staff",
            "products/abc",
            "products/-1",
            "products/1/extra",
            "content://com.other.app/products",
        ] {
            assert!(
                matches!(ProductUri::parse(raw), Err(StoreError::UnsupportedUri(_))),
                "{raw:?} should be unsupported"
            );
        }
    }

    #[test]
    fn display_is_fully_qualified() {
        assert_eq!(
            ProductUri::Item(ProductId::new(3)).to_string(),
            "content://com.example.android.storeapp/products/3"
        );
        assert_eq!(
            ProductUri::parse(&ProductUri::Collection.to_string()).unwrap(),
            ProductUri::Collection
        );
    }

    #[test]
    fn content_types_follow_path_shape() {
        let store = ProductStore::with_table(InMemoryProductTable::new());
        let resolver = ContentResolver::new(&store);
        assert_eq!(resolver.get_type("products").unwrap(), CONTENT_LIST_TYPE);
        assert_eq!(resolver.get_type("products/4").unwrap(), CONTENT_ITEM_TYPE);
        assert!(resolver.get_type("orders").is_err());
    }

    #[test]
    fn insert_returns_item_path_of_new_row() {
        let store = ProductStore::with_table(InMemoryProductTable::new());
        let resolver = ContentResolver::new(&store);

        let uri = resolver.insert("products", values("Widget", 10, 5)).unwrap();
        let ProductUri::Item(id) = uri else {
            panic!("expected an item path, got {uri}");
        };
        assert_eq!(store.require(id).unwrap().name(), "Widget");
    }

    #[test]
    fn insert_on_item_path_is_unsupported() {
        let store = ProductStore::with_table(InMemoryProductTable::new());
        let resolver = ContentResolver::new(&store);
        let err = resolver.insert("products/1", values("Widget", 10, 5)).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedUri(_)));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn insert_validates_raw_values() {
        let store = ProductStore::with_table(InMemoryProductTable::new());
        let resolver = ContentResolver::new(&store);

        let mut bad_sale = values("Widget", 10, 5);
        bad_sale.sale = Some(3);
        assert_eq!(resolver.insert("products", bad_sale).unwrap_err().field(), Some("Sale"));

        let no_quantity = ProductValues {
            quantity: None,
            ..values("Widget", 10, 5)
        };
        assert_eq!(resolver.insert("products", no_quantity).unwrap_err().field(), Some("Quantity"));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn query_item_yields_zero_or_one_rows() {
        let store = ProductStore::with_table(InMemoryProductTable::new());
        let resolver = ContentResolver::new(&store);
        resolver.insert("products", values("Widget", 10, 5)).unwrap();

        assert_eq!(resolver.query("products/1").unwrap().len(), 1);
        assert!(resolver.query("products/2").unwrap().is_empty());
        assert_eq!(resolver.query("products").unwrap().len(), 1);
    }

    #[test]
    fn update_only_addresses_single_rows() {
        let store = ProductStore::with_table(InMemoryProductTable::new());
        let resolver = ContentResolver::new(&store);
        resolver.insert("products", values("Widget", 10, 5)).unwrap();

        assert!(matches!(
            resolver.update("products", values("Gadget", 1, 1)),
            Err(StoreError::UnsupportedUri(_))
        ));
        assert_eq!(resolver.update("products/1", values("Gadget", 1, 1)).unwrap(), 1);
        assert_eq!(resolver.update("products/9", values("Gadget", 1, 1)).unwrap(), 0);
        assert_eq!(resolver.query("products/1").unwrap().get(0).unwrap().name(), "Gadget");
    }

    #[test]
    fn delete_on_collection_clears_every_row() {
        let store = ProductStore::with_table(InMemoryProductTable::new());
        let resolver = ContentResolver::new(&store);
        resolver.insert("products", values("Widget", 10, 5)).unwrap();
        resolver.insert("products", values("Gadget", 3, 1)).unwrap();

        assert_eq!(resolver.delete("products/1").unwrap(), 1);
        assert_eq!(resolver.delete("products").unwrap(), 1);
        assert!(resolver.query("products").unwrap().is_empty());
    }
}
