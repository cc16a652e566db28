//! Table contract: the immutable vocabulary describing the `products` table.
//!
//! Everything that reads or writes rows names tables, columns and sale values through
//! this module rather than spelling string literals.

use serde::{Deserialize, Serialize};

use stockroom_core::DomainError;

/// Name for the whole content provider, unique per installation.
pub const CONTENT_AUTHORITY: &str = "com.example.android.storeapp";

/// Scheme prefix of fully-qualified content paths.
pub const CONTENT_SCHEME: &str = "content://";

/// Collection path appended to the authority (`content://<authority>/products`).
pub const PATH_PRODUCTS: &str = "products";

/// Content type of the collection path (a list of products).
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.example.android.storeapp/products";

/// Content type of an item path (a single product).
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.example.android.storeapp/products";

/// Database table holding one row per product.
pub const TABLE_NAME: &str = "products";

/// Default database file name.
pub const DATABASE_NAME: &str = "store.db";

/// Schema version. Bump whenever the table layout changes; a mismatch wipes the table.
pub const SCHEMA_VERSION: u32 = 2;

/// Raw encoding of [`SaleFlag::NoSale`].
pub const NO_SALE: i64 = 0;

/// Raw encoding of [`SaleFlag::HasSale`].
pub const HAS_SALE: i64 = 1;

/// Returns whether `value` is [`NO_SALE`] or [`HAS_SALE`].
pub const fn is_valid_sale(value: i64) -> bool {
    matches!(value, NO_SALE | HAS_SALE)
}

/// Columns of the `products` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Unique row id. INTEGER PRIMARY KEY AUTOINCREMENT.
    Id,
    /// Product name. TEXT NOT NULL.
    Name,
    /// Price in whole currency units. INTEGER NOT NULL.
    Price,
    /// Sale flag, [`NO_SALE`] or [`HAS_SALE`]. INTEGER NOT NULL DEFAULT 0.
    Sale,
    /// Units in stock. INTEGER NOT NULL.
    Quantity,
    /// Supplier name. TEXT.
    Supplier,
    /// Supplier phone number. TEXT.
    SupplierPhone,
}

impl Column {
    /// Every column, in table order.
    pub const ALL: [Column; 7] = [
        Column::Id,
        Column::Name,
        Column::Price,
        Column::Sale,
        Column::Quantity,
        Column::Supplier,
        Column::SupplierPhone,
    ];

    /// Column identifier as stored in the table.
    pub const fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "Product",
            Column::Price => "Price",
            Column::Sale => "Sale",
            Column::Quantity => "Quantity",
            Column::Supplier => "Supplier",
            Column::SupplierPhone => "Supplier_Phone",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl core::fmt::Display for Column {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a product is currently discounted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleFlag {
    #[default]
    NoSale,
    HasSale,
}

impl SaleFlag {
    /// Integer encoding used by the table.
    pub const fn as_raw(self) -> i64 {
        match self {
            SaleFlag::NoSale => NO_SALE,
            SaleFlag::HasSale => HAS_SALE,
        }
    }

    pub const fn is_on_sale(self) -> bool {
        matches!(self, SaleFlag::HasSale)
    }

    /// Short user-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            SaleFlag::NoSale => "No sale",
            SaleFlag::HasSale => "On sale",
        }
    }
}

impl TryFrom<i64> for SaleFlag {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            NO_SALE => Ok(SaleFlag::NoSale),
            HAS_SALE => Ok(SaleFlag::HasSale),
            other => Err(DomainError::validation(
                Column::Sale.name(),
                format!("{other} is not a sale value (expected {NO_SALE} or {HAS_SALE})"),
            )),
        }
    }
}

impl From<SaleFlag> for i64 {
    fn from(value: SaleFlag) -> Self {
        value.as_raw()
    }
}

/// `CREATE TABLE` statement for the current schema.
pub fn create_table_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
         {id} INTEGER PRIMARY KEY AUTOINCREMENT, \
         {name} TEXT NOT NULL, \
         {price} INTEGER NOT NULL CHECK ({price} >= 0), \
         {sale} INTEGER NOT NULL DEFAULT {no_sale} CHECK ({sale} IN ({no_sale}, {has_sale})), \
         {quantity} INTEGER NOT NULL CHECK ({quantity} >= 0), \
         {supplier} TEXT, \
         {phone} TEXT)",
        table = TABLE_NAME,
        id = Column::Id,
        name = Column::Name,
        price = Column::Price,
        sale = Column::Sale,
        quantity = Column::Quantity,
        supplier = Column::Supplier,
        phone = Column::SupplierPhone,
        no_sale = NO_SALE,
        has_sale = HAS_SALE,
    )
}

/// `DROP TABLE` statement used when the schema version changes.
pub fn drop_table_sql() -> String {
    format!("DROP TABLE IF EXISTS {TABLE_NAME}")
}
