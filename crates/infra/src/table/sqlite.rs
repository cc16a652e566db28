//! SQLite-backed products table.
//!
//! Uses `sqlx` on a dedicated current-thread runtime so the table exposes the same
//! synchronous API as the in-memory one. The pool holds a single connection: every
//! statement runs on it in order, which serializes access to the file.
//!
//! Methods block on the owned runtime and must not be called from inside another
//! tokio runtime.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tokio::runtime::{Builder, Runtime};

use stockroom_core::ProductId;
use stockroom_products::contract::{
    SCHEMA_VERSION, TABLE_NAME, create_table_sql, drop_table_sql,
};
use stockroom_products::{Column, Product, ProductFields, SaleFlag};

use super::ProductTable;
use crate::error::{StoreError, StoreResult};

static SELECT_COLUMNS: LazyLock<String> =
    LazyLock::new(|| Column::ALL.map(Column::name).join(", "));

static SELECT_ALL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "SELECT {} FROM {TABLE_NAME} ORDER BY {}",
        *SELECT_COLUMNS,
        Column::Id
    )
});

static SELECT_ONE: LazyLock<String> = LazyLock::new(|| {
    format!(
        "SELECT {} FROM {TABLE_NAME} WHERE {} = ?",
        *SELECT_COLUMNS,
        Column::Id
    )
});

static INSERT: LazyLock<String> = LazyLock::new(|| {
    format!(
        "INSERT INTO {TABLE_NAME} ({}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?)",
        Column::Name,
        Column::Price,
        Column::Sale,
        Column::Quantity,
        Column::Supplier,
        Column::SupplierPhone
    )
});

static REPLACE: LazyLock<String> = LazyLock::new(|| {
    format!(
        "UPDATE {TABLE_NAME} SET {} = ?, {} = ?, {} = ?, {} = ?, {} = ?, {} = ? WHERE {} = ?",
        Column::Name,
        Column::Price,
        Column::Sale,
        Column::Quantity,
        Column::Supplier,
        Column::SupplierPhone,
        Column::Id
    )
});

static SET_QUANTITY: LazyLock<String> = LazyLock::new(|| {
    format!(
        "UPDATE {TABLE_NAME} SET {} = ? WHERE {} = ?",
        Column::Quantity,
        Column::Id
    )
});

static DELETE_ONE: LazyLock<String> =
    LazyLock::new(|| format!("DELETE FROM {TABLE_NAME} WHERE {} = ?", Column::Id));

static DELETE_ALL: LazyLock<String> = LazyLock::new(|| format!("DELETE FROM {TABLE_NAME}"));

/// SQLite products table.
#[derive(Debug)]
pub struct SqliteProductTable {
    // Dropped before the runtime it was created on.
    pool: SqlitePool,
    runtime: Runtime,
    location: String,
}

impl SqliteProductTable {
    /// Open (or create) the database file at `path` and make sure the schema is current.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        Self::connect(options, path.display().to_string(), SqlitePoolOptions::new())
    }

    /// Private in-memory database, gone once the table is dropped or closed.
    pub fn open_in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // The database lives in its single connection; never let the pool recycle it.
        let pool_options = SqlitePoolOptions::new()
            .min_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>);
        Self::connect(options, ":memory:".to_string(), pool_options)
    }

    fn connect(
        options: SqliteConnectOptions,
        location: String,
        pool_options: SqlitePoolOptions,
    ) -> StoreResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::unavailable(format!("failed to start storage runtime: {e}")))?;

        let pool = runtime
            .block_on(pool_options.max_connections(1).connect_with(options))
            .map_err(|e| {
                tracing::error!(location = %location, error = %e, "failed to open products database");
                StoreError::from(e)
            })?;

        runtime.block_on(ensure_schema(&pool))?;
        tracing::info!(location = %location, "products database ready");

        Ok(Self {
            pool,
            runtime,
            location,
        })
    }

    fn run<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }
}

/// Create the table, wiping it first when the stored schema version differs.
async fn ensure_schema(pool: &SqlitePool) -> StoreResult<()> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;

    if version != i64::from(SCHEMA_VERSION) {
        if version != 0 {
            tracing::warn!(
                found = version,
                expected = SCHEMA_VERSION,
                "products schema version changed; recreating table"
            );
        }
        sqlx::query(&drop_table_sql()).execute(pool).await?;
        sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
            .execute(pool)
            .await?;
    }

    sqlx::query(&create_table_sql()).execute(pool).await?;
    Ok(())
}

fn product_from_row(row: &SqliteRow) -> StoreResult<Product> {
    let id: i64 = row.try_get(Column::Id.name())?;
    let sale: i64 = row.try_get(Column::Sale.name())?;
    let sale = SaleFlag::try_from(sale)
        .map_err(|e| StoreError::unavailable(format!("corrupt row {id}: {e}")))?;
    let supplier_name: Option<String> = row.try_get(Column::Supplier.name())?;
    let supplier_phone: Option<String> = row.try_get(Column::SupplierPhone.name())?;

    let fields = ProductFields {
        name: row.try_get(Column::Name.name())?,
        price: row.try_get(Column::Price.name())?,
        sale,
        quantity: row.try_get(Column::Quantity.name())?,
        supplier_name: supplier_name.unwrap_or_default(),
        supplier_phone: supplier_phone.unwrap_or_default(),
    };
    Ok(Product::new(ProductId::new(id), fields))
}

impl ProductTable for SqliteProductTable {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn insert(&self, fields: &ProductFields) -> StoreResult<ProductId> {
        let result = self.run(
            sqlx::query(INSERT.as_str())
                .bind(fields.name.as_str())
                .bind(fields.price)
                .bind(fields.sale.as_raw())
                .bind(fields.quantity)
                .bind(fields.supplier_name.as_str())
                .bind(fields.supplier_phone.as_str())
                .execute(&self.pool),
        )?;
        Ok(ProductId::new(result.last_insert_rowid()))
    }

    fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = self.run(
            sqlx::query(SELECT_ONE.as_str())
                .bind(id.get())
                .fetch_optional(&self.pool),
        )?;
        row.as_ref().map(product_from_row).transpose()
    }

    fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = self.run(sqlx::query(SELECT_ALL.as_str()).fetch_all(&self.pool))?;
        rows.iter().map(product_from_row).collect()
    }

    fn replace(&self, id: ProductId, fields: &ProductFields) -> StoreResult<u64> {
        let result = self.run(
            sqlx::query(REPLACE.as_str())
                .bind(fields.name.as_str())
                .bind(fields.price)
                .bind(fields.sale.as_raw())
                .bind(fields.quantity)
                .bind(fields.supplier_name.as_str())
                .bind(fields.supplier_phone.as_str())
                .bind(id.get())
                .execute(&self.pool),
        )?;
        Ok(result.rows_affected())
    }

    fn set_quantity(&self, id: ProductId, quantity: i64) -> StoreResult<u64> {
        let result = self.run(
            sqlx::query(SET_QUANTITY.as_str())
                .bind(quantity)
                .bind(id.get())
                .execute(&self.pool),
        )?;
        Ok(result.rows_affected())
    }

    fn remove(&self, id: ProductId) -> StoreResult<u64> {
        let result = self.run(sqlx::query(DELETE_ONE.as_str()).bind(id.get()).execute(&self.pool))?;
        Ok(result.rows_affected())
    }

    fn clear(&self) -> StoreResult<u64> {
        let result = self.run(sqlx::query(DELETE_ALL.as_str()).execute(&self.pool))?;
        Ok(result.rows_affected())
    }

    fn close(&self) {
        self.run(self.pool.close());
        tracing::info!(location = %self.location, "products database closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> PathBuf {
        std::env::temp_dir().join(format!("stockroom-{}.db", uuid::Uuid::now_v7()))
    }

    #[test]
    fn insert_and_read_back() {
        let table = SqliteProductTable::open_in_memory().unwrap();
        let fields = ProductFields::new("Widget", 10, 5)
            .with_sale(SaleFlag::HasSale)
            .with_supplier("Acme", "555-1234");

        let id = table.insert(&fields).unwrap();
        assert_eq!(id, ProductId::new(1));

        let product = table.get(id).unwrap().unwrap();
        assert_eq!(product.fields(), &fields);
        assert_eq!(table.get(ProductId::new(2)).unwrap(), None);
    }

    #[test]
    fn autoincrement_never_reuses_ids() {
        let table = SqliteProductTable::open_in_memory().unwrap();
        let first = table.insert(&ProductFields::new("a", 1, 1)).unwrap();
        assert_eq!(table.clear().unwrap(), 1);
        let second = table.insert(&ProductFields::new("b", 1, 1)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn check_constraints_guard_the_table() {
        let table = SqliteProductTable::open_in_memory().unwrap();
        let id = table.insert(&ProductFields::new("a", 1, 1)).unwrap();

        // Validation normally stops this before the table; the schema refuses it too.
        let err = table.set_quantity(id, -1).unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable(_)));
        assert_eq!(table.get(id).unwrap().unwrap().quantity(), 1);
    }

    #[test]
    fn rows_survive_reopen() {
        let path = temp_db();
        {
            let table = SqliteProductTable::open(&path).unwrap();
            table.insert(&ProductFields::new("Widget", 10, 5)).unwrap();
            table.close();
        }

        let table = SqliteProductTable::open(&path).unwrap();
        let rows = table.list().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name(), "Widget");
        table.close();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn schema_version_mismatch_recreates_table() {
        let path = temp_db();
        {
            let table = SqliteProductTable::open(&path).unwrap();
            table.insert(&ProductFields::new("Widget", 10, 5)).unwrap();
            table
                .run(sqlx::query("PRAGMA user_version = 1").execute(&table.pool))
                .unwrap();
            table.close();
        }

        let table = SqliteProductTable::open(&path).unwrap();
        assert!(table.list().unwrap().is_empty());
        let version: i64 = table
            .run(sqlx::query_scalar("PRAGMA user_version").fetch_one(&table.pool))
            .unwrap();
        assert_eq!(version, i64::from(SCHEMA_VERSION));
        table.close();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn operations_after_close_report_storage_unavailable() {
        let table = SqliteProductTable::open_in_memory().unwrap();
        table.close();
        assert!(matches!(table.list(), Err(StoreError::StorageUnavailable(_))));
    }
}
