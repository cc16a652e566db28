//! Infrastructure layer: table backends, the product store, content addressing and
//! store lifecycle.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod resolver;
pub mod store;
pub mod table;

pub use config::{ConfigError, StorageBackend, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use lifecycle::{SharedStore, StoreHost, StoreLease};
pub use resolver::{ContentResolver, ProductUri};
pub use store::{ChangeBus, ProductList, ProductStore};
pub use table::{InMemoryProductTable, ProductTable, SqliteProductTable};
