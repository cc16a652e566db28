//! Products domain module.
//!
//! This crate contains the table contract and the business rules for product records,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod change;
pub mod contract;
pub mod product;

pub use change::ProductChange;
pub use contract::{Column, SaleFlag, is_valid_sale};
pub use product::{Product, ProductFields, ProductValues};
