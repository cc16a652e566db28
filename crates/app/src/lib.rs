//! `stockroom-app`
//!
//! **Responsibility:** Screen controllers over the product store.
//!
//! This crate provides:
//! - The product list (rows, staleness tracking, the sale action)
//! - The product editor (inputs, quantity stepper, save/delete rules)
//! - User-facing notices for every outcome
//!
//! Rendering is left to the caller; the `stockroom` binary prints JSON.

pub mod editor;
pub mod list;
pub mod notice;

pub use editor::{EditorForm, EditorMode, SaveOutcome};
pub use list::{ListScreen, ProductRow};
pub use notice::Notice;
