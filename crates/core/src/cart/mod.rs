//! Shopping cart state.
//!
//! A [`CartStore`] owns the line items of one shopper's cart and keeps them
//! synchronized with a single [`CartStorage`] slot. The store is an ordinary
//! value: callers create one, pass it where it is needed and drop it when the
//! session ends. Nothing here is global.
//!
//! # Invariants
//!
//! - No two line items share a product ID.
//! - Every line item has a quantity of at least 1.
//! - Items keep the order in which they were first added.
//! - `count()` and `total()` are always derived from the current items.

mod line_item;
mod notice;
mod storage;
mod store;

pub use line_item::CartLineItem;
pub use notice::CartNotice;
pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use store::CartStore;
