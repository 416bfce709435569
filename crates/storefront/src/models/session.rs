//! Session-related types.

use serde::{Deserialize, Serialize};

/// Receipt of the most recent completed checkout, shown on the success page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Confirmation email address.
    pub email: String,
    /// Shipping name.
    pub name: String,
    /// Units ordered.
    pub item_count: u64,
    /// Formatted order total.
    pub total: String,
}

/// Session keys.
pub mod keys {
    /// Serialized cart line items.
    pub const CART: &str = "cart";

    /// The last [`super::OrderReceipt`].
    pub const LAST_ORDER: &str = "last_order";
}
