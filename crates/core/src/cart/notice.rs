//! User-facing cart notifications.

use core::fmt;

use serde::Serialize;

/// A message the UI shows after a cart operation.
///
/// Operations return the notice instead of displaying it so the caller
/// decides how to surface it (toast, HTMX trigger, terminal line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartNotice {
    /// A new line item was appended.
    Added { name: String },
    /// An existing line item's quantity was increased.
    QuantityUpdated { name: String },
    /// A line item was removed.
    Removed { name: String },
    /// Every line item was removed.
    Cleared,
}

impl fmt::Display for CartNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { name } => write!(f, "Added {name} to cart"),
            Self::QuantityUpdated { name } => write!(f, "Updated quantity for {name}"),
            Self::Removed { name } => write!(f, "Removed {name} from cart"),
            Self::Cleared => f.write_str("Cart cleared"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        let name = "Desk Lamp".to_string();
        assert_eq!(
            CartNotice::Added { name: name.clone() }.to_string(),
            "Added Desk Lamp to cart"
        );
        assert_eq!(
            CartNotice::QuantityUpdated { name: name.clone() }.to_string(),
            "Updated quantity for Desk Lamp"
        );
        assert_eq!(
            CartNotice::Removed { name }.to_string(),
            "Removed Desk Lamp from cart"
        );
        assert_eq!(CartNotice::Cleared.to_string(), "Cart cleared");
    }
}
