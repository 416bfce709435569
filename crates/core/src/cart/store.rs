//! The cart store.

use std::collections::HashSet;
use std::num::NonZeroU32;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{CartLineItem, CartNotice, CartStorage};
use crate::types::{Product, ProductId};

/// Why a stored cart was rejected during hydration.
#[derive(thiserror::Error, Debug)]
enum HydrateError {
    #[error("malformed cart data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("duplicate line item for product {0}")]
    DuplicateProduct(ProductId),
    #[error("line item for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
    #[error("line item for product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// Decode a stored slot, enforcing the cart invariants on the result.
fn decode_items(raw: &str) -> Result<Vec<CartLineItem>, HydrateError> {
    let items: Vec<CartLineItem> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if item.quantity == 0 {
            return Err(HydrateError::ZeroQuantity(item.product_id.clone()));
        }
        if item.price.is_sign_negative() && !item.price.is_zero() {
            return Err(HydrateError::NegativePrice(item.product_id.clone()));
        }
        if !seen.insert(&item.product_id) {
            return Err(HydrateError::DuplicateProduct(item.product_id.clone()));
        }
    }
    Ok(items)
}

/// One shopper's cart, persisted to a storage slot on every change.
///
/// Every operation is synchronous and infallible. Storage problems are logged
/// and otherwise ignored: the in-memory state stays authoritative for the
/// rest of the session.
///
/// ```
/// use std::num::NonZeroU32;
///
/// use elegance_core::cart::{CartStore, MemoryStorage};
/// # use elegance_core::{Category, Product, ProductId};
/// # use rust_decimal::Decimal;
/// # let lamp = Product {
/// #     id: ProductId::parse("2").unwrap(),
/// #     name: "Minimalist Desk Lamp".into(),
/// #     price: Decimal::new(8999, 2),
/// #     old_price: None,
/// #     description: String::new(),
/// #     category: Category::Home,
/// #     featured: true,
/// #     images: vec!["lamp.jpg".into()],
/// #     features: Vec::new(),
/// #     count_in_stock: 25,
/// # };
///
/// let mut cart = CartStore::open(MemoryStorage::new());
/// cart.add_item(&lamp, NonZeroU32::MIN);
/// cart.add_item(&lamp, NonZeroU32::new(2).unwrap());
///
/// assert_eq!(cart.items().len(), 1);
/// assert_eq!(cart.count(), 3);
/// assert_eq!(cart.total(), Decimal::new(26997, 2));
/// ```
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    items: Vec<CartLineItem>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open a cart over `storage`, hydrating it from the slot.
    ///
    /// A slot that cannot be read or decoded, or that decodes to items that
    /// break the cart invariants, yields an empty cart. An undecodable slot is
    /// also cleared so the bad value is not read again.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            items: Vec::new(),
            storage,
        };

        match store.storage.load() {
            Ok(Some(raw)) => match decode_items(&raw) {
                Ok(items) => {
                    debug!(lines = items.len(), "Hydrated cart from storage");
                    store.items = items;
                }
                Err(e) => {
                    warn!(error = %e, "Discarding stored cart");
                    if let Err(e) = store.storage.clear() {
                        warn!(error = %e, "Failed to clear stored cart");
                    }
                }
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read stored cart, starting empty"),
        }

        store
    }

    /// Add `quantity` units of `product`.
    ///
    /// If the product is already in the cart its quantity is increased and the
    /// line keeps its position and snapshot fields. Otherwise a new line is
    /// appended with a snapshot of the product.
    pub fn add_item(&mut self, product: &Product, quantity: NonZeroU32) -> CartNotice {
        let notice = match self.line_mut(&product.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity.get());
                CartNotice::QuantityUpdated {
                    name: product.name.clone(),
                }
            }
            None => {
                self.items.push(CartLineItem::from_product(product, quantity));
                CartNotice::Added {
                    name: product.name.clone(),
                }
            }
        };

        debug!(product_id = %product.id, quantity = quantity.get(), "Added to cart");
        self.persist();
        notice
    }

    /// Remove the line for `product_id`. Absent IDs are a no-op.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<CartNotice> {
        let index = self
            .items
            .iter()
            .position(|line| &line.product_id == product_id)?;
        let removed = self.items.remove(index);

        debug!(product_id = %product_id, "Removed from cart");
        self.persist();
        Some(CartNotice::Removed { name: removed.name })
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// A quantity below 1 removes the line. Quantities beyond `u32::MAX`
    /// saturate. Absent IDs are a no-op. Only a removal produces a notice.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Option<CartNotice> {
        if quantity < 1 {
            return self.remove_item(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let line = self.line_mut(product_id)?;
        line.quantity = quantity;

        debug!(product_id = %product_id, quantity, "Updated cart quantity");
        self.persist();
        None
    }

    /// Remove every line.
    pub fn clear(&mut self) -> CartNotice {
        self.items.clear();
        debug!("Cleared cart");
        self.persist();
        CartNotice::Cleared
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| &line.product_id == product_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of price times quantity across all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The storage slot backing this cart.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and return its storage slot.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLineItem> {
        self.items
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }

    /// Write the current items to the slot. Failures are logged only.
    fn persist(&mut self) {
        match serde_json::to_string(&self.items) {
            Ok(json) => {
                if let Err(e) = self.storage.save(&json) {
                    warn!(error = %e, "Failed to persist cart");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize cart"),
        }
    }
}
