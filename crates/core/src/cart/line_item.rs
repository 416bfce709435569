//! Cart line item.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, Product, ProductId};

/// One product entry in the cart.
///
/// The display fields are a snapshot taken when the product was first added.
/// Later catalog changes (including price changes) do not reach items that
/// are already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub category: Category,
    pub quantity: u32,
}

impl CartLineItem {
    /// Snapshot a product into a new line item.
    #[must_use]
    pub fn from_product(product: &Product, quantity: NonZeroU32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            images: product.images.clone(),
            category: product.category,
            quantity: quantity.get(),
        }
    }

    /// Price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Unit price for display.
    #[must_use]
    pub const fn display_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// First snapshot image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
