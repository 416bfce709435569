//! Catalog product record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductId};

/// Reasons a product record is rejected by [`Product::validate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("product {0} has a negative old price")]
    NegativeOldPrice(ProductId),
    #[error("product {0} must have at least one image")]
    NoImages(ProductId),
}

/// A product as supplied by the catalog.
///
/// Read-only from the cart's point of view: the cart copies selected fields
/// into a line item and never writes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub featured: bool,
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub count_in_stock: u32,
}

impl Product {
    /// Check the record-level rules the product schema enforces.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName(self.id.clone()));
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(ProductError::NegativePrice(self.id.clone()));
        }
        if self
            .old_price
            .is_some_and(|old| old.is_sign_negative() && !old.is_zero())
        {
            return Err(ProductError::NegativeOldPrice(self.id.clone()));
        }
        if self.images.is_empty() {
            return Err(ProductError::NoImages(self.id.clone()));
        }
        Ok(())
    }

    /// Current price for display.
    #[must_use]
    pub const fn display_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// The first image, used for cards and line items.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether any stock is on hand.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.count_in_stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: &str, name: &str, cents: i64, category: Category) -> Product {
        Product {
            id: ProductId::parse(id).unwrap(),
            name: name.to_owned(),
            price: Decimal::new(cents, 2),
            old_price: None,
            description: format!("{name} description"),
            category,
            featured: false,
            images: vec![format!("https://img.example/{id}.jpg")],
            features: Vec::new(),
            count_in_stock: 5,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_product() {
        let p = product("1", "Lamp", 8999, Category::Home);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_images() {
        let mut p = product("1", "Lamp", 8999, Category::Home);
        p.images.clear();
        assert!(matches!(p.validate(), Err(ProductError::NoImages(_))));
    }

    #[test]
    fn test_validate_rejects_negative_prices() {
        let mut p = product("1", "Lamp", -1, Category::Home);
        assert!(matches!(p.validate(), Err(ProductError::NegativePrice(_))));

        p.price = Decimal::ZERO;
        p.old_price = Some(Decimal::new(-500, 2));
        assert!(matches!(p.validate(), Err(ProductError::NegativeOldPrice(_))));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let mut p = product("3", "Watch", 39999, Category::Electronics);
        p.old_price = Some(Decimal::new(44999, 2));
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["oldPrice"], "449.99");
        assert_eq!(json["countInStock"], 5);
        assert_eq!(json["category"], "electronics");
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "id": "9",
            "name": "Mug",
            "price": "12.50",
            "description": "A mug",
            "category": "home",
            "images": ["https://img.example/9.jpg"]
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert!(!p.featured);
        assert!(p.features.is_empty());
        assert_eq!(p.count_in_stock, 0);
        assert_eq!(p.old_price, None);
        assert_eq!(p.display_price().to_string(), "$12.50");
    }
}
