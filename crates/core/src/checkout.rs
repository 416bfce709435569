//! Checkout arithmetic and shipping form validation.
//!
//! Payment is out of scope: completing checkout means validating the shipping
//! details, showing the summary and clearing the cart.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{Email, EmailError, Price};

/// Sales tax applied at checkout when no other rate is configured (8%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Totals shown on the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Compute the summary for a cart subtotal.
    ///
    /// Shipping is free. Tax is `subtotal * tax_rate` rounded half-up to cents.
    #[must_use]
    pub fn for_cart(subtotal: Decimal, tax_rate: Decimal) -> Self {
        let shipping = Decimal::ZERO;
        let tax = (subtotal * tax_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Formatted amounts for display, in `(subtotal, shipping, tax, total)` order.
    #[must_use]
    pub fn display(&self) -> [String; 4] {
        [self.subtotal, self.shipping, self.tax, self.total]
            .map(|amount| Price::usd(amount).to_string())
    }
}

/// Shipping information submitted with the checkout form.
///
/// Absent fields deserialize as empty and are reported by [`Self::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// One invalid checkout field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShippingError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("email: {0}")]
    Email(#[from] EmailError),
}

impl ShippingDetails {
    /// Country preselected on the checkout form.
    pub const DEFAULT_COUNTRY: &'static str = "United States";

    /// Validate every field, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns every missing field and an email error if the address does not
    /// parse, in form order.
    pub fn validate(&self) -> Result<Email, Vec<ShippingError>> {
        let mut errors = Vec::new();
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(ShippingError::Missing(field));
            }
        }

        let email = Email::parse(&self.email).map_err(ShippingError::from);

        let required = [
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip code", &self.zip_code),
            ("country", &self.country),
        ];
        let mut trailing = Vec::new();
        for (field, value) in required {
            if value.trim().is_empty() {
                trailing.push(ShippingError::Missing(field));
            }
        }

        match email {
            Ok(email) if errors.is_empty() && trailing.is_empty() => Ok(email),
            Ok(_) => {
                errors.extend(trailing);
                Err(errors)
            }
            Err(e) => {
                errors.push(e);
                errors.extend(trailing);
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn details() -> ShippingDetails {
        ShippingDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Analytical Way".to_string(),
            city: "London".to_string(),
            state: "LDN".to_string(),
            zip_code: "N1 9GU".to_string(),
            country: ShippingDetails::DEFAULT_COUNTRY.to_string(),
        }
    }

    #[test]
    fn test_default_tax_rate_is_eight_percent() {
        assert_eq!(DEFAULT_TAX_RATE, Decimal::new(8, 2));
    }

    #[test]
    fn test_summary_arithmetic() {
        let summary = OrderSummary::for_cart(Decimal::new(35, 0), DEFAULT_TAX_RATE);
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.tax, Decimal::new(280, 2));
        assert_eq!(summary.total, Decimal::new(3780, 2));
        assert_eq!(summary.display(), ["$35.00", "$0.00", "$2.80", "$37.80"]);
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        // 299.99 * 0.08 = 23.9992
        let summary = OrderSummary::for_cart(Decimal::new(29999, 2), DEFAULT_TAX_RATE);
        assert_eq!(summary.tax, Decimal::new(2400, 2));
        assert_eq!(summary.total, Decimal::new(32399, 2));
    }

    #[test]
    fn test_empty_subtotal() {
        let summary = OrderSummary::for_cart(Decimal::ZERO, DEFAULT_TAX_RATE);
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn test_valid_details() {
        let email = details().validate().unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_collects_every_error_in_form_order() {
        let form = ShippingDetails {
            first_name: " ".to_string(),
            email: "not-an-email".to_string(),
            city: String::new(),
            ..details()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                ShippingError::Missing("first name"),
                ShippingError::Email(EmailError::AtSymbol),
                ShippingError::Missing("city"),
            ]
        );
    }

    #[test]
    fn test_missing_field_with_valid_email() {
        let form = ShippingDetails {
            zip_code: String::new(),
            ..details()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            vec![ShippingError::Missing("zip code")]
        );
    }
}
