//! Core types for Elegance.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod product;

pub use category::{Category, CategoryError};
pub use email::{Email, EmailError};
pub use id::{ProductId, ProductIdError};
pub use price::{CurrencyCode, Price};
pub use product::{Product, ProductError};
