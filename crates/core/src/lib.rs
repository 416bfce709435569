//! Elegance Core - Shared types and the cart store.
//!
//! This crate provides the domain model used by every Elegance component:
//! - `storefront` - Public-facing web shop (catalog API, cart, checkout)
//! - `cli` - Command-line tools for migrations, seeding and a local cart
//!
//! # Architecture
//!
//! The core crate contains types, traits and pure logic - no network access,
//! no database access, no filesystem access. Anything that persists data does
//! so through a trait ([`cart::CartStorage`]) implemented by the caller.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, categories and emails
//! - [`cart`] - The shopping cart store and its storage slot
//! - [`catalog`] - Product query semantics over in-memory records
//! - [`checkout`] - Order summary arithmetic and shipping form validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use types::*;
