//! Session-backed carts.
//!
//! A shopper's cart is stored as one session value (the JSON line-item array
//! under [`session_keys::CART`]). Handlers open a [`CartStore`] over a copy of
//! that value, run one operation and write the copy back if it changed.
//! Concurrent requests from one session are last-writer-wins.

use tower_sessions::Session;
use tracing::warn;

use elegance_core::cart::{CartStore, MemoryStorage};

use crate::models::session_keys;

/// A cart opened from a session.
pub type SessionCart = CartStore<MemoryStorage>;

/// Open the cart stored in `session`.
///
/// A session that cannot be read yields an empty cart.
pub async fn open(session: &Session) -> SessionCart {
    let stored = match session.get::<String>(session_keys::CART).await {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Failed to read cart from session");
            None
        }
    };
    CartStore::open(MemoryStorage::with_value(stored))
}

/// Write the cart back to `session` if any operation touched its slot.
///
/// Failures are logged and otherwise ignored; the response still reflects the
/// in-memory cart.
pub async fn save(session: &Session, cart: &SessionCart) {
    let slot = cart.storage();
    if slot.writes() == 0 {
        return;
    }

    let result = match slot.value() {
        Some(value) => session.insert(session_keys::CART, value).await,
        None => session
            .remove::<String>(session_keys::CART)
            .await
            .map(|_| ()),
    };
    if let Err(e) = result {
        warn!(error = %e, "Failed to save cart to session");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::num::NonZeroU32;
    use std::sync::Arc;

    use elegance_core::ProductId;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::catalog::Catalog;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    async fn lamp() -> elegance_core::Product {
        Catalog::sample()
            .unwrap()
            .product_by_id(&ProductId::parse("2").unwrap())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_through_session() {
        let session = session();
        let mut cart = open(&session).await;
        assert!(cart.is_empty());

        cart.add_item(&lamp().await, NonZeroU32::new(2).unwrap());
        save(&session, &cart).await;

        let reopened = open(&session).await;
        assert_eq!(reopened.count(), 2);
        assert_eq!(reopened.items()[0].name, "Minimalist Desk Lamp");
    }

    #[tokio::test]
    async fn test_clear_removes_session_value() {
        let session = session();
        let mut cart = open(&session).await;
        cart.add_item(&lamp().await, NonZeroU32::MIN);
        save(&session, &cart).await;

        let mut cart = open(&session).await;
        cart.clear();
        save(&session, &cart).await;

        let raw: Option<String> = session.get(session_keys::CART).await.unwrap();
        assert_eq!(raw.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_dropped() {
        let session = session();
        session
            .insert(session_keys::CART, "{not json")
            .await
            .unwrap();

        let cart = open(&session).await;
        assert!(cart.is_empty());
        save(&session, &cart).await;

        let raw: Option<String> = session.get(session_keys::CART).await.unwrap();
        assert_eq!(raw, None);
    }

    #[tokio::test]
    async fn test_untouched_cart_is_not_written() {
        let session = session();
        let cart = open(&session).await;
        save(&session, &cart).await;
        assert!(session.is_empty().await);
    }
}
