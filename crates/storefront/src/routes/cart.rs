//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session (see [`crate::cart`]). Every mutation
//! answers with an `HX-Trigger` header carrying `cart-updated` and, when the
//! operation produced one, the `cart-notice` text for the toast.

use std::fmt::Write as _;
use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderValue,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use elegance_core::cart::{CartNotice, CartStorage, CartStore};
use elegance_core::{Price, ProductId};

use crate::cart;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// HTMX response header for client-side events.
pub const HX_TRIGGER: &str = "HX-Trigger";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Snapshot a cart for display.
    #[must_use]
    pub fn from_store<S: CartStorage>(cart: &CartStore<S>) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product_id.to_string(),
                    name: line.name.clone(),
                    category: line.category.display_name().to_string(),
                    image: line.primary_image().unwrap_or_default().to_string(),
                    quantity: line.quantity,
                    price: line.display_price().to_string(),
                    line_price: Price::usd(line.line_total()).to_string(),
                })
                .collect(),
            subtotal: Price::usd(cart.total()).to_string(),
            item_count: cart.count(),
        }
    }
}

/// Build the `HX-Trigger` value for a cart response.
///
/// Non-ASCII characters are `\u`-escaped so any product name fits in a header.
#[must_use]
pub fn hx_trigger(notice: Option<&CartNotice>) -> HeaderValue {
    let mut events = serde_json::Map::new();
    events.insert("cart-updated".to_string(), serde_json::Value::Null);
    if let Some(notice) = notice {
        events.insert(
            "cart-notice".to_string(),
            serde_json::Value::String(notice.to_string()),
        );
    }

    let json = serde_json::Value::Object(events).to_string();
    let mut ascii = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            ascii.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(ascii, "\\u{unit:04x}");
            }
        }
    }

    HeaderValue::from_str(&ascii).unwrap_or_else(|_| HeaderValue::from_static("cart-updated"))
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
///
/// Quantities below 1 remove the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Respond with the refreshed items fragment.
fn items_response(cart: &cart::SessionCart, notice: Option<&CartNotice>) -> Response {
    (
        AppendHeaders([(HX_TRIGGER, hx_trigger(notice))]),
        CartItemsTemplate {
            cart: CartView::from_store(cart),
        },
    )
        .into_response()
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = cart::open(&session).await;
    cart::save(&session, &cart).await;

    CartShowTemplate {
        cart: CartView::from_store(&cart),
    }
}

/// Add item to cart (HTMX).
///
/// Returns the new count badge and triggers `cart-updated`.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product_id = parse_product_id(&form.product_id)?;
    let product = state
        .catalog()
        .product_by_id(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
    let quantity = form
        .quantity
        .and_then(NonZeroU32::new)
        .unwrap_or(NonZeroU32::MIN);

    let mut cart = cart::open(&session).await;
    let notice = cart.add_item(&product, quantity);
    cart::save(&session, &cart).await;

    Ok((
        AppendHeaders([(HX_TRIGGER, hx_trigger(Some(&notice)))]),
        CartCountTemplate { count: cart.count() },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let product_id = parse_product_id(&form.product_id)?;

    let mut cart = cart::open(&session).await;
    let notice = cart.update_quantity(&product_id, form.quantity);
    cart::save(&session, &cart).await;

    Ok(items_response(&cart, notice.as_ref()))
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let product_id = parse_product_id(&form.product_id)?;

    let mut cart = cart::open(&session).await;
    let notice = cart.remove_item(&product_id);
    cart::save(&session, &cart).await;

    Ok(items_response(&cart, notice.as_ref()))
}

/// Empty the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Response {
    let mut cart = cart::open(&session).await;
    let notice = cart.clear();
    cart::save(&session, &cart).await;

    items_response(&cart, Some(&notice))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = cart::open(&session).await;
    cart::save(&session, &cart).await;

    CartCountTemplate {
        count: cart.count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hx_trigger_without_notice() {
        let value = hx_trigger(None);
        let json: serde_json::Value = serde_json::from_str(value.to_str().unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "cart-updated": null }));
    }

    #[test]
    fn test_hx_trigger_carries_notice_text() {
        let notice = CartNotice::Added {
            name: "Minimalist Desk Lamp".to_string(),
        };
        let value = hx_trigger(Some(&notice));
        let json: serde_json::Value = serde_json::from_str(value.to_str().unwrap()).unwrap();
        assert_eq!(json["cart-notice"], "Added Minimalist Desk Lamp to cart");
        assert!(json["cart-updated"].is_null());
    }

    #[test]
    fn test_hx_trigger_escapes_non_ascii() {
        let notice = CartNotice::Removed {
            name: "Café Crème 🎧".to_string(),
        };
        let value = hx_trigger(Some(&notice));
        let header = value.to_str().unwrap();
        assert!(header.is_ascii());

        let json: serde_json::Value = serde_json::from_str(header).unwrap();
        assert_eq!(json["cart-notice"], "Removed Café Crème 🎧 from cart");
    }
}
