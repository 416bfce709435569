//! Checkout route handlers.
//!
//! Checkout collects shipping details, shows the order summary and, on a
//! valid submission, clears the cart. There is no payment step.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use elegance_core::checkout::{OrderSummary, ShippingDetails};
use elegance_core::Price;

use crate::cart;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::models::{OrderReceipt, session_keys};
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Order totals display data for templates.
#[derive(Clone)]
pub struct SummaryView {
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
    /// Tax rate as a percentage, e.g. `8`.
    pub tax_percent: String,
}

impl SummaryView {
    fn new(summary: &OrderSummary, tax_rate: Decimal) -> Self {
        let [subtotal, shipping, tax, total] = summary.display();
        Self {
            subtotal,
            shipping,
            tax,
            total,
            tax_percent: (tax_rate * Decimal::ONE_HUNDRED).normalize().to_string(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub summary: SummaryView,
    pub form: ShippingDetails,
    pub errors: Vec<String>,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub receipt: OrderReceipt,
}

fn checkout_page(
    state: &AppState,
    cart: &cart::SessionCart,
    form: ShippingDetails,
    errors: Vec<String>,
) -> CheckoutTemplate {
    let tax_rate = state.config().tax_rate;
    let summary = OrderSummary::for_cart(cart.total(), tax_rate);
    CheckoutTemplate {
        cart: CartView::from_store(cart),
        summary: SummaryView::new(&summary, tax_rate),
        form,
        errors,
    }
}

/// Display the checkout form.
///
/// An empty cart has nothing to check out and redirects to the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Response {
    let cart = cart::open(&session).await;
    cart::save(&session, &cart).await;

    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let form = ShippingDetails {
        country: ShippingDetails::DEFAULT_COUNTRY.to_string(),
        ..ShippingDetails::default()
    };
    checkout_page(&state, &cart, form, Vec::new()).into_response()
}

/// Place the order.
///
/// Invalid details re-render the form with every problem listed (422).
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ShippingDetails>,
) -> Response {
    let mut cart = cart::open(&session).await;
    if cart.is_empty() {
        cart::save(&session, &cart).await;
        return Redirect::to("/cart").into_response();
    }

    let email = match form.validate() {
        Ok(email) => email,
        Err(errors) => {
            let errors = errors.iter().map(ToString::to_string).collect();
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                checkout_page(&state, &cart, form, errors),
            )
                .into_response();
        }
    };

    let summary = OrderSummary::for_cart(cart.total(), state.config().tax_rate);
    let receipt = OrderReceipt {
        email: email.as_str().to_string(),
        name: format!("{} {}", form.first_name.trim(), form.last_name.trim()),
        item_count: cart.count(),
        total: Price::usd(summary.total).to_string(),
    };

    if let Err(e) = session.insert(session_keys::LAST_ORDER, &receipt).await {
        tracing::warn!(error = %e, "Failed to store order receipt in session");
    }

    cart.clear();
    cart::save(&session, &cart).await;

    add_breadcrumb(
        "checkout",
        "Order placed",
        &[("items", &receipt.item_count.to_string())],
    );
    tracing::info!(
        items = receipt.item_count,
        total = %receipt.total,
        email_domain = %email.domain(),
        "Order placed"
    );

    Redirect::to("/checkout/success").into_response()
}

/// Show the confirmation for the order just placed.
///
/// The receipt is consumed; revisiting the page redirects home.
#[instrument(skip(session))]
pub async fn success(session: Session) -> Response {
    match session.remove::<OrderReceipt>(session_keys::LAST_ORDER).await {
        Ok(Some(receipt)) => CheckoutSuccessTemplate { receipt }.into_response(),
        Ok(None) => Redirect::to("/").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read order receipt from session");
            Redirect::to("/").into_response()
        }
    }
}
