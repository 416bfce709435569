//! Integration tests for Elegance.
//!
//! Tests drive the full storefront router in-process with
//! `tower::ServiceExt::oneshot`: sample catalog, in-memory sessions, default
//! configuration. No database or network is needed.
//!
//! ```bash
//! cargo test -p elegance-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_api` - JSON product endpoints
//! - `cart_flow` - HTMX cart operations carried across requests by the session cookie
//! - `checkout_flow` - Checkout validation, confirmation and cart clearing
//! - `pages` - HTML pages and health checks

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use elegance_storefront::catalog::Catalog;
use elegance_storefront::config::StorefrontConfig;
use elegance_storefront::middleware::create_session_layer;
use elegance_storefront::routes;
use elegance_storefront::state::AppState;

/// Largest body a test reads.
const BODY_LIMIT: usize = 1024 * 1024;

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }

    /// A header value as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One shopper talking to an in-process storefront.
///
/// Holds the session cookie between requests like a browser would.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// A storefront over the sample catalog with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the bundled sample catalog fails to load.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let config = StorefrontConfig::from_vars(|_| None).expect("default configuration");
        let catalog = Catalog::sample().expect("sample catalog");
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(config, catalog);

        Self {
            app: routes::app(state, session_layer),
            cookie: None,
        }
    }

    /// Send a `GET`.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// Send a form-encoded `POST`.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let builder =
            Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(builder, Body::from(form.to_string())).await
    }

    #[allow(clippy::expect_used)]
    async fn send(
        &mut self,
        mut builder: axum::http::request::Builder,
        body: Body,
    ) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body).expect("valid request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(pair) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(pair.trim().to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
