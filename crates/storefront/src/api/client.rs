//! Ordering site HTTP client.
//!
//! Uses `reqwest` with a cookie jar so the session and `csrftoken` cookies
//! set by the site are sent back on later requests.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CONTENT_TYPE, REFERER};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use super::ApiError;
use crate::config::StorefrontConfig;
use crate::models::{CatalogResponse, Item, OrderConfirmation, OrderPayload, OrderResponse};

/// Cookie carrying the anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";
/// Header the token is echoed back in.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Client for the catalog and order endpoints.
///
/// Cheap to clone; clones share the connection pool and cookie jar.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    cookies: Arc<Jar>,
    catalog_url: Url,
    create_order_url: Url,
    referer: String,
    fallback_csrf: Option<SecretString>,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("catalog_url", &self.inner.catalog_url.as_str())
            .field("create_order_url", &self.inner.create_order_url.as_str())
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a client for the configured site and vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URLs cannot be built or the HTTP
    /// client fails to initialise.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let cookies = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                cookies,
                catalog_url: config.catalog_url()?,
                create_order_url: config.create_order_url()?,
                referer: config.base_url.to_string(),
                fallback_csrf: config.csrf_token.clone(),
            }),
        })
    }

    /// The anti-forgery token to send with the next order.
    ///
    /// Prefers the `csrftoken` cookie the site set; falls back to the
    /// configured token. Empty when neither exists.
    #[must_use]
    pub fn csrf_token(&self) -> String {
        self.inner
            .cookies
            .cookies(&self.inner.create_order_url)
            .and_then(|header| header.to_str().ok().and_then(csrf_from_cookie_header))
            .or_else(|| {
                self.inner
                    .fallback_csrf
                    .as_ref()
                    .map(|token| token.expose_secret().to_string())
            })
            .unwrap_or_default()
    }

    /// Fetch the vendor's menu.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a body
    /// that is not a catalog.
    #[instrument(skip(self), fields(url = %self.inner.catalog_url))]
    pub async fn fetch_items(&self) -> Result<Vec<Item>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.inner.catalog_url.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let items = serde_json::from_str::<CatalogResponse>(&body)?.into_items();
        debug!(count = items.len(), "Catalog fetched");
        Ok(items)
    }

    /// Post an order.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Rejected`] if the server answers with a non-success
    ///   status or `success: false`
    /// - [`ApiError::Http`] / [`ApiError::Parse`] if the request fails or the
    ///   reply is not JSON
    #[instrument(skip(self, payload), fields(items = payload.items.len()))]
    pub async fn create_order(&self, payload: &OrderPayload) -> Result<OrderConfirmation, ApiError> {
        let response = self
            .inner
            .client
            .post(self.inner.create_order_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(CSRF_HEADER, self.csrf_token())
            .header(REFERER, &self.inner.referer)
            .json(payload)
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        let body: OrderResponse = match serde_json::from_str(&response_text) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(
                    status = %status,
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse order response"
                );
                return Err(ApiError::Parse(e));
            }
        };

        if !status.is_success() || !body.success {
            let message = body
                .error
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            tracing::warn!(status = %status, %message, "Order rejected");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(order_id = ?body.order_id, "Order accepted");
        Ok(body.into())
    }
}

/// Pull the `csrftoken` value out of a `Cookie` header.
fn csrf_from_cookie_header(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(CSRF_COOKIE)?.strip_prefix('='))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
