//! HTTP access to the ordering site.
//!
//! # Endpoints
//!
//! - `GET /vendors/{vendor}/items/` - menu catalog
//! - `POST /orders/create/{vendor}/` - order creation, protected by the
//!   `csrftoken` cookie echoed back as an `X-CSRFToken` header
//!
//! The page controller talks to these through the [`StorefrontBackend`]
//! trait so it can be driven by [`StorefrontClient`] or by a test double.

mod client;

use std::future::Future;

pub use client::StorefrontClient;

use thiserror::Error;

use crate::models::{Item, OrderConfirmation, OrderPayload};

/// Errors that can occur when talking to the ordering site.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Catalog endpoint answered with a non-success status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// Order endpoint refused the order (non-2xx or `success: false`).
    #[error("Order rejected (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code of the reply.
        status: u16,
        /// Server-provided reason, or `HTTP <status>` when none was given.
        message: String,
    },
}

impl ApiError {
    /// Whether the failure happened below the business layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}

/// The two remote operations the ordering page depends on.
pub trait StorefrontBackend: Clone + Send + Sync + 'static {
    /// Fetch the full menu.
    fn fetch_items(&self) -> impl Future<Output = Result<Vec<Item>, ApiError>> + Send;

    /// Submit an order.
    fn create_order(
        &self,
        payload: &OrderPayload,
    ) -> impl Future<Output = Result<OrderConfirmation, ApiError>> + Send;
}

impl StorefrontBackend for StorefrontClient {
    fn fetch_items(&self) -> impl Future<Output = Result<Vec<Item>, ApiError>> + Send {
        Self::fetch_items(self)
    }

    fn create_order(
        &self,
        payload: &OrderPayload,
    ) -> impl Future<Output = Result<OrderConfirmation, ApiError>> + Send {
        Self::create_order(self, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Rejected {
            status: 400,
            message: "Cart is empty".to_string(),
        };
        assert_eq!(err.to_string(), "Order rejected (HTTP 400): Cart is empty");
        assert_eq!(ApiError::Status(503).to_string(), "Unexpected HTTP status 503");
    }

    #[test]
    fn test_transport_classification() {
        assert!(ApiError::Status(500).is_transport());
        assert!(
            !ApiError::Rejected {
                status: 200,
                message: String::new()
            }
            .is_transport()
        );
    }
}
