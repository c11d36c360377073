//! Unified error handling with Sentry integration.
//!
//! [`StorefrontError`] covers every way a user action can fail. Each variant
//! maps to the notice shown to the user through [`StorefrontError::user_message`];
//! transport details are logged and sent to Sentry but never displayed.

use street_kitchen_core::{EmailError, ItemId};
use thiserror::Error;

use crate::api::ApiError;

/// Generic notice for transport failures.
pub const NETWORK_ERROR: &str = "Network error";

/// Customer details rejected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerError {
    /// A required form field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email field is filled in but not an email address.
    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Failures of user-initiated actions.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Checkout requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Quantity change on an item that cannot currently be ordered.
    #[error("Item {0} is unavailable")]
    ItemUnavailable(ItemId),

    /// Confirmation form failed validation.
    #[error("Invalid customer details: {0}")]
    InvalidCustomer(#[from] CustomerError),

    /// A submission is already in flight.
    #[error("Checkout already in progress")]
    CheckoutInProgress,

    /// Submit was triggered without an open confirmation.
    #[error("Checkout has not been confirmed")]
    NotConfirming,

    /// The order endpoint or the network failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl StorefrontError {
    /// The notice shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Select items first".to_string(),
            Self::ItemUnavailable(_) => "This item is currently unavailable".to_string(),
            Self::InvalidCustomer(err) => err.to_string(),
            Self::CheckoutInProgress => "Your order is already being placed".to_string(),
            Self::NotConfirming => "Review your order before placing it".to_string(),
            Self::Api(ApiError::Rejected { message, .. }) => format!("Order failed: {message}"),
            Self::Api(_) => format!("Order failed: {NETWORK_ERROR}"),
        }
    }

    /// Whether this is a transport-level failure rather than a user or
    /// server-side rejection.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_transport())
    }

    /// Log the error and, for transport failures, capture it to Sentry.
    pub fn report(&self) {
        if self.is_transport() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Order request failed"
            );
        } else {
            tracing::info!(error = %self, "Action rejected");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for checkout and cart actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user
/// actions leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
