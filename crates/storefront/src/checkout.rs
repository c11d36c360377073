//! Checkout state machine.
//!
//! ```text
//! Idle --open--> AwaitingConfirmation --submit--> Submitting --+--> Redirected
//!  ^                   |                                        |
//!  +------cancel-------+                                        |
//!  +------------------------- failure (notice shown) -----------+
//! ```
//!
//! The machine owns the submit control state: it is disabled with a progress
//! label while `Submitting` and restored on every way out of that state.

use rust_decimal::Decimal;
use street_kitchen_core::Email;
use url::Url;

use crate::api::ApiError;
use crate::cart::Cart;
use crate::config::StorefrontConfig;
use crate::error::{CustomerError, StorefrontError, add_breadcrumb};
use crate::models::{OrderConfirmation, OrderPayload};

/// Submit button label when idle.
pub const PLACE_ORDER_LABEL: &str = "Place Order";
/// Submit button label while the request is in flight.
pub const PLACING_ORDER_LABEL: &str = "Placing order...";

/// Fields collected by the confirmation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub delivery_address: String,
    pub pincode: String,
    pub preferences: String,
}

impl CheckoutForm {
    /// Check the form and build the order payload around `cart`.
    ///
    /// Name and phone are required; email is optional but must be valid
    /// when given. All fields are trimmed.
    ///
    /// # Errors
    ///
    /// Returns a [`CustomerError`] for the first invalid field.
    pub fn to_payload(&self, cart: &Cart, gst_percent: Decimal) -> Result<OrderPayload, CustomerError> {
        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() {
            return Err(CustomerError::MissingField("Name"));
        }
        let customer_phone = self.customer_phone.trim();
        if customer_phone.is_empty() {
            return Err(CustomerError::MissingField("Phone"));
        }
        let customer_email = match self.customer_email.trim() {
            "" => String::new(),
            raw => Email::parse(raw)?.into_inner(),
        };

        Ok(OrderPayload {
            customer_name: customer_name.to_string(),
            customer_phone: customer_phone.to_string(),
            customer_email,
            delivery_address: self.delivery_address.trim().to_string(),
            pincode: self.pincode.trim().to_string(),
            preferences: self.preferences.trim().to_string(),
            items: cart.order_lines(),
            gst_percent,
        })
    }
}

/// Where the checkout flow currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    /// Confirmation modal is open.
    AwaitingConfirmation,
    /// Order request in flight; submit control disabled.
    Submitting,
    /// Order accepted; the page has navigated away.
    Redirected(Url),
}

/// State of the submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: &'static str,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            enabled: true,
            label: PLACE_ORDER_LABEL,
        }
    }
}

/// Checkout flow for one ordering page.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    state: CheckoutState,
    submit: SubmitControl,
}

impl Checkout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    #[must_use]
    pub const fn submit_control(&self) -> SubmitControl {
        self.submit
    }

    /// Whether the confirmation modal should be shown.
    #[must_use]
    pub const fn is_confirming(&self) -> bool {
        matches!(self.state, CheckoutState::AwaitingConfirmation)
    }

    /// Open the confirmation modal.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::EmptyCart`] if nothing is selected (stays `Idle`)
    /// - [`StorefrontError::CheckoutInProgress`] while submitting or after redirect
    pub fn open(&mut self, cart: &Cart) -> Result<(), StorefrontError> {
        match self.state {
            CheckoutState::Submitting | CheckoutState::Redirected(_) => {
                Err(StorefrontError::CheckoutInProgress)
            }
            CheckoutState::AwaitingConfirmation => Ok(()),
            CheckoutState::Idle => {
                if cart.is_empty() {
                    return Err(StorefrontError::EmptyCart);
                }
                self.state = CheckoutState::AwaitingConfirmation;
                add_breadcrumb("checkout", "Confirmation opened", None);
                Ok(())
            }
        }
    }

    /// Close the confirmation modal without sending anything.
    ///
    /// Returns whether the modal was open.
    pub fn cancel(&mut self) -> bool {
        if self.is_confirming() {
            self.state = CheckoutState::Idle;
            add_breadcrumb("checkout", "Confirmation cancelled", None);
            true
        } else {
            false
        }
    }

    /// Validate the form and enter `Submitting`.
    ///
    /// On success the submit control is disabled and the returned payload
    /// must be sent, with the reply passed to [`Checkout::settle`]. On error
    /// the modal stays open and nothing may be sent.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NotConfirming`] if the modal is not open
    /// - [`StorefrontError::CheckoutInProgress`] if already submitting
    /// - [`StorefrontError::EmptyCart`] if the cart emptied meanwhile
    /// - [`StorefrontError::InvalidCustomer`] if the form is invalid
    pub fn begin_submit(
        &mut self,
        form: &CheckoutForm,
        cart: &Cart,
        gst_percent: Decimal,
    ) -> Result<OrderPayload, StorefrontError> {
        match self.state {
            CheckoutState::AwaitingConfirmation => {}
            CheckoutState::Submitting | CheckoutState::Redirected(_) => {
                return Err(StorefrontError::CheckoutInProgress);
            }
            CheckoutState::Idle => return Err(StorefrontError::NotConfirming),
        }
        if cart.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }
        let payload = form.to_payload(cart, gst_percent)?;

        self.state = CheckoutState::Submitting;
        self.submit = SubmitControl {
            enabled: false,
            label: PLACING_ORDER_LABEL,
        };
        let lines = payload.items.len().to_string();
        add_breadcrumb("checkout", "Order submitted", Some(&[("lines", lines.as_str())]));
        Ok(payload)
    }

    /// Apply the order endpoint's reply.
    ///
    /// The submit control is restored whatever the outcome. Success moves to
    /// `Redirected` and returns the target; failure returns to `Idle`.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NotConfirming`] if no submission was in flight
    /// - [`StorefrontError::Api`] carrying the failure otherwise
    pub fn settle(
        &mut self,
        reply: Result<OrderConfirmation, ApiError>,
        config: &StorefrontConfig,
    ) -> Result<Url, StorefrontError> {
        if self.state != CheckoutState::Submitting {
            return Err(StorefrontError::NotConfirming);
        }
        self.submit = SubmitControl::default();

        let target = reply
            .and_then(|confirmation| redirect_target(&confirmation, config).map_err(ApiError::from));
        match target {
            Ok(url) => {
                self.state = CheckoutState::Redirected(url.clone());
                add_breadcrumb("checkout", "Order placed", Some(&[("redirect", url.as_str())]));
                Ok(url)
            }
            Err(err) => {
                self.state = CheckoutState::Idle;
                Err(err.into())
            }
        }
    }
}

/// Where to go after a successful order.
///
/// Uses the server's `redirect_url` (resolved against the site), else the
/// confirmation page for the returned order id, else the orders list.
///
/// # Errors
///
/// Returns an error if the chosen target is not a valid URL reference.
pub fn redirect_target(
    confirmation: &OrderConfirmation,
    config: &StorefrontConfig,
) -> Result<Url, url::ParseError> {
    if let Some(redirect) = &confirmation.redirect_url {
        return config.base_url.join(redirect);
    }
    match &confirmation.order_id {
        Some(order_id) => config.confirmation_url(order_id.as_str()),
        None => config.orders_list_url(),
    }
}
