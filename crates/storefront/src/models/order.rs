//! Order creation request and response bodies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use street_kitchen_core::{ItemId, OrderRef};

/// One `{id, quantity}` entry of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ItemId,
    /// Older pages sent this as `qty`; both spellings are read.
    #[serde(alias = "qty")]
    pub quantity: u32,
}

/// JSON body posted to the order creation endpoint.
///
/// Built fresh for every submission attempt from the cart snapshot and the
/// confirmation form; never stored.
///
/// ```json
/// {"customer_name":"Kumar","customer_phone":"9876543210","customer_email":"k@example.com",
///  "delivery_address":"123, Some Road, Chennai","pincode":"600001","preferences":"No onion",
///  "items":[{"id":12,"quantity":2},{"id":3,"quantity":1}],"gst_percent":5.0}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub delivery_address: String,
    pub pincode: String,
    pub preferences: String,
    pub items: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub gst_percent: Decimal,
}

/// Reply from the order creation endpoint.
///
/// A missing `success` flag counts as a failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderRef>,
}

/// The accepted part of a successful [`OrderResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_id: Option<OrderRef>,
    pub redirect_url: Option<String>,
}

impl From<OrderResponse> for OrderConfirmation {
    fn from(response: OrderResponse) -> Self {
        Self {
            order_id: response.order_id,
            redirect_url: response.redirect_url.filter(|url| !url.is_empty()),
        }
    }
}
