//! Menu item model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use street_kitchen_core::{ItemId, Price};

/// Highest unit price a catalog item may carry, in rupees.
///
/// Keeps every line total representable for any cart quantity.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// A purchasable menu item.
///
/// Items are never edited client-side; a catalog refresh replaces them all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireItem")]
pub struct Item {
    /// Stable identifier used as the cart key.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Menu section (idli, chutney, ...), when the server sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Unit price in rupees.
    pub price: Decimal,
    /// Unavailable items render with a badge and refuse quantity changes.
    pub available: bool,
}

/// Item as the endpoint sends it. Availability comes as `available` or
/// `is_available`; when both are present `available` wins.
#[derive(Deserialize)]
struct WireItem {
    id: ItemId,
    name: String,
    #[serde(default)]
    category: Option<String>,
    price: Decimal,
    #[serde(default)]
    available: Option<bool>,
    #[serde(default)]
    is_available: Option<bool>,
}

impl From<WireItem> for Item {
    fn from(wire: WireItem) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            category: wire.category,
            price: wire.price,
            available: wire.available.or(wire.is_available).unwrap_or(true),
        }
    }
}

impl Item {
    /// Whether the price is non-negative and at most [`MAX_UNIT_PRICE`].
    #[must_use]
    pub fn has_valid_price(&self) -> bool {
        !self.price.is_sign_negative() && self.price <= MAX_UNIT_PRICE
    }

    /// Unit price as a [`Price`].
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }

    /// Price of `quantity` units of this item.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Price {
        self.unit_price().times(quantity)
    }
}

/// Body of the catalog endpoint.
///
/// The vendor items API wraps the list as `{"items": [...]}`; a bare list is
/// accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogResponse {
    List(Vec<Item>),
    Wrapped { items: Vec<Item> },
}

impl CatalogResponse {
    /// The items, in server order.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        match self {
            Self::List(items) | Self::Wrapped { items } => items,
        }
    }
}
