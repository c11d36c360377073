//! Wire models shared with the ordering site.
//!
//! - [`item`] - Menu items as served by the catalog endpoint
//! - [`order`] - Order payload sent at checkout and the server's reply

pub mod item;
pub mod order;

pub use item::{CatalogResponse, Item};
pub use order::{OrderConfirmation, OrderLine, OrderPayload, OrderResponse};
