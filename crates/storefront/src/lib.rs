//! Street Kitchen Storefront - ordering client library.
//!
//! Everything a vendor's ordering page does, without a browser:
//!
//! - [`catalog`] - the menu, refreshed from the site on a fixed interval
//! - [`cart`] - item quantities and the running order summary
//! - [`checkout`] - confirmation, validation and order submission state
//! - [`api`] - HTTP client for the catalog and order endpoints
//! - [`view`] - view model and HTML fragments
//! - [`page`] - the controller tying these together, and its event loop
//!
//! # Example
//!
//! ```rust,ignore
//! use street_kitchen_storefront::{StorefrontClient, StorefrontConfig, page::OrderPage};
//!
//! let config = StorefrontConfig::from_env()?;
//! let client = StorefrontClient::new(&config)?;
//! let mut page = OrderPage::new(config, client, surface);
//!
//! page.refresh_catalog().await;
//! page.change_quantity(ItemId::new(12), 2);
//! if page.open_checkout() {
//!     page.submit_checkout(&form).await;
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod page;
pub mod view;

pub use api::{ApiError, StorefrontBackend, StorefrontClient};
pub use config::StorefrontConfig;
pub use error::{CustomerError, StorefrontError};
