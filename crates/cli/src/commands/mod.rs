//! Subcommand implementations.

pub mod menu;
pub mod order;
pub mod watch;

use street_kitchen_core::ItemId;
use street_kitchen_storefront::ApiError;
use thiserror::Error;

/// Errors a subcommand can end with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Storefront request failed: {0}")]
    Api(#[from] ApiError),

    #[error("Template error: {0}")]
    Render(#[from] askama::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Item {0} is not on the menu")]
    UnknownItem(ItemId),

    #[error("Order was not placed")]
    NotPlaced,
}
