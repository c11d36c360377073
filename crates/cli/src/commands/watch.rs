//! Keep the menu on screen.
//!
//! Runs the page event loop: the catalog is fetched immediately and then on
//! every `CATALOG_REFRESH_SECS` tick, and the menu is reprinted whenever it
//! changes. Ctrl+C stops the loop.
//!
//! # Usage
//!
//! ```bash
//! CATALOG_REFRESH_SECS=5 sk-cli watch
//! ```

use street_kitchen_storefront::page::{OrderPage, PageEvent, run_page};
use street_kitchen_storefront::{StorefrontClient, StorefrontConfig};
use tokio::sync::mpsc;

use super::CliError;
use crate::terminal::TerminalSurface;

/// Run the page loop until interrupted.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub async fn run(config: StorefrontConfig) -> Result<(), CliError> {
    let client = StorefrontClient::new(&config)?;
    tracing::info!(
        vendor = %config.vendor_code,
        every = ?config.refresh_interval,
        "Watching menu"
    );
    let page = OrderPage::new(config, client, TerminalSurface::new(true));

    let (events, rx) = mpsc::unbounded_channel::<PageEvent>();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
        tracing::info!("Stopping");
        // Closing the channel ends the loop.
        drop(events);
    });

    run_page(page, rx).await;
    Ok(())
}
