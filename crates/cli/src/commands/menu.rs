//! Print the vendor's menu.
//!
//! # Usage
//!
//! ```bash
//! sk-cli menu
//! sk-cli menu --html > menu.html
//! ```

use std::io::{self, Write};

use street_kitchen_storefront::page::OrderPage;
use street_kitchen_storefront::view::render;
use street_kitchen_storefront::{StorefrontClient, StorefrontConfig};

use super::CliError;
use crate::terminal::{TerminalSurface, menu_text};

/// Fetch the catalog once and print it.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched or rendered.
pub async fn run(config: StorefrontConfig, html: bool) -> Result<(), CliError> {
    let client = StorefrontClient::new(&config)?;
    let items = client.fetch_items().await?;

    let mut page = OrderPage::new(config, client, TerminalSurface::new(false));
    page.apply_catalog(Ok(items));

    let out = if html {
        render::item_list_html(page.view())?
    } else {
        menu_text(page.view())
    };
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", out.trim_end())?;
    Ok(())
}
