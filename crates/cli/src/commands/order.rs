//! Place an order from the terminal.
//!
//! The cart is built by applying each `--item ID=QTY` as a quantity change,
//! the summary is printed, and the order is submitted after confirmation.
//!
//! # Usage
//!
//! ```bash
//! sk-cli order --item 12=2 --item 3=1 --name Kumar --phone 9876543210
//!
//! # Skip the confirmation prompt
//! sk-cli order --item 12=1 --name Kumar --phone 9876543210 --email k@example.com --yes
//! ```

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use clap::Args;
use street_kitchen_core::ItemId;
use street_kitchen_storefront::checkout::CheckoutForm;
use street_kitchen_storefront::page::OrderPage;
use street_kitchen_storefront::{StorefrontClient, StorefrontConfig};

use super::CliError;
use crate::terminal::{TerminalSurface, menu_text, summary_text};

/// One `--item ID=QTY` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSelection {
    pub item: ItemId,
    pub quantity: i32,
}

impl FromStr for ItemSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ID=QTY, got '{s}'"))?;
        let item = id
            .parse::<ItemId>()
            .map_err(|_| format!("invalid item id '{id}'"))?;
        let quantity = quantity
            .trim()
            .parse::<i32>()
            .map_err(|_| format!("invalid quantity '{quantity}'"))?;
        Ok(Self { item, quantity })
    }
}

/// Arguments for `sk-cli order`.
#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Item and quantity as ID=QTY (repeatable)
    #[arg(long = "item", value_name = "ID=QTY", required = true)]
    pub items: Vec<ItemSelection>,

    /// Customer name
    #[arg(long)]
    pub name: String,

    /// Customer phone number
    #[arg(long)]
    pub phone: String,

    /// Customer email
    #[arg(long, default_value = "")]
    pub email: String,

    /// Delivery address
    #[arg(long, default_value = "")]
    pub address: String,

    /// Delivery pincode
    #[arg(long, default_value = "")]
    pub pincode: String,

    /// Preferences for the kitchen
    #[arg(long, default_value = "")]
    pub preferences: String,

    /// Place the order without asking
    #[arg(long, short)]
    pub yes: bool,
}

impl OrderArgs {
    fn form(&self) -> CheckoutForm {
        CheckoutForm {
            customer_name: self.name.clone(),
            customer_phone: self.phone.clone(),
            customer_email: self.email.clone(),
            delivery_address: self.address.clone(),
            pincode: self.pincode.clone(),
            preferences: self.preferences.clone(),
        }
    }
}

/// Build the cart, confirm and submit.
///
/// Declining the confirmation is not an error; nothing is sent.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched, an item is not on the
/// menu, or the order is not placed.
pub async fn run(config: StorefrontConfig, args: OrderArgs) -> Result<(), CliError> {
    let client = StorefrontClient::new(&config)?;
    let items = client.fetch_items().await?;

    let mut page = OrderPage::new(config, client, TerminalSurface::new(false));
    page.apply_catalog(Ok(items));

    for selection in &args.items {
        if !page.catalog().contains(selection.item) {
            return Err(CliError::UnknownItem(selection.item));
        }
        if page.change_quantity(selection.item, selection.quantity).is_none() {
            return Err(CliError::NotPlaced);
        }
    }

    let mut stdout = io::stdout();
    write!(stdout, "{}", menu_text(page.view()))?;
    writeln!(stdout)?;
    write!(stdout, "{}", summary_text(page.view()))?;

    if !page.open_checkout() {
        return Err(CliError::NotPlaced);
    }

    if !args.yes && !confirm("Place this order?")? {
        page.cancel_checkout();
        writeln!(stdout, "Order cancelled")?;
        return Ok(());
    }

    match page.submit_checkout(&args.form()).await {
        Some(_) => Ok(()),
        None => Err(CliError::NotPlaced),
    }
}

/// Ask a yes/no question on stdin. Anything but y/yes is a no.
fn confirm(question: &str) -> io::Result<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{question} [y/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        let selection: ItemSelection = "12=2".parse().unwrap();
        assert_eq!(selection.item, ItemId::new(12));
        assert_eq!(selection.quantity, 2);

        let selection: ItemSelection = "3=-1".parse().unwrap();
        assert_eq!(selection.quantity, -1);
    }

    #[test]
    fn test_parse_selection_rejects_malformed() {
        assert!("12".parse::<ItemSelection>().is_err());
        assert!("abc=1".parse::<ItemSelection>().is_err());
        assert!("12=two".parse::<ItemSelection>().is_err());
    }

    #[test]
    fn test_form_from_args() {
        let args = OrderArgs {
            items: vec!["12=1".parse().unwrap()],
            name: "Kumar".to_string(),
            phone: "9876543210".to_string(),
            email: String::new(),
            address: "123, Some Road".to_string(),
            pincode: "600001".to_string(),
            preferences: String::new(),
            yes: true,
        };
        let form = args.form();
        assert_eq!(form.customer_name, "Kumar");
        assert_eq!(form.delivery_address, "123, Some Road");
        assert!(form.customer_email.is_empty());
    }
}
