//! HTML fragments for the ordering page.
//!
//! Templates live under `templates/partials/`.

use askama::Template;

use super::{ItemRowView, PageView, SummaryView};
use crate::checkout::SubmitControl;

/// Item list fragment.
#[derive(Template)]
#[template(path = "partials/item_list.html")]
struct ItemListTemplate<'a> {
    rows: &'a [ItemRowView],
    loading: bool,
}

/// Summary and submit button fragment.
#[derive(Template)]
#[template(path = "partials/order_summary.html")]
struct OrderSummaryTemplate<'a> {
    summary: &'a SummaryView,
    submit: SubmitControl,
}

/// Render the item list (or the loading indicator).
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn item_list_html(view: &PageView) -> askama::Result<String> {
    ItemListTemplate {
        rows: view.rows(),
        loading: view.is_loading(),
    }
    .render()
}

/// Render the order summary with the submit control.
///
/// # Errors
///
/// Returns an error if template rendering fails.
pub fn order_summary_html(view: &PageView) -> askama::Result<String> {
    OrderSummaryTemplate {
        summary: view.summary(),
        submit: view.submit_control(),
    }
    .render()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use street_kitchen_core::ItemId;

    use super::*;
    use crate::cart::Cart;
    use crate::catalog::Catalog;
    use crate::checkout::PLACING_ORDER_LABEL;
    use crate::models::Item;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Item {
                id: ItemId::new(12),
                name: "Item12".to_string(),
                category: None,
                price: Decimal::from(100),
                available: true,
            },
            Item {
                id: ItemId::new(3),
                name: "Item3 <special>".to_string(),
                category: Some("chutney".to_string()),
                price: Decimal::from(50),
                available: false,
            },
        ])
    }

    #[test]
    fn test_loading_fragment() {
        let html = item_list_html(&PageView::new()).unwrap();
        assert!(html.contains("items-loading"));
        assert!(!html.contains("item-card"));
    }

    #[test]
    fn test_item_list_fragment() {
        let mut view = PageView::new();
        view.render_catalog(&catalog(), &Cart::new());
        let html = item_list_html(&view).unwrap();

        assert_eq!(html.matches("class=\"item-card\"").count(), 2);
        assert_eq!(html.matches("Unavailable").count(), 1);
        assert!(html.contains("₹100.00"));
        // Names are escaped
        assert!(html.contains("Item3 &#60;special&#62;") || html.contains("Item3 &lt;special&gt;"));
    }

    #[test]
    fn test_summary_fragment() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.change_quantity(&catalog, ItemId::new(12), 2).unwrap();

        let mut view = PageView::new();
        view.render_catalog(&catalog, &cart);
        view.render_summary(&cart.summary(&catalog, Decimal::from(5)));
        view.render_checkout(
            true,
            SubmitControl {
                enabled: false,
                label: PLACING_ORDER_LABEL,
            },
        );
        let html = order_summary_html(&view).unwrap();

        assert!(html.contains("Item12 × 2"));
        assert!(html.contains("₹200.00"));
        assert!(html.contains("GST 5%: ₹10.00"));
        assert!(html.contains("₹210.00"));
        assert!(html.contains("disabled"));
        assert!(html.contains(PLACING_ORDER_LABEL));
    }
}
