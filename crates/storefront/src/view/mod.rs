//! View model for the ordering page.
//!
//! [`PageView`] holds everything the page displays: one row per menu item,
//! the order summary, the loading indicator and the checkout controls. Rows
//! are indexed by item id so a quantity change updates its row directly.
//! The view is rendered to HTML fragments by [`render`].

pub mod render;

use std::collections::HashMap;

use street_kitchen_core::{ItemId, Price};

use crate::cart::{Cart, Summary};
use crate::catalog::Catalog;
use crate::checkout::SubmitControl;

/// Display state of one menu item row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    pub id: ItemId,
    pub name: String,
    /// Empty when the item has no category.
    pub category: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
    pub available: bool,
}

/// One rendered summary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLineView {
    pub label: String,
    pub line_total: String,
}

/// Rendered order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub lines: Vec<SummaryLineView>,
    pub total: String,
    pub gst_percent: String,
    pub gst_amount: String,
    pub payable: String,
}

impl From<&Summary> for SummaryView {
    fn from(summary: &Summary) -> Self {
        Self {
            lines: summary
                .lines
                .iter()
                .map(|line| SummaryLineView {
                    label: line.label(),
                    line_total: line.line_total.to_string(),
                })
                .collect(),
            total: summary.total.to_string(),
            gst_percent: summary.gst_percent.normalize().to_string(),
            gst_amount: summary.gst_amount.to_string(),
            payable: summary.payable.to_string(),
        }
    }
}

impl Default for SummaryView {
    fn default() -> Self {
        Self::from(&Summary::default())
    }
}

/// Everything the ordering page shows.
#[derive(Debug, Clone)]
pub struct PageView {
    rows: Vec<ItemRowView>,
    row_index: HashMap<ItemId, usize>,
    summary: SummaryView,
    loading: bool,
    checkout_open: bool,
    submit: SubmitControl,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            row_index: HashMap::new(),
            summary: SummaryView::default(),
            loading: true,
            checkout_open: false,
            submit: SubmitControl::default(),
        }
    }
}

impl PageView {
    /// A view showing the loading indicator and no items.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every item row from the catalog and hide the loading indicator.
    ///
    /// Rows show the cart's current quantities.
    pub fn render_catalog(&mut self, catalog: &Catalog, cart: &Cart) {
        self.rows = catalog
            .iter()
            .map(|item| {
                let quantity = cart.quantity(item.id);
                ItemRowView {
                    id: item.id,
                    name: item.name.clone(),
                    category: item.category.clone().unwrap_or_default(),
                    price: item.unit_price().to_string(),
                    quantity,
                    line_total: item.line_total(quantity).to_string(),
                    available: item.available,
                }
            })
            .collect();
        self.row_index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.id, i))
            .collect();
        self.loading = false;
    }

    /// Update one row's quantity and line total.
    ///
    /// Returns `false` if no row exists for the item.
    pub fn update_row(&mut self, id: ItemId, quantity: u32, line_total: Price) -> bool {
        let Some(row) = self
            .row_index
            .get(&id)
            .and_then(|&i| self.rows.get_mut(i))
        else {
            return false;
        };
        row.quantity = quantity;
        row.line_total = line_total.to_string();
        true
    }

    /// Replace the summary display.
    pub fn render_summary(&mut self, summary: &Summary) {
        self.summary = SummaryView::from(summary);
    }

    /// Reflect the checkout modal and submit control state.
    pub const fn render_checkout(&mut self, open: bool, submit: SubmitControl) {
        self.checkout_open = open;
        self.submit = submit;
    }

    #[must_use]
    pub fn rows(&self) -> &[ItemRowView] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, id: ItemId) -> Option<&ItemRowView> {
        self.row_index.get(&id).and_then(|&i| self.rows.get(i))
    }

    #[must_use]
    pub const fn summary(&self) -> &SummaryView {
        &self.summary
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_checkout_open(&self) -> bool {
        self.checkout_open
    }

    #[must_use]
    pub const fn submit_control(&self) -> SubmitControl {
        self.submit
    }
}
