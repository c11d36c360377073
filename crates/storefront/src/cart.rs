//! Cart state and the order summary derived from it.
//!
//! The cart maps item ids to quantities. It only changes through
//! [`Cart::change_quantity`], which enforces the two cart rules:
//!
//! - quantities never go below zero (decrements clamp at 0)
//! - unavailable items keep whatever quantity they had
//!
//! Entries are kept in ascending id order, which is also the order summary
//! lines and order payload items appear in.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use street_kitchen_core::{CurrencyCode, ItemId, Price};

use crate::catalog::Catalog;
use crate::error::StorefrontError;
use crate::models::OrderLine;

/// Item id to selected quantity. Zero-quantity entries are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    quantities: BTreeMap<ItemId, u32>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `delta` to an item's quantity.
    ///
    /// Returns the new quantity, or `None` if the catalog has no such item
    /// (the change is ignored).
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::ItemUnavailable`] if the item is marked
    /// unavailable; the quantity is left untouched.
    pub fn change_quantity(
        &mut self,
        catalog: &Catalog,
        id: ItemId,
        delta: i32,
    ) -> Result<Option<u32>, StorefrontError> {
        let Some(item) = catalog.get(id) else {
            tracing::debug!(item_id = %id, "Quantity change for unknown item ignored");
            return Ok(None);
        };
        if !item.available {
            return Err(StorefrontError::ItemUnavailable(id));
        }

        let current = i64::from(self.quantity(id));
        let next = u32::try_from((current + i64::from(delta)).max(0)).unwrap_or(u32::MAX);
        if next == 0 {
            self.quantities.remove(&id);
        } else {
            self.quantities.insert(id, next);
        }

        tracing::debug!(item_id = %id, delta, quantity = next, "Cart quantity changed");
        Ok(Some(next))
    }

    /// Current quantity of an item (0 if absent).
    #[must_use]
    pub fn quantity(&self, id: ItemId) -> u32 {
        self.quantities.get(&id).copied().unwrap_or(0)
    }

    /// Entries with a positive quantity, in ascending id order.
    pub fn lines(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.quantities
            .iter()
            .filter(|&(_, &q)| q > 0)
            .map(|(&id, &q)| (id, q))
    }

    /// Whether nothing has been selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines().next().is_none()
    }

    /// Snapshot of the cart as order lines.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines()
            .map(|(id, quantity)| OrderLine { id, quantity })
            .collect()
    }

    /// Drop entries for items the catalog no longer lists.
    ///
    /// Returns the ids that were removed.
    pub fn retain_listed(&mut self, catalog: &Catalog) -> Vec<ItemId> {
        let removed: Vec<ItemId> = self
            .quantities
            .keys()
            .copied()
            .filter(|&id| !catalog.contains(id))
            .collect();
        for id in &removed {
            self.quantities.remove(id);
        }
        removed
    }

    /// Recompute the order summary.
    ///
    /// Pure: calling it twice without an intervening change yields the same
    /// summary.
    #[must_use]
    pub fn summary(&self, catalog: &Catalog, gst_percent: Decimal) -> Summary {
        let lines: Vec<SummaryLine> = self
            .lines()
            .filter_map(|(id, quantity)| {
                catalog.get(id).map(|item| SummaryLine {
                    item_id: id,
                    name: item.name.clone(),
                    quantity,
                    line_total: item.line_total(quantity),
                })
            })
            .collect();

        let total: Price = lines.iter().map(|line| line.line_total).sum();
        let gst_amount = total.percent_of(gst_percent);

        Summary {
            lines,
            total,
            gst_percent,
            gst_amount,
            payable: (total + gst_amount).rounded(),
        }
    }
}

/// One row of the order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub line_total: Price,
}

impl SummaryLine {
    /// Row label, e.g. "Ghee Idli × 2".
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} × {}", self.name, self.quantity)
    }
}

/// Running totals shown next to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub lines: Vec<SummaryLine>,
    /// Sum of all line totals.
    pub total: Price,
    pub gst_percent: Decimal,
    /// Estimated tax on `total`, rounded to the paisa.
    pub gst_amount: Price,
    /// `total` plus tax.
    pub payable: Price,
}

impl Default for Summary {
    fn default() -> Self {
        let zero = Price::zero(CurrencyCode::default());
        Self {
            lines: Vec::new(),
            total: zero,
            gst_percent: Decimal::ZERO,
            gst_amount: zero,
            payable: zero,
        }
    }
}
