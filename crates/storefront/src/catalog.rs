//! In-memory menu catalog.

use std::collections::HashMap;

use street_kitchen_core::ItemId;

use crate::models::Item;

/// The current set of purchasable items, in server order.
///
/// A catalog is replaced wholesale on every refresh; individual items are
/// only ever read.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Build a catalog, keeping the first occurrence of any repeated id.
    ///
    /// Items priced outside `0..=MAX_UNIT_PRICE` are left out.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            if !item.has_valid_price() {
                tracing::warn!(item_id = %item.id, price = %item.price, "Item price out of range, ignoring");
                continue;
            }
            if index.contains_key(&item.id) {
                tracing::warn!(item_id = %item.id, "Duplicate item in catalog, ignoring");
                continue;
            }
            index.insert(item.id, unique.len());
            unique.push(item);
        }
        Self {
            items: unique,
            index,
        }
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.index.get(&id).and_then(|&i| self.items.get(i))
    }

    /// Whether the catalog has an item with this id.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    /// Items in server order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn item(id: i64, name: &str) -> Item {
        Item {
            id: ItemId::new(id),
            name: name.to_string(),
            category: None,
            price: Decimal::from(10),
            available: true,
        }
    }

    #[test]
    fn test_lookup_and_order() {
        let catalog = Catalog::new(vec![item(12, "Idli"), item(3, "Vada")]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(ItemId::new(3)).unwrap().name, "Vada");
        assert!(catalog.get(ItemId::new(99)).is_none());

        let names: Vec<_> = catalog.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Idli", "Vada"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = Catalog::new(vec![item(1, "First"), item(1, "Second")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(ItemId::new(1)).unwrap().name, "First");
    }

    #[test]
    fn test_out_of_range_prices_left_out() {
        let mut huge = item(7, "Huge");
        huge.price = "79228162514264337593543950335".parse().unwrap();
        let mut negative = item(8, "Negative");
        negative.price = Decimal::from(-5);

        let catalog = Catalog::new(vec![item(1, "Idli"), huge, negative]);

        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains(ItemId::new(7)));
        assert!(!catalog.contains(ItemId::new(8)));
    }

    #[test]
    fn test_default_is_empty() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(!catalog.contains(ItemId::new(1)));
    }
}
