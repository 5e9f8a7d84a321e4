//! On-demand inventory aggregates.

use stockbook_core::Money;

use crate::item::Item;

/// Summary of the current item set.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct InventoryMetrics {
    pub unique_item_count: usize,
    pub total_quantity: u64,
    /// Σ quantity × cost price (valued at cost, not at sale price).
    pub total_valuation: Money,
}

impl InventoryMetrics {
    pub fn from_items(items: &[Item]) -> Self {
        items.iter().fold(
            Self {
                unique_item_count: items.len(),
                ..Self::default()
            },
            |acc, item| Self {
                unique_item_count: acc.unique_item_count,
                total_quantity: acc.total_quantity.saturating_add(item.quantity()),
                total_valuation: acc.total_valuation.plus(item.valuation()),
            },
        )
    }
}
