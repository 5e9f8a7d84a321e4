//! Display-ready view models.

use serde::Serialize;

use stockbook_core::Money;
use stockbook_inventory::{InventoryMetrics, Item, ProfitAndLoss};

/// `symbol` + two-decimal amount, e.g. `₹12.00`.
pub fn format_money(symbol: &str, amount: Money) -> String {
    format!("{symbol}{}", amount.to_fixed())
}

/// One row of the inventory table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRow {
    pub id: String,
    pub name: String,
    pub quantity: u64,
    pub cost_price: String,
}

impl InventoryRow {
    pub fn new(item: &Item, symbol: &str) -> Self {
        Self {
            id: item.id_typed().to_string(),
            name: item.name().to_string(),
            quantity: item.quantity(),
            cost_price: format_money(symbol, item.cost_price()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSummary {
    pub unique_items: usize,
    pub total_quantity: u64,
    pub total_valuation: String,
}

impl MetricsSummary {
    pub fn new(metrics: &InventoryMetrics, symbol: &str) -> Self {
        Self {
            unique_items: metrics.unique_item_count,
            total_quantity: metrics.total_quantity,
            total_valuation: format_money(symbol, metrics.total_valuation),
        }
    }
}

/// The inventory screen: summary plus (possibly filtered) rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryView {
    pub metrics: MetricsSummary,
    pub rows: Vec<InventoryRow>,
}

impl InventoryView {
    /// Nothing to show; the renderer displays its "no items" message.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialSummary {
    pub total_profit: String,
    pub total_loss: String,
}

impl FinancialSummary {
    pub fn new(totals: ProfitAndLoss, symbol: &str) -> Self {
        Self {
            total_profit: format_money(symbol, totals.profit),
            total_loss: format_money(symbol, totals.loss),
        }
    }
}

/// An entry in the item picker of the stock modification form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOption {
    pub id: String,
    pub label: String,
}

impl ItemOption {
    pub fn new(item: &Item, symbol: &str) -> Self {
        Self {
            id: item.id_typed().to_string(),
            label: format!(
                "{} (ID: {}, Qty: {}, Cost: {})",
                item.name(),
                item.id_typed(),
                item.quantity(),
                format_money(symbol, item.cost_price())
            ),
        }
    }
}
