use rust_decimal::Decimal;

use stockbook_core::{DomainError, DomainResult, ItemId, Money};

/// A stock-keeping item: identity, display name, units on hand, unit cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: u64,
    cost_price: Money,
}

impl Item {
    /// Build an item from already-typed parts. The name is trimmed and must be
    /// non-empty.
    pub fn new(id: ItemId, name: &str, quantity: u64, cost_price: Money) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_input("name cannot be empty"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
            quantity,
            cost_price,
        })
    }

    /// Validate loosely-typed input at the ledger boundary.
    pub fn from_input(
        id: &str,
        name: &str,
        quantity: i64,
        cost_price: Decimal,
    ) -> DomainResult<Self> {
        let id = ItemId::parse(id)?;
        let quantity = u64::try_from(quantity)
            .map_err(|_| DomainError::invalid_input("quantity cannot be negative"))?;
        let cost_price = Money::new(cost_price)
            .map_err(|_| DomainError::invalid_input("cost price cannot be negative"))?;
        Self::new(id, name, quantity, cost_price)
    }

    pub fn id_typed(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn cost_price(&self) -> Money {
        self.cost_price
    }

    /// Value of the stock on hand at cost.
    pub fn valuation(&self) -> Money {
        self.cost_price.times(self.quantity)
    }

    /// Case-insensitive substring match on id or name. `needle` must already
    /// be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.id.as_str().to_lowercase().contains(needle)
            || self.name.to_lowercase().contains(needle)
    }

    pub(crate) fn remove_units(&mut self, units: u64) {
        self.quantity = self.quantity.saturating_sub(units);
    }
}
