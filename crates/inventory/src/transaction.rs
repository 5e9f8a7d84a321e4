//! Stock transactions: why units leave the shelf and what that is worth.

use rust_decimal::Decimal;

use stockbook_core::{ItemId, Money};

/// Why stock is being reduced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TransactionReason {
    Sale,
    Damage,
}

impl TransactionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionReason::Sale => "sale",
            TransactionReason::Damage => "damage",
        }
    }
}

impl core::fmt::Display for TransactionReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TransactionReason {
    type Err = stockbook_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sale" => Ok(TransactionReason::Sale),
            "damage" => Ok(TransactionReason::Damage),
            other => Err(stockbook_core::DomainError::invalid_input(format!(
                "unknown transaction reason: {other:?}"
            ))),
        }
    }
}

/// Which running total a transaction was booked against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProfitOrLoss {
    Profit,
    Loss,
}

/// Profit/loss classification of a single transaction.
///
/// A sale with zero margin is booked as profit (it adds nothing to the total)
/// but stays distinguishable from a real profit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Settlement {
    SaleProfit(Money),
    SaleBreakeven,
    SaleLoss(Money),
    DamageLoss(Money),
}

impl Settlement {
    /// `(sale_price - cost_price) * quantity`, split by sign.
    pub fn for_sale(cost_price: Money, sale_price: Money, quantity: u64) -> Self {
        let margin_per_unit = sale_price.amount() - cost_price.amount();
        let total = margin_per_unit.saturating_mul(Decimal::from(quantity));
        if total.is_zero() {
            Settlement::SaleBreakeven
        } else if total.is_sign_positive() {
            Settlement::SaleProfit(Money::abs_of(total))
        } else {
            Settlement::SaleLoss(Money::abs_of(total))
        }
    }

    /// Damaged stock is written off at cost.
    pub fn for_damage(cost_price: Money, quantity: u64) -> Self {
        Settlement::DamageLoss(cost_price.times(quantity))
    }

    /// Absolute amount booked.
    pub fn amount(&self) -> Money {
        match self {
            Settlement::SaleProfit(m) | Settlement::SaleLoss(m) | Settlement::DamageLoss(m) => *m,
            Settlement::SaleBreakeven => Money::ZERO,
        }
    }

    pub fn side(&self) -> ProfitOrLoss {
        match self {
            Settlement::SaleProfit(_) | Settlement::SaleBreakeven => ProfitOrLoss::Profit,
            Settlement::SaleLoss(_) | Settlement::DamageLoss(_) => ProfitOrLoss::Loss,
        }
    }
}

/// Cumulative profit and loss. Both sides only ever grow.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ProfitAndLoss {
    pub profit: Money,
    pub loss: Money,
}

impl ProfitAndLoss {
    pub fn new(profit: Money, loss: Money) -> Self {
        Self { profit, loss }
    }

    pub(crate) fn book(&mut self, settlement: &Settlement) {
        match settlement.side() {
            ProfitOrLoss::Profit => self.profit = self.profit.plus(settlement.amount()),
            ProfitOrLoss::Loss => self.loss = self.loss.plus(settlement.amount()),
        }
    }
}

/// What a successful transaction did, for user feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub item_id: ItemId,
    pub item_name: String,
    pub reason: TransactionReason,
    pub quantity: u64,
    /// Unit sale price; `None` for damage.
    pub sale_price: Option<Money>,
    pub settlement: Settlement,
    /// The transaction depleted the item and it was removed.
    pub item_removed: bool,
}

impl TransactionOutcome {
    pub fn amount(&self) -> Money {
        self.settlement.amount()
    }

    pub fn profit_or_loss(&self) -> ProfitOrLoss {
        self.settlement.side()
    }
}
