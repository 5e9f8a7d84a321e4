//! Non-negative monetary amounts.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of fractional digits used for display and persistence.
pub const DISPLAY_SCALE: u32 = 2;

/// A non-negative decimal amount (cost price, sale price, running totals).
///
/// Arithmetic is exact; rounding to [`DISPLAY_SCALE`] digits only happens in
/// [`Money::to_fixed`] and [`Money::rounded`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::invalid_input(format!(
                "amount cannot be negative: {amount}"
            )));
        }
        // Normalise -0 so equality and display stay stable.
        Ok(Self(amount.abs()))
    }

    /// Magnitude of a signed amount (margins can go negative; money cannot).
    pub fn abs_of(amount: Decimal) -> Self {
        Self(amount.abs())
    }

    /// Parse user-entered text (trimmed) into a non-negative amount.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| DomainError::invalid_input(format!("not a number: {trimmed:?}")))?;
        Self::new(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Amount for `quantity` units at this unit price.
    pub fn times(self, quantity: u64) -> Money {
        Money(self.0.saturating_mul(Decimal::from(quantity)))
    }

    pub fn plus(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Rounded half away from zero to [`DISPLAY_SCALE`] digits.
    pub fn rounded(self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Fixed two-digit rendering, e.g. `"12.00"`.
    pub fn to_fixed(self) -> String {
        format!("{:.2}", self.rounded().0)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_fixed())
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
