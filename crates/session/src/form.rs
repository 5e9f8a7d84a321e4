//! Raw form text → typed input.
//!
//! All numeric coercion happens here. Range rules (non-negative, positive)
//! are checked here for field-specific feedback and again by the ledger.

use core::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use stockbook_inventory::TransactionReason;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid item fields: {0}")]
    InvalidItem(&'static str),

    #[error("no item selected")]
    NoItemSelected,

    #[error("quantity must be a positive whole number")]
    InvalidQuantity,

    #[error("sale price must be a non-negative number")]
    InvalidSalePrice,
}

/// The add/edit item form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub id: String,
    pub name: String,
    pub quantity: String,
    pub cost_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub cost_price: Decimal,
}

impl ItemForm {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: impl Into<String>,
        cost_price: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity: quantity.into(),
            cost_price: cost_price.into(),
        }
    }

    pub fn parse(&self) -> Result<ItemInput, FormError> {
        let id = self.id.trim();
        let name = self.name.trim();
        if id.is_empty() {
            return Err(FormError::InvalidItem("id is required"));
        }
        if name.is_empty() {
            return Err(FormError::InvalidItem("name is required"));
        }
        let quantity = parse_whole(&self.quantity)
            .filter(|q| *q >= 0)
            .ok_or(FormError::InvalidItem("quantity must be a whole number of at least 0"))?;
        let cost_price = parse_decimal(&self.cost_price)
            .filter(|p| !p.is_sign_negative() || p.is_zero())
            .ok_or(FormError::InvalidItem("cost price must be a number of at least 0"))?;

        Ok(ItemInput {
            id: id.to_string(),
            name: name.to_string(),
            quantity,
            cost_price,
        })
    }
}

/// The stock modification form, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockForm {
    pub item_id: String,
    pub quantity: String,
    pub reason: TransactionReason,
    /// Only read for a sale.
    pub sale_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockInput {
    pub item_id: String,
    pub quantity: i64,
    pub reason: TransactionReason,
    pub sale_price: Option<Decimal>,
}

impl StockForm {
    pub fn sale(
        item_id: impl Into<String>,
        quantity: impl Into<String>,
        sale_price: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            quantity: quantity.into(),
            reason: TransactionReason::Sale,
            sale_price: sale_price.into(),
        }
    }

    pub fn damage(item_id: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            quantity: quantity.into(),
            reason: TransactionReason::Damage,
            sale_price: String::new(),
        }
    }

    pub fn parse(&self) -> Result<StockInput, FormError> {
        let item_id = self.item_id.trim();
        if item_id.is_empty() {
            return Err(FormError::NoItemSelected);
        }
        let quantity = parse_whole(&self.quantity)
            .filter(|q| *q > 0)
            .ok_or(FormError::InvalidQuantity)?;
        let sale_price = match self.reason {
            TransactionReason::Sale => Some(
                parse_decimal(&self.sale_price)
                    .filter(|p| !p.is_sign_negative() || p.is_zero())
                    .ok_or(FormError::InvalidSalePrice)?,
            ),
            TransactionReason::Damage => None,
        };

        Ok(StockInput {
            item_id: item_id.to_string(),
            quantity,
            reason: self.reason,
            sale_price,
        })
    }
}

fn parse_whole(raw: &str) -> Option<i64> {
    i64::from_str(raw.trim()).ok()
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}
