//! `stockbook-session`
//!
//! **Responsibility:** the contract between a renderer and the ledger.
//!
//! This crate provides:
//! - Raw form parsing (text in, typed values out)
//! - Persist-after-every-mutation, with non-fatal save failures
//! - User notices and display-ready view models
//!
//! It has no UI-framework dependency; a renderer calls into [`Session`] and
//! redraws from what it returns.

pub mod config;
pub mod display;
pub mod form;
pub mod notice;
pub mod session;

pub use config::SessionConfig;
pub use display::{FinancialSummary, InventoryRow, InventoryView, ItemOption, MetricsSummary};
pub use form::{FormError, ItemForm, ItemInput, StockForm, StockInput};
pub use notice::{Feedback, Notice, NoticeKind};
pub use session::{EditForm, Session};
