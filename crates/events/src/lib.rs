//! Domain events.
//!
//! Events describe what a command changed. The ledger applies them as soon as
//! they are decided; nothing here stores them.

pub mod event;

pub use event::Event;
