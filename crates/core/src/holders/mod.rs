//! Holder ledger - founders, option pools and individual allocations.

mod holders_model;

pub use holders_model::{Holder, HolderKind, HolderLedger};
