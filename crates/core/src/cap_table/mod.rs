//! Cap table aggregation - merges the holder ledger with every round's
//! synthetic holder and normalizes the result.

mod aggregator;
mod cap_table_model;

pub use aggregator::{collect_raw_weights, recompute};
pub use cap_table_model::{CapTable, CapTableEntry, RawWeights};

#[cfg(test)]
mod aggregator_tests;
