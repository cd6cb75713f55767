use log::debug;

use crate::errors::Result;
use crate::holders::HolderLedger;
use crate::rounds::Round;

use super::cap_table_model::{CapTable, RawWeights};

/// Union of the ledger entries and each round's synthetic holder.
///
/// Ledger entries come first in insertion order, then rounds in sequence
/// order. A round named like an existing holder overwrites its weight.
pub fn collect_raw_weights(ledger: &HolderLedger, rounds: &[Round]) -> RawWeights {
    let mut raw = RawWeights::new();
    ledger.merge_into(&mut raw);
    for round in rounds {
        let (name, weight) = round.synthetic_holder();
        raw.upsert(name, weight);
    }
    raw
}

/// Rebuilds the normalized cap table from scratch.
///
/// Pure in its inputs, so calling it twice without a mutation in between
/// yields the same table.
pub fn recompute(ledger: &HolderLedger, rounds: &[Round]) -> Result<CapTable> {
    let raw = collect_raw_weights(ledger, rounds);
    debug!("Recomputing cap table from {} holders", raw.len());
    CapTable::normalize(&raw)
}
