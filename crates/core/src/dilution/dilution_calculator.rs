//! Pre-money dilution for new option pools.
//!
//! A new pool of `P`% squeezes every existing holder, round investors
//! included, into the remaining `100 - P`% in proportion to their current
//! percentage. The pool is then inserted with weight `P`, so after
//! normalization it sits at exactly `P`%.

use log::debug;
use rust_decimal::Decimal;

use crate::cap_table::collect_raw_weights;
use crate::constants::FULL_OWNERSHIP;
use crate::errors::{CapTableError, Result};
use crate::holders::{HolderKind, HolderLedger};
use crate::rounds::Round;
use crate::utils::checked_mul_div;

/// A pool must be non-negative and leave room for existing holders.
pub fn validate_pool_percentage(pool_percentage: Decimal) -> Result<()> {
    if pool_percentage < Decimal::ZERO {
        return Err(CapTableError::InvalidInput(format!(
            "pool percentage must not be negative, got {}",
            pool_percentage
        ))
        .into());
    }
    if FULL_OWNERSHIP - pool_percentage <= Decimal::ZERO {
        return Err(CapTableError::InvalidPoolSize(pool_percentage).into());
    }
    Ok(())
}

/// Percentage an existing holder keeps once a `pool_percentage` pool is carved out.
pub fn diluted_percentage(percentage: Decimal, pool_percentage: Decimal) -> Result<Decimal> {
    validate_pool_percentage(pool_percentage)?;
    let existing_total = FULL_OWNERSHIP - pool_percentage;
    checked_mul_div(percentage, existing_total, FULL_OWNERSHIP)
}

/// Rescales every current raw weight and inserts the pool into the ledger.
///
/// Raw weights are rewritten as percentages of the diluted table, which
/// keeps each round's synthetic weight equal to its `resolved_percentage`.
/// Validation happens before any write.
pub fn apply_pool_dilution(
    ledger: &mut HolderLedger,
    rounds: &mut [Round],
    pool_name: &str,
    pool_percentage: Decimal,
) -> Result<()> {
    validate_pool_percentage(pool_percentage)?;
    if pool_name.trim().is_empty() {
        return Err(CapTableError::InvalidInput("Pool name must not be empty".to_string()).into());
    }

    let existing_total = FULL_OWNERSHIP - pool_percentage;
    let raw_total = collect_raw_weights(ledger, rounds).total()?;
    debug!(
        "Diluting existing holders (raw total {}) into {}% for pool '{}' of {}%",
        raw_total, existing_total, pool_name, pool_percentage
    );

    if !raw_total.is_zero() {
        // p' = (w / raw_total * 100) * existing_total / 100
        let rescale = |weight: Decimal| checked_mul_div(weight, existing_total, raw_total);
        let holder_weights = ledger
            .holders()
            .iter()
            .map(|holder| rescale(holder.weight))
            .collect::<Result<Vec<_>>>()?;
        let round_weights = rounds
            .iter()
            .map(|round| rescale(round.resolved_percentage))
            .collect::<Result<Vec<_>>>()?;

        for (weight, rescaled) in ledger.weights_mut().zip(holder_weights) {
            *weight = rescaled;
        }
        for (round, rescaled) in rounds.iter_mut().zip(round_weights) {
            round.resolved_percentage = rescaled;
        }
    }

    ledger.set_weight(pool_name, HolderKind::OptionPool, pool_percentage)
}
