//! Conversion arithmetic: turns round inputs into a resolved percentage.
//!
//! Every function here is pure and validates its inputs before dividing, so
//! a failure never leaves a half-built round behind.

use log::debug;
use rust_decimal::Decimal;

use crate::constants::FULL_OWNERSHIP;
use crate::errors::{CapTableError, Result};
use crate::utils::{checked_add, checked_mul_div};

use super::rounds_model::{Round, RoundKind, RoundTerms};

/// Valuation figures of a priced equity round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedEquityTerms {
    pub post_money: Decimal,
    pub investor_percentage: Decimal,
}

/// Post-money valuation a capped or discounted SAFE converts at.
///
/// The cap wins when both are present, but a discount must lie within
/// [0, 100) either way. A discount-only SAFE is valued at the current raw
/// ownership total reduced by the discount.
pub fn safe_post_money_valuation(
    discount_rate: Option<Decimal>,
    post_money_cap: Option<Decimal>,
    current_total_weight: Decimal,
) -> Result<Decimal> {
    if let Some(discount_rate) = discount_rate {
        validate_discount_rate(discount_rate)?;
    }

    if let Some(cap) = post_money_cap {
        ensure_non_negative("post-money cap", cap)?;
        return Ok(cap);
    }

    let discount_rate = discount_rate.ok_or_else(|| {
        CapTableError::InvalidInput(
            "a SAFE needs a discount rate or a post-money cap".to_string(),
        )
    })?;

    checked_mul_div(
        current_total_weight,
        FULL_OWNERSHIP - discount_rate,
        FULL_OWNERSHIP,
    )
}

/// A discount is a percentage in [0, 100).
pub fn validate_discount_rate(discount_rate: Decimal) -> Result<()> {
    if discount_rate < Decimal::ZERO || discount_rate >= FULL_OWNERSHIP {
        return Err(CapTableError::InvalidInput(format!(
            "discount rate {}% must be at least 0 and below 100",
            discount_rate
        ))
        .into());
    }
    Ok(())
}

/// Resolved percentage of a capped or discounted SAFE.
pub fn safe_percentage(
    invested: Decimal,
    discount_rate: Option<Decimal>,
    post_money_cap: Option<Decimal>,
    current_total_weight: Decimal,
) -> Result<Decimal> {
    ensure_positive("invested amount", invested)?;
    let valuation = safe_post_money_valuation(discount_rate, post_money_cap, current_total_weight)?;
    percentage_of_post_money(invested, valuation)
}

/// Percentage an MFN SAFE resolves to against a priced round's post-money.
pub fn mfn_percentage(invested: Decimal, post_money: Decimal) -> Result<Decimal> {
    ensure_positive("invested amount", invested)?;
    percentage_of_post_money(invested, post_money)
}

/// Raw weight contributed by a convertible note: the invested amount itself.
pub fn convertible_note_weight(invested: Decimal, conversion_price: Decimal) -> Result<Decimal> {
    ensure_positive("invested amount", invested)?;
    ensure_positive("conversion price", conversion_price)?;
    Ok(invested)
}

/// `post_money = pre_money + invested`, investor owns `invested / post_money`.
pub fn priced_equity_terms(pre_money: Decimal, invested: Decimal) -> Result<PricedEquityTerms> {
    ensure_positive("pre-money valuation", pre_money)?;
    ensure_positive("invested amount", invested)?;

    let post_money = checked_add(pre_money, invested)?;
    let investor_percentage = percentage_of_post_money(invested, post_money)?;
    Ok(PricedEquityTerms {
        post_money,
        investor_percentage,
    })
}

/// Resolves every MFN SAFE against `post_money`, in round order.
///
/// Each SAFE is computed independently against the same post-money value.
/// SAFEs resolved by an earlier priced round are resolved again, so every
/// MFN SAFE follows the most recent priced round. Returns how many SAFEs
/// were resolved.
pub fn resolve_mfn_safes(rounds: &mut [Round], post_money: Decimal) -> Result<usize> {
    // Compute everything first so a failure leaves the rounds untouched.
    let resolutions = rounds
        .iter()
        .enumerate()
        .filter(|(_, round)| round.kind() == RoundKind::MfnSafe)
        .map(|(index, round)| mfn_percentage(round.invested, post_money).map(|p| (index, p)))
        .collect::<Result<Vec<(usize, Decimal)>>>()?;

    for (index, percentage) in &resolutions {
        let round = &mut rounds[*index];
        debug!(
            "Resolving MFN SAFE '{}' at post-money {}: {}%",
            round.name, post_money, percentage
        );
        round.terms = RoundTerms::MfnSafe {
            resolved_post_money: Some(post_money),
        };
        round.resolved_percentage = *percentage;
    }

    Ok(resolutions.len())
}

fn percentage_of_post_money(invested: Decimal, post_money: Decimal) -> Result<Decimal> {
    if post_money.is_zero() {
        return Err(CapTableError::DivisionByZero(
            "post-money valuation is zero".to_string(),
        )
        .into());
    }
    ensure_positive("post-money valuation", post_money)?;
    checked_mul_div(invested, FULL_OWNERSHIP, post_money)
}

/// Rejects zero and negative amounts with `InvalidInput`.
pub(crate) fn ensure_positive(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(CapTableError::InvalidInput(format!(
            "{} must be positive, got {}",
            field, value
        ))
        .into());
    }
    Ok(())
}

fn ensure_non_negative(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(CapTableError::InvalidInput(format!(
            "{} must not be negative, got {}",
            field, value
        ))
        .into());
    }
    Ok(())
}
