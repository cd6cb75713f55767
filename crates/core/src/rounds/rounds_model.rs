//! Round domain models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::FULL_OWNERSHIP;
use crate::errors::{CapTableError, Result};

/// Instrument kind of a financing round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundKind {
    Safe,
    MfnSafe,
    ConvertibleNote,
    PricedEquity,
}

impl RoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundKind::Safe => "SAFE",
            RoundKind::MfnSafe => "MFN SAFE",
            RoundKind::ConvertibleNote => "Convertible Note",
            RoundKind::PricedEquity => "Priced Equity",
        }
    }
}

impl fmt::Display for RoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instrument-specific terms of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum RoundTerms {
    /// SAFE with a post-money cap, a discount, or both (cap wins).
    Safe {
        discount_rate: Option<Decimal>,
        post_money_cap: Option<Decimal>,
    },
    /// Uncapped, undiscounted SAFE. `resolved_post_money` follows the most
    /// recent priced round closed after it; until then it owns nothing.
    MfnSafe { resolved_post_money: Option<Decimal> },
    /// Contributes its invested amount directly as raw weight. The
    /// conversion price is recorded but does not enter the arithmetic.
    ConvertibleNote { conversion_price: Decimal },
    PricedEquity {
        pre_money: Decimal,
        post_money: Decimal,
        new_pool_percentage: Decimal,
    },
}

/// A financing round in the chronological round sequence.
///
/// Each round owns one synthetic cap table holder named after the round,
/// whose raw weight is `resolved_percentage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub name: String,
    pub invested: Decimal,
    pub terms: RoundTerms,
    pub resolved_percentage: Decimal,
}

impl Round {
    pub fn kind(&self) -> RoundKind {
        match self.terms {
            RoundTerms::Safe { .. } => RoundKind::Safe,
            RoundTerms::MfnSafe { .. } => RoundKind::MfnSafe,
            RoundTerms::ConvertibleNote { .. } => RoundKind::ConvertibleNote,
            RoundTerms::PricedEquity { .. } => RoundKind::PricedEquity,
        }
    }

    /// MFN SAFE still waiting for a priced round.
    pub fn is_pending_mfn(&self) -> bool {
        matches!(
            self.terms,
            RoundTerms::MfnSafe {
                resolved_post_money: None
            }
        )
    }

    /// Post-money valuation of a priced round.
    pub fn post_money(&self) -> Option<Decimal> {
        match self.terms {
            RoundTerms::PricedEquity { post_money, .. } => Some(post_money),
            _ => None,
        }
    }

    /// Name and raw weight of the synthetic holder this round contributes.
    pub fn synthetic_holder(&self) -> (&str, Decimal) {
        (self.name.as_str(), self.resolved_percentage)
    }

    /// Structural check used when adopting externally supplied state.
    ///
    /// Resolved percentages are only required to be non-negative: pool
    /// dilution rescales them after issuance.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Result<()> {
            Err(CapTableError::InvalidInput(format!("Round '{}': {}", self.name, reason)).into())
        };

        if self.name.trim().is_empty() {
            return Err(
                CapTableError::InvalidInput("Round name must not be empty".to_string()).into(),
            );
        }
        if self.invested <= Decimal::ZERO {
            return invalid(format!("invested amount {} must be positive", self.invested));
        }
        if self.resolved_percentage < Decimal::ZERO {
            return invalid(format!(
                "resolved percentage {} must not be negative",
                self.resolved_percentage
            ));
        }

        match &self.terms {
            RoundTerms::Safe {
                discount_rate,
                post_money_cap,
            } => {
                if discount_rate.is_none() && post_money_cap.is_none() {
                    return invalid("SAFE without discount or cap must be an MFN SAFE".to_string());
                }
                if post_money_cap.is_some_and(|cap| cap <= Decimal::ZERO) {
                    return invalid("post-money cap must be positive".to_string());
                }
                if discount_rate.is_some_and(|d| d < Decimal::ZERO || d >= FULL_OWNERSHIP) {
                    return invalid("discount rate must be within [0, 100)".to_string());
                }
            }
            RoundTerms::MfnSafe {
                resolved_post_money,
            } => match resolved_post_money {
                None if !self.resolved_percentage.is_zero() => {
                    return invalid("pending MFN SAFE must not own any percentage".to_string());
                }
                Some(post_money) if *post_money <= Decimal::ZERO => {
                    return invalid("resolved post-money must be positive".to_string());
                }
                _ => {}
            },
            RoundTerms::ConvertibleNote { conversion_price } => {
                if *conversion_price <= Decimal::ZERO {
                    return invalid("conversion price must be positive".to_string());
                }
            }
            RoundTerms::PricedEquity {
                pre_money,
                post_money,
                new_pool_percentage,
            } => {
                if *pre_money <= Decimal::ZERO {
                    return invalid("pre-money valuation must be positive".to_string());
                }
                if pre_money.checked_add(self.invested) != Some(*post_money) {
                    return invalid("post-money must equal pre-money plus invested".to_string());
                }
                if *new_pool_percentage < Decimal::ZERO || *new_pool_percentage >= FULL_OWNERSHIP {
                    return invalid("pool percentage must be within [0, 100)".to_string());
                }
            }
        }
        Ok(())
    }
}
