//! Cap table models: raw weights before normalization and the normalized table.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DISPLAY_DECIMAL_PRECISION, FULL_OWNERSHIP, PERCENTAGE_TOLERANCE};
use crate::errors::{CapTableError, Result};
use crate::utils::{checked_mul_div, checked_sum};

/// Raw ownership weights keyed by holder name, in first-insertion order.
///
/// Upserting an existing name replaces its weight but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWeights {
    entries: Vec<(String, Decimal)>,
}

impl RawWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, name: &str, weight: Decimal) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = weight,
            None => self.entries.push((name.to_string(), weight)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, w)| *w)
    }

    /// Sum of all raw weights; amounts too large for a `Decimal` are an error.
    pub fn total(&self) -> Result<Decimal> {
        checked_sum(self.entries.iter().map(|(_, w)| *w))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(n, w)| (n.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One row of the cap table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapTableEntry {
    pub holder: String,
    /// Percentage of total ownership (0-100), full precision
    pub percentage: Decimal,
}

/// Normalized ownership table. Percentages sum to 100 within
/// `PERCENTAGE_TOLERANCE` unless the table is empty.
///
/// The only way to build one is through [`CapTable::normalize`], so any
/// change to the underlying weights goes through a renormalization pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapTable {
    entries: Vec<CapTableEntry>,
}

impl CapTable {
    /// Scales every raw weight to its share of the total, times 100.
    pub fn normalize(raw: &RawWeights) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::default());
        }

        let total = raw.total()?;
        if total.is_zero() {
            return Err(CapTableError::DivisionByZero(
                "cannot normalize a cap table whose raw weights sum to zero".to_string(),
            )
            .into());
        }

        let entries = raw
            .iter()
            .map(|(holder, weight)| {
                Ok(CapTableEntry {
                    holder: holder.to_string(),
                    percentage: checked_mul_div(weight, FULL_OWNERSHIP, total)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CapTableEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapTableEntry> {
        self.entries.iter()
    }

    pub fn percentage_of(&self, holder: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|e| e.holder == holder)
            .map(|e| e.percentage)
    }

    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.percentage).sum()
    }

    /// True when the table is empty or sums to 100 within tolerance.
    pub fn is_balanced(&self) -> bool {
        self.entries.is_empty() || (self.total() - FULL_OWNERSHIP).abs() <= PERCENTAGE_TOLERANCE
    }

    /// Holder/percentage pairs rounded to `precision` decimal places.
    pub fn display_rows(&self, precision: u32) -> Vec<(String, Decimal)> {
        self.entries
            .iter()
            .map(|e| (e.holder.clone(), e.percentage.round_dp(precision)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for CapTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let percentage = entry.percentage.round_dp(DISPLAY_DECIMAL_PRECISION);
            writeln!(f, "{}: {:.2}%", entry.holder, percentage)?;
        }
        Ok(())
    }
}
