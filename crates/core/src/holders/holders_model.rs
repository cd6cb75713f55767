//! Holder ledger models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cap_table::RawWeights;
use crate::errors::{CapTableError, Result};
use crate::utils::checked_sum;

/// What a ledger entry represents. Only used for display; aggregation
/// treats every entry the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HolderKind {
    #[default]
    Founder,
    OptionPool,
    Allocation,
}

/// A named owner with a raw, pre-normalization weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holder {
    pub name: String,
    #[serde(default)]
    pub kind: HolderKind,
    pub weight: Decimal,
}

/// Founders, pools and allocations in insertion order.
///
/// Names are unique: setting the weight of an existing name overwrites the
/// entry in place and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderLedger {
    holders: Vec<Holder>,
}

impl HolderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the raw weight of `name`, inserting the entry if missing.
    ///
    /// Other entries are left untouched; proportional rescaling is the
    /// dilution engine's job.
    pub fn set_weight(&mut self, name: &str, kind: HolderKind, weight: Decimal) -> Result<()> {
        validate_holder(name, weight)?;

        match self.holders.iter_mut().find(|h| h.name == name) {
            Some(existing) => {
                existing.weight = weight;
                existing.kind = kind;
            }
            None => self.holders.push(Holder {
                name: name.to_string(),
                kind,
                weight,
            }),
        }
        Ok(())
    }

    /// Upserts every entry into `target`, ledger order first.
    pub fn merge_into(&self, target: &mut RawWeights) {
        for holder in &self.holders {
            target.upsert(&holder.name, holder.weight);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Holder> {
        self.holders.iter().find(|h| h.name == name)
    }

    pub fn weight_of(&self, name: &str) -> Option<Decimal> {
        self.get(name).map(|h| h.weight)
    }

    pub fn holders(&self) -> &[Holder] {
        &self.holders
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holder> {
        self.holders.iter()
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    pub fn total_weight(&self) -> Result<Decimal> {
        checked_sum(self.holders.iter().map(|h| h.weight))
    }

    /// Mutable access to every raw weight, for proportional rescaling.
    pub(crate) fn weights_mut(&mut self) -> impl Iterator<Item = &mut Decimal> {
        self.holders.iter_mut().map(|h| &mut h.weight)
    }

    /// Structural check used when adopting externally supplied state.
    pub fn validate(&self) -> Result<()> {
        for (index, holder) in self.holders.iter().enumerate() {
            validate_holder(&holder.name, holder.weight)?;
            if self.holders[..index].iter().any(|h| h.name == holder.name) {
                return Err(CapTableError::InvalidInput(format!(
                    "Duplicate holder '{}' in ledger",
                    holder.name
                ))
                .into());
            }
        }
        Ok(())
    }
}

fn validate_holder(name: &str, weight: Decimal) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CapTableError::InvalidInput("Holder name must not be empty".to_string()).into());
    }
    if weight < Decimal::ZERO {
        return Err(CapTableError::InvalidWeight {
            holder: name.to_string(),
            weight,
        }
        .into());
    }
    Ok(())
}
