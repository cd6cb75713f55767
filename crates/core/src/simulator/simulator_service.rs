use std::mem;

use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::cap_table::{collect_raw_weights, recompute, CapTable};
use crate::constants::{pool_name_after_round, FULL_OWNERSHIP, INITIAL_POOL_NAME};
use crate::dilution::{apply_pool_dilution, validate_pool_percentage};
use crate::errors::{CapTableError, Error, Result};
use crate::history::{History, StateSnapshot};
use crate::holders::{Holder, HolderKind, HolderLedger};
use crate::rounds::rounds_calculator::ensure_positive;
use crate::rounds::{
    convertible_note_weight, priced_equity_terms, resolve_mfn_safes, safe_percentage,
    Round, RoundTerms,
};
use crate::settings::SimulatorSettings;

use super::simulator_model::SimulatorState;
use super::simulator_traits::CapTableServiceTrait;

/// In-memory cap table simulator.
///
/// Owns the holder ledger, the chronological round sequence, the undo
/// history and the derived cap table. Mutations run against copies of the
/// ledger and rounds and are committed only once the new table has been
/// computed.
#[derive(Debug, Clone, Default)]
pub struct CapTableSimulator {
    settings: SimulatorSettings,
    holders: HolderLedger,
    rounds: Vec<Round>,
    history: History,
    cap_table: CapTable,
}

impl CapTableSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SimulatorSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            history: History::with_limit(settings.history_limit),
            settings,
            ..Self::default()
        })
    }

    /// Builds a simulator from persisted state.
    pub fn from_state(state: SimulatorState) -> Result<Self> {
        let mut simulator = Self::new();
        simulator.restore_state(state)?;
        Ok(simulator)
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn set_history_limit(&mut self, limit: Option<usize>) -> Result<()> {
        let settings = SimulatorSettings {
            history_limit: limit,
            ..self.settings.clone()
        };
        settings.validate()?;
        self.history.set_limit(limit);
        self.settings = settings;
        Ok(())
    }

    /// Rebuilds the cap table from the ledger and rounds.
    pub fn recompute(&mut self) -> Result<&CapTable> {
        self.cap_table = recompute(&self.holders, &self.rounds)?;
        Ok(&self.cap_table)
    }

    /// Runs `mutation` on copies of the ledger and rounds, then commits the
    /// copies, the recomputed table and an undo snapshot of the old state.
    fn apply<F>(&mut self, label: String, mutation: F) -> Result<&CapTable>
    where
        F: FnOnce(&mut HolderLedger, &mut Vec<Round>) -> Result<()>,
    {
        let mut holders = self.holders.clone();
        let mut rounds = self.rounds.clone();
        mutation(&mut holders, &mut rounds)?;
        let cap_table = recompute(&holders, &rounds)?;

        let previous = StateSnapshot {
            label: label.clone(),
            holders: mem::replace(&mut self.holders, holders),
            rounds: mem::replace(&mut self.rounds, rounds),
        };
        self.history.push(previous);
        self.cap_table = cap_table;

        info!("{} ({} holders on the cap table)", label, self.cap_table.len());
        Ok(&self.cap_table)
    }

    fn validate_state(state: &SimulatorState) -> Result<()> {
        state
            .settings
            .validate()
            .map_err(|e| CapTableError::InvalidInput(e.to_string()))?;
        validate_structure(&state.holders, &state.rounds)?;
        for snapshot in state.history.snapshots() {
            validate_structure(&snapshot.holders, &snapshot.rounds).map_err(|e| {
                CapTableError::InvalidInput(format!(
                    "history snapshot '{}' is invalid: {}",
                    snapshot.label, e
                ))
            })?;
        }
        Ok(())
    }
}

impl CapTableServiceTrait for CapTableSimulator {
    fn initialize_founders(
        &mut self,
        founders: &[(String, Decimal)],
        initial_pool_percentage: Decimal,
    ) -> Result<&CapTable> {
        if founders.is_empty() {
            return Err(
                CapTableError::InvalidInput("at least one founder is required".to_string()).into(),
            );
        }
        validate_pool_percentage(initial_pool_percentage)?;

        let label = format!("Initialize {} founders", founders.len());
        self.apply(label, |holders, _| {
            for (name, weight) in founders {
                holders.set_weight(name.trim(), HolderKind::Founder, *weight)?;
            }
            // The initial pool row is present even at 0%.
            holders.set_weight(INITIAL_POOL_NAME, HolderKind::OptionPool, initial_pool_percentage)
        })
    }

    fn add_safe_round(
        &mut self,
        name: &str,
        invested: Decimal,
        discount_rate: Option<Decimal>,
        post_money_cap: Option<Decimal>,
    ) -> Result<&CapTable> {
        let name = validate_round_name(name)?;

        if discount_rate.is_none() && post_money_cap.is_none() {
            ensure_positive("invested amount", invested)?;
            let label = format!("Add MFN SAFE round '{}'", name);
            return self.apply(label, |_, rounds| {
                debug!("MFN SAFE '{}' stays pending until the next priced round", name);
                rounds.push(Round {
                    name: name.to_string(),
                    invested,
                    terms: RoundTerms::MfnSafe {
                        resolved_post_money: None,
                    },
                    resolved_percentage: Decimal::ZERO,
                });
                Ok(())
            });
        }

        if discount_rate.is_some() && post_money_cap.is_some() {
            debug!("SAFE '{}' has both a cap and a discount; the cap applies", name);
        }

        let label = format!("Add SAFE round '{}'", name);
        self.apply(label, |holders, rounds| {
            let current_total = collect_raw_weights(holders, rounds).total()?;
            let percentage = safe_percentage(invested, discount_rate, post_money_cap, current_total)?;
            rounds.push(Round {
                name: name.to_string(),
                invested,
                terms: RoundTerms::Safe {
                    discount_rate,
                    post_money_cap,
                },
                resolved_percentage: percentage,
            });
            Ok(())
        })
    }

    fn add_convertible_note_round(
        &mut self,
        name: &str,
        invested: Decimal,
        conversion_price: Decimal,
    ) -> Result<&CapTable> {
        let name = validate_round_name(name)?;
        let weight = convertible_note_weight(invested, conversion_price)?;

        let label = format!("Add convertible note round '{}'", name);
        self.apply(label, |_, rounds| {
            rounds.push(Round {
                name: name.to_string(),
                invested,
                terms: RoundTerms::ConvertibleNote { conversion_price },
                resolved_percentage: weight,
            });
            Ok(())
        })
    }

    fn add_priced_equity_round(
        &mut self,
        name: &str,
        pre_money: Decimal,
        invested: Decimal,
        new_pool_percentage: Decimal,
    ) -> Result<&CapTable> {
        let name = validate_round_name(name)?;
        let terms = priced_equity_terms(pre_money, invested)?;
        validate_pool_percentage(new_pool_percentage)?;

        let label = format!("Add priced equity round '{}'", name);
        self.apply(label, |holders, rounds| {
            if !new_pool_percentage.is_zero() {
                let pool_name = pool_name_after_round(rounds.len());
                apply_pool_dilution(holders, rounds, &pool_name, new_pool_percentage)?;
            }

            rounds.push(Round {
                name: name.to_string(),
                invested,
                terms: RoundTerms::PricedEquity {
                    pre_money,
                    post_money: terms.post_money,
                    new_pool_percentage,
                },
                resolved_percentage: terms.investor_percentage,
            });

            let resolved = resolve_mfn_safes(rounds, terms.post_money)?;
            if resolved > 0 {
                info!(
                    "Priced round '{}' resolved {} MFN SAFE(s) at post-money {}",
                    name, resolved, terms.post_money
                );
            }
            Ok(())
        })
    }

    fn create_option_pool(&mut self, new_pool_percentage: Decimal) -> Result<&CapTable> {
        validate_pool_percentage(new_pool_percentage)?;
        if new_pool_percentage.is_zero() {
            return Err(CapTableError::InvalidInput(
                "option pool percentage must be positive".to_string(),
            )
            .into());
        }

        let pool_name = pool_name_after_round(self.rounds.len());
        let label = format!("Create option pool '{}' of {}%", pool_name, new_pool_percentage);
        self.apply(label, |holders, rounds| {
            apply_pool_dilution(holders, rounds, &pool_name, new_pool_percentage)
        })
    }

    fn allocate(&mut self, name: &str, percentage: Decimal) -> Result<&CapTable> {
        let name = name.trim();
        if percentage >= FULL_OWNERSHIP {
            return Err(CapTableError::InvalidPoolSize(percentage).into());
        }

        let label = format!("Allocate {}% to '{}'", percentage, name);
        self.apply(label, |holders, _| {
            holders.set_weight(name, HolderKind::Allocation, percentage)
        })
    }

    fn undo(&mut self) -> Result<StateSnapshot> {
        let snapshot = match self.history.undo() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Undo requested with an empty history");
                return Err(e);
            }
        };

        let cap_table = match recompute(&snapshot.holders, &snapshot.rounds) {
            Ok(table) => table,
            Err(e) => {
                self.history.push(snapshot);
                return Err(e);
            }
        };

        // Hand back the state that was undone, labelled with its mutation.
        let undone = StateSnapshot {
            label: snapshot.label,
            holders: mem::replace(&mut self.holders, snapshot.holders),
            rounds: mem::replace(&mut self.rounds, snapshot.rounds),
        };
        self.cap_table = cap_table;
        info!("Undid: {}", undone.label);
        Ok(undone)
    }

    fn current_cap_table(&self) -> &CapTable {
        &self.cap_table
    }

    fn display_cap_table(&self) -> Vec<(String, Decimal)> {
        self.cap_table.display_rows(self.settings.display_precision)
    }

    fn holders(&self) -> &[Holder] {
        self.holders.holders()
    }

    fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    fn history_labels(&self) -> Vec<&str> {
        self.history.labels()
    }

    fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }

    fn serialize_state(&self) -> SimulatorState {
        SimulatorState {
            settings: self.settings.clone(),
            holders: self.holders.clone(),
            rounds: self.rounds.clone(),
            history: self.history.clone(),
        }
    }

    fn restore_state(&mut self, state: SimulatorState) -> Result<&CapTable> {
        Self::validate_state(&state)?;
        let cap_table = recompute(&state.holders, &state.rounds).map_err(|e| match e {
            Error::CapTable(CapTableError::DivisionByZero(reason)) => {
                Error::from(CapTableError::InvalidInput(format!(
                    "restored state has no ownership to normalize: {}",
                    reason
                )))
            }
            other => other,
        })?;

        let mut history = state.history;
        history.set_limit(state.settings.history_limit);

        self.settings = state.settings;
        self.holders = state.holders;
        self.rounds = state.rounds;
        self.history = history;
        self.cap_table = cap_table;

        info!(
            "Restored simulator state: {} holders, {} rounds, {} undo snapshots",
            self.holders.len(),
            self.rounds.len(),
            self.history.len()
        );
        Ok(&self.cap_table)
    }
}

fn validate_round_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(
            CapTableError::InvalidInput("round name must not be empty".to_string()).into(),
        );
    }
    Ok(name)
}

/// Checks a ledger and round sequence for internal consistency.
fn validate_structure(holders: &HolderLedger, rounds: &[Round]) -> Result<()> {
    holders.validate()?;

    // MFN SAFEs before the last priced round follow its post-money; later ones are pending.
    let mut latest_post_money: Option<Decimal> = None;
    for round in rounds.iter().rev() {
        round.validate()?;
        match &round.terms {
            RoundTerms::PricedEquity { post_money, .. } if latest_post_money.is_none() => {
                latest_post_money = Some(*post_money);
            }
            RoundTerms::MfnSafe {
                resolved_post_money,
            } if *resolved_post_money != latest_post_money => {
                return Err(CapTableError::InvalidInput(format!(
                    "MFN SAFE '{}' must be resolved against the latest priced round",
                    round.name
                ))
                .into());
            }
            _ => {}
        }
    }
    Ok(())
}
