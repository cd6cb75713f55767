use rust_decimal::Decimal;

use crate::cap_table::CapTable;
use crate::errors::Result;
use crate::history::StateSnapshot;
use crate::holders::Holder;
use crate::rounds::Round;
use crate::settings::SimulatorSettings;

use super::simulator_model::SimulatorState;

/// Operations the cap table engine exposes to its collaborators.
///
/// Every mutating operation is atomic: on error nothing is written and no
/// undo snapshot is recorded.
pub trait CapTableServiceTrait {
    /// Adds founders and the initial option pool as raw weights.
    fn initialize_founders(
        &mut self,
        founders: &[(String, Decimal)],
        initial_pool_percentage: Decimal,
    ) -> Result<&CapTable>;

    /// Adds a SAFE. With neither discount nor cap it becomes an MFN SAFE
    /// that stays at 0% until the next priced round.
    fn add_safe_round(
        &mut self,
        name: &str,
        invested: Decimal,
        discount_rate: Option<Decimal>,
        post_money_cap: Option<Decimal>,
    ) -> Result<&CapTable>;

    fn add_convertible_note_round(
        &mut self,
        name: &str,
        invested: Decimal,
        conversion_price: Decimal,
    ) -> Result<&CapTable>;

    /// Tops up the option pool pre-money, adds the investors and resolves
    /// pending MFN SAFEs against the round's post-money valuation.
    fn add_priced_equity_round(
        &mut self,
        name: &str,
        pre_money: Decimal,
        invested: Decimal,
        new_pool_percentage: Decimal,
    ) -> Result<&CapTable>;

    fn create_option_pool(&mut self, new_pool_percentage: Decimal) -> Result<&CapTable>;

    /// Grants `name` a fixed raw weight without rescaling anyone.
    fn allocate(&mut self, name: &str, percentage: Decimal) -> Result<&CapTable>;

    /// Reverts the most recent mutation. Fails with the recoverable
    /// `EmptyHistory` when there is nothing to revert.
    fn undo(&mut self) -> Result<StateSnapshot>;

    fn current_cap_table(&self) -> &CapTable;

    /// Cap table rounded to the configured display precision.
    fn display_cap_table(&self) -> Vec<(String, Decimal)>;

    fn holders(&self) -> &[Holder];

    fn rounds(&self) -> &[Round];

    fn history_labels(&self) -> Vec<&str>;

    fn settings(&self) -> &SimulatorSettings;

    fn serialize_state(&self) -> SimulatorState;

    /// Replaces the whole state after validating it; invalid input is
    /// rejected without adopting any part of it.
    fn restore_state(&mut self, state: SimulatorState) -> Result<&CapTable>;
}
