use crate::errors::Result;
use crate::simulator::SimulatorState;

use super::scenarios_model::{Scenario, ScenarioSummary};

/// Trait for scenario repository operations.
///
/// The engine never picks a storage format; implementations store the
/// state value verbatim.
pub trait ScenarioRepositoryTrait: Send + Sync {
    /// Inserts or replaces the scenario called `name`.
    fn save_scenario(&self, name: &str, state: &SimulatorState) -> Result<Scenario>;

    fn load_scenario(&self, name: &str) -> Result<Option<Scenario>>;

    /// Stored scenarios ordered by name.
    fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>>;

    /// Returns the number of deleted scenarios (0 or 1).
    fn delete_scenario(&self, name: &str) -> Result<usize>;
}
