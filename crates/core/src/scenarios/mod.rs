//! Named scenarios - persisted simulator states.

mod scenarios_model;
mod scenarios_traits;

pub use scenarios_model::{Scenario, ScenarioSummary};
pub use scenarios_traits::ScenarioRepositoryTrait;
