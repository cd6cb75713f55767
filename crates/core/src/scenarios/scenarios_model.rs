//! Scenario domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::simulator::SimulatorState;

/// A simulator state stored under a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    pub state: SimulatorState,
    pub updated_at: NaiveDateTime,
}

/// Listing entry for a stored scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub name: String,
    pub holder_count: usize,
    pub round_count: usize,
    pub updated_at: NaiveDateTime,
}

impl From<&Scenario> for ScenarioSummary {
    fn from(scenario: &Scenario) -> Self {
        Self {
            name: scenario.name.clone(),
            holder_count: scenario.state.holders.len(),
            round_count: scenario.state.rounds.len(),
            updated_at: scenario.updated_at,
        }
    }
}
