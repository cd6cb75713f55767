//! Database models for scenarios.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use captable_core::scenarios::{Scenario, ScenarioSummary};
use captable_core::SimulatorState;

use crate::errors::StorageError;

/// Database model for a stored scenario. The simulator state is kept as
/// a JSON document.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::scenarios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ScenarioDB {
    pub name: String,
    pub state_json: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ScenarioDB {
    pub fn from_state(
        name: &str,
        state: &SimulatorState,
        now: NaiveDateTime,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            name: name.to_string(),
            state_json: serde_json::to_string(state)?,
            created_at: now,
            updated_at: now,
        })
    }

    fn state(&self) -> Result<SimulatorState, StorageError> {
        Ok(serde_json::from_str(&self.state_json)?)
    }
}

impl TryFrom<ScenarioDB> for Scenario {
    type Error = StorageError;

    fn try_from(db: ScenarioDB) -> Result<Self, Self::Error> {
        let state = db.state()?;
        Ok(Scenario {
            name: db.name,
            state,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&ScenarioDB> for ScenarioSummary {
    type Error = StorageError;

    fn try_from(db: &ScenarioDB) -> Result<Self, Self::Error> {
        let state = db.state()?;
        Ok(ScenarioSummary {
            name: db.name.clone(),
            holder_count: state.holders.len(),
            round_count: state.rounds.len(),
            updated_at: db.updated_at,
        })
    }
}
