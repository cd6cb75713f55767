use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use captable_core::errors::{Result, ValidationError};
use captable_core::scenarios::{Scenario, ScenarioRepositoryTrait, ScenarioSummary};
use captable_core::SimulatorState;

use super::model::ScenarioDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::scenarios;

pub struct ScenarioRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl ScenarioRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        ScenarioRepository { pool }
    }

    fn validate_name(scenario_name: &str) -> Result<()> {
        if scenario_name.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Scenario name cannot be empty".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

impl ScenarioRepositoryTrait for ScenarioRepository {
    fn save_scenario(&self, scenario_name: &str, state: &SimulatorState) -> Result<Scenario> {
        Self::validate_name(scenario_name)?;
        let now = chrono::Utc::now().naive_utc();
        let row = ScenarioDB::from_state(scenario_name, state, now)?;

        let mut conn = get_connection(&self.pool)?;
        // created_at survives an overwrite; only the state and updated_at change.
        let saved = diesel::insert_into(scenarios::table)
            .values(&row)
            .on_conflict(scenarios::name)
            .do_update()
            .set((
                scenarios::state_json.eq(&row.state_json),
                scenarios::updated_at.eq(row.updated_at),
            ))
            .returning(ScenarioDB::as_returning())
            .get_result(&mut conn)
            .map_err(StorageError::from)?;

        debug!("Saved scenario '{}'", scenario_name);
        Ok(Scenario::try_from(saved)?)
    }

    fn load_scenario(&self, scenario_name: &str) -> Result<Option<Scenario>> {
        let mut conn = get_connection(&self.pool)?;
        let row = scenarios::table
            .find(scenario_name)
            .select(ScenarioDB::as_select())
            .first::<ScenarioDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        match row {
            Some(row) => Ok(Some(Scenario::try_from(row)?)),
            None => Ok(None),
        }
    }

    fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = scenarios::table
            .order(scenarios::name.asc())
            .select(ScenarioDB::as_select())
            .load::<ScenarioDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.iter()
            .map(|row| ScenarioSummary::try_from(row).map_err(Into::into))
            .collect()
    }

    fn delete_scenario(&self, scenario_name: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let deleted = diesel::delete(scenarios::table.find(scenario_name))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        debug!("Deleted {} scenario(s) named '{}'", deleted, scenario_name);
        Ok(deleted)
    }
}
