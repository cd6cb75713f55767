//! SQLite storage implementation for cap table scenarios.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `captable-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The scenario repository and its database model
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.

pub mod db;
pub mod errors;
pub mod schema;

pub mod scenarios;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use scenarios::ScenarioRepository;

// Re-export from captable-core for convenience
pub use captable_core::errors::{DatabaseError, Error, Result};

/// Opens (creating if needed) the database at `db_path`, applies pending
/// migrations and returns a scenario repository backed by it.
pub fn open_scenario_repository(db_path: &str) -> Result<ScenarioRepository> {
    let db_path = init(db_path)?;
    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    Ok(ScenarioRepository::new(pool))
}
