//! Cap table core - round modeling and dilution engine.
//!
//! This crate models how startup ownership evolves across SAFEs,
//! convertible notes, priced equity rounds and option pool top-ups.
//! It is storage-agnostic and defines the `ScenarioRepositoryTrait`
//! implemented by the `storage-sqlite` crate.

pub mod cap_table;
pub mod constants;
pub mod dilution;
pub mod errors;
pub mod export;
pub mod history;
pub mod holders;
pub mod rounds;
pub mod scenarios;
pub mod settings;
pub mod simulator;
pub mod utils;

// Re-export the engine entry points
pub use cap_table::{CapTable, CapTableEntry};
pub use simulator::{CapTableServiceTrait, CapTableSimulator, SimulatorState};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
