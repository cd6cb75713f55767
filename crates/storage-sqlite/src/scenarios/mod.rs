//! Scenario storage module.
//!
//! Persists named simulator states as JSON documents.

pub mod model;
pub mod repository;

pub use model::ScenarioDB;
pub use repository::ScenarioRepository;
