//! Cap table simulator - the state struct implementing every engine operation.

mod simulator_model;
mod simulator_service;
mod simulator_traits;

pub use simulator_model::SimulatorState;
pub use simulator_service::CapTableSimulator;
pub use simulator_traits::CapTableServiceTrait;
