//! History manager - value snapshots of the simulator state for undo.

mod history_model;

pub use history_model::{History, StateSnapshot};
