//! Option pool dilution engine.

mod dilution_calculator;

pub use dilution_calculator::{apply_pool_dilution, diluted_percentage, validate_pool_percentage};
