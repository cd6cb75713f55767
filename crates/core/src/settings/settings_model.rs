use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{Error, Result};

/// Largest display precision accepted; percentages carry more digits than this
/// would ever show.
const MAX_DISPLAY_PRECISION: u32 = 10;

/// Tunables of a simulator instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorSettings {
    /// Maximum number of undo snapshots kept. `None` keeps every snapshot.
    #[serde(default)]
    pub history_limit: Option<usize>,
    /// Decimal places used by display helpers and exports
    #[serde(default = "default_display_precision")]
    pub display_precision: u32,
}

fn default_display_precision() -> u32 {
    DISPLAY_DECIMAL_PRECISION
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            history_limit: None,
            display_precision: DISPLAY_DECIMAL_PRECISION,
        }
    }
}

impl SimulatorSettings {
    pub fn validate(&self) -> Result<()> {
        if self.history_limit == Some(0) {
            return Err(Error::InvalidConfigValue(
                "history limit must be at least 1".to_string(),
            ));
        }
        if self.display_precision > MAX_DISPLAY_PRECISION {
            return Err(Error::InvalidConfigValue(format!(
                "display precision {} exceeds {}",
                self.display_precision, MAX_DISPLAY_PRECISION
            )));
        }
        Ok(())
    }
}
