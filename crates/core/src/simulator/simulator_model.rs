//! Serializable simulator state handed to persistence collaborators.

use serde::{Deserialize, Serialize};

use crate::history::History;
use crate::holders::HolderLedger;
use crate::rounds::Round;
use crate::settings::SimulatorSettings;

/// Full internal state of a simulator as a plain structured value.
///
/// The cap table itself is not part of the state: it is derived and gets
/// recomputed on restore.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorState {
    #[serde(default)]
    pub settings: SimulatorSettings,
    pub holders: HolderLedger,
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub history: History,
}
