use serde::{Deserialize, Serialize};

use crate::errors::{CapTableError, Result};
use crate::holders::HolderLedger;
use crate::rounds::Round;

/// Owned copy of the ledger and round sequence taken before a mutation.
///
/// Snapshots own their data outright, so later in-place edits of the live
/// rounds can never leak into them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Description of the mutation this snapshot precedes
    pub label: String,
    pub holders: HolderLedger,
    pub rounds: Vec<Round>,
}

/// LIFO stack of snapshots, optionally bounded.
///
/// When bounded, the oldest snapshot is dropped first; undo order is
/// unaffected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    snapshots: Vec<StateSnapshot>,
    #[serde(skip)]
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            snapshots: Vec::new(),
            limit,
        }
    }

    /// Deep-copies the given state onto the stack.
    pub fn snapshot(&mut self, label: &str, holders: &HolderLedger, rounds: &[Round]) {
        self.push(StateSnapshot {
            label: label.to_string(),
            holders: holders.clone(),
            rounds: rounds.to_vec(),
        });
    }

    pub fn push(&mut self, snapshot: StateSnapshot) {
        self.snapshots.push(snapshot);
        self.enforce_limit();
    }

    pub fn pop(&mut self) -> Option<StateSnapshot> {
        self.snapshots.pop()
    }

    /// Pops the most recent snapshot, or reports `EmptyHistory`.
    pub fn undo(&mut self) -> Result<StateSnapshot> {
        self.pop().ok_or_else(|| CapTableError::EmptyHistory.into())
    }

    pub fn peek(&self) -> Option<&StateSnapshot> {
        self.snapshots.last()
    }

    pub fn snapshots(&self) -> &[StateSnapshot] {
        &self.snapshots
    }

    /// Labels of the undoable mutations, oldest first.
    pub fn labels(&self) -> Vec<&str> {
        self.snapshots.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Changes the bound, dropping the oldest snapshots if needed.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            if self.snapshots.len() > limit {
                let excess = self.snapshots.len() - limit;
                self.snapshots.drain(..excess);
            }
        }
    }
}
