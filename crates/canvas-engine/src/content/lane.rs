//! Version lanes and their history

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use super::ContentPayload;

/// Immutable snapshot of a lane's payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp_ms: u64,
    /// Human version tag, e.g. `V1-14:03:09`
    pub label: String,
    pub payload: Arc<ContentPayload>,
}

/// One alternative version (V1, V2, ...) of a slot's content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionLane {
    base: Arc<ContentPayload>,
    history: Vec<HistoryEntry>,
    current_history: Option<usize>,
}

impl VersionLane {
    /// Create a lane with a live payload and no history
    pub fn new(base: Arc<ContentPayload>) -> Self {
        Self {
            base,
            history: Vec::new(),
            current_history: None,
        }
    }

    /// Live payload, shown when no history entry is selected
    #[inline]
    pub fn base(&self) -> &Arc<ContentPayload> {
        &self.base
    }

    /// History entries, oldest first
    #[inline]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Selected history entry, if any
    #[inline]
    pub fn current_history(&self) -> Option<usize> {
        self.current_history
    }

    pub(crate) fn set_base(&mut self, payload: Arc<ContentPayload>) {
        self.base = payload;
    }

    /// Append an entry and return its index. Earlier entries are untouched.
    pub(crate) fn push_history(&mut self, entry: HistoryEntry) -> usize {
        self.history.push(entry);
        self.history.len() - 1
    }

    /// Point at a history entry; `false` if the index is out of range
    pub(crate) fn select_history(&mut self, index: Option<usize>) -> bool {
        match index {
            Some(i) if i >= self.history.len() => false,
            _ => {
                self.current_history = index;
                true
            }
        }
    }

    /// Payload to display: selected history entry, else the base
    pub fn displayed(&self) -> &Arc<ContentPayload> {
        self.current_history
            .and_then(|i| self.history.get(i))
            .map(|entry| &entry.payload)
            .unwrap_or(&self.base)
    }
}
