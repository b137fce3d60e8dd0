//! Snapshot serialization for canvas layout

use serde::{Deserialize, Serialize};

use crate::content::SlotKey;
use crate::entity::{EntityId, SpatialEntity};
use crate::error::StoreError;

/// Snapshot of the canvas layout for persistence
///
/// Content is not part of the snapshot; it is regenerated or restored from
/// the session history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    /// Version for migration support
    pub version: u32,
    /// Cards on the canvas
    pub entities: Vec<SpatialEntity>,
    /// Which slot each card displays
    #[serde(default)]
    pub bindings: Vec<(EntityId, SlotKey)>,
}

impl CanvasSnapshot {
    /// Current snapshot version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new snapshot
    pub fn new(entities: Vec<SpatialEntity>, bindings: Vec<(EntityId, SlotKey)>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entities,
            bindings,
        }
    }

    /// Check if snapshot needs migration
    pub fn needs_migration(&self) -> bool {
        self.version < Self::CURRENT_VERSION
    }

    /// Migrate snapshot to current version
    ///
    /// Version 0 snapshots predate the binding table; bindings that point
    /// at cards missing from the snapshot are dropped.
    pub fn migrate(&mut self) {
        let entities = &self.entities;
        self.bindings.retain(|(id, _)| entities.iter().any(|e| e.id == *id));
        self.version = Self::CURRENT_VERSION;
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot, migrating older versions
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        let mut snapshot: CanvasSnapshot = serde_json::from_str(text)?;
        if snapshot.needs_migration() {
            snapshot.migrate();
        }
        Ok(snapshot)
    }
}
