//! Version selection and user edits

use std::sync::Arc;

use crate::content::{ContentPayload, EditCommand, EditOutcome, SlotKey};
use crate::error::EngineError;
use super::CanvasEngine;

impl CanvasEngine {
    /// Show lane `lane` of a slot
    pub fn select_version(&mut self, slot: &SlotKey, lane: usize) -> Result<(), EngineError> {
        Ok(self.content.select_version(slot, lane)?)
    }

    /// Show a history entry of a lane
    pub fn select_history(&mut self, slot: &SlotKey, lane: usize, index: usize) -> Result<(), EngineError> {
        Ok(self.content.select_history(slot, lane, index)?)
    }

    /// Show a lane's live payload again
    pub fn clear_history_selection(&mut self, slot: &SlotKey, lane: usize) -> Result<(), EngineError> {
        Ok(self.content.clear_history_selection(slot, lane)?)
    }

    /// Payload displayed by one lane
    pub fn displayed_payload(&self, slot: &SlotKey, lane: usize) -> Option<Arc<ContentPayload>> {
        self.content.resolve_displayed_payload(slot, lane)
    }

    /// Apply a user edit to the lane
    pub fn apply_edit(&mut self, slot: &SlotKey, lane: usize, command: &EditCommand) -> Result<EditOutcome, EngineError> {
        let now = self.now_ms();
        let outcome = self.content.apply_edit(slot, lane, command, now)?;
        tracing::debug!(%slot, lane, ?outcome, "edit applied");
        Ok(outcome)
    }
}
