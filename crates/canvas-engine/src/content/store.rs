//! Content version store

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ContentError;
use super::{
    history_label, ContentPayload, ContentSlot, EditCommand, EditOutcome, HistoryEntry, SlotKey,
    VersionLane,
};

/// Per-slot store of version lanes and their histories
///
/// Every mutation validates first and then performs a single assignment, so
/// a declined call leaves the store unchanged.
#[derive(Debug, Default)]
pub struct ContentStore {
    slots: HashMap<SlotKey, ContentSlot>,
}

impl ContentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a slot, creating an empty one on first access
    pub fn slot(&mut self, key: &SlotKey) -> &ContentSlot {
        self.slots.entry(key.clone()).or_default()
    }

    /// Get a slot without creating it
    pub fn peek(&self, key: &SlotKey) -> Option<&ContentSlot> {
        self.slots.get(key)
    }

    /// Keys of every slot, sorted
    pub fn keys(&self) -> Vec<SlotKey> {
        let mut keys: Vec<SlotKey> = self.slots.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of lanes in a slot (0 if the slot does not exist)
    pub fn lane_count(&self, key: &SlotKey) -> usize {
        self.slots.get(key).map_or(0, |s| s.lanes().len())
    }

    /// Replace a lane's live payload
    ///
    /// `lane == lane_count` appends a new lane holding `payload`.
    pub fn set_base_content(
        &mut self,
        key: &SlotKey,
        lane: usize,
        payload: impl Into<Arc<ContentPayload>>,
    ) -> Result<(), ContentError> {
        let payload = payload.into();
        let slot = self.slots.entry(key.clone()).or_default();
        let len = slot.lanes().len();

        match slot.lane_mut(lane) {
            Some(existing) => existing.set_base(payload),
            None if lane == len => slot.push_lane(VersionLane::new(payload)),
            None => {
                return Err(ContentError::LaneOutOfRange {
                    slot: key.to_string(),
                    lane,
                    len,
                })
            }
        }
        Ok(())
    }

    /// Append an immutable history entry to an existing lane
    ///
    /// Returns the new entry's index. The lane's history pointer is not moved.
    pub fn append_history(
        &mut self,
        key: &SlotKey,
        lane: usize,
        payload: impl Into<Arc<ContentPayload>>,
        timestamp_ms: u64,
    ) -> Result<usize, ContentError> {
        let target = self.lane_mut(key, lane)?;
        Ok(target.push_history(HistoryEntry {
            timestamp_ms,
            label: history_label(lane, timestamp_ms),
            payload: payload.into(),
        }))
    }

    /// Choose which lane the slot displays. Pure view selection.
    pub fn select_version(&mut self, key: &SlotKey, lane: usize) -> Result<(), ContentError> {
        self.lane_mut(key, lane)?;
        if let Some(slot) = self.slots.get_mut(key) {
            slot.set_active_lane(lane);
        }
        Ok(())
    }

    /// Point a lane at one of its history entries
    pub fn select_history(&mut self, key: &SlotKey, lane: usize, index: usize) -> Result<(), ContentError> {
        let target = self.lane_mut(key, lane)?;
        let len = target.history().len();
        if target.select_history(Some(index)) {
            Ok(())
        } else {
            Err(ContentError::HistoryOutOfRange {
                slot: key.to_string(),
                lane,
                index,
                len,
            })
        }
    }

    /// Show the lane's live payload instead of a history entry
    pub fn clear_history_selection(&mut self, key: &SlotKey, lane: usize) -> Result<(), ContentError> {
        self.lane_mut(key, lane)?.select_history(None);
        Ok(())
    }

    /// Payload a lane currently displays
    ///
    /// The selected history entry when one is set, otherwise the live
    /// payload. Depends only on stored state, so repeated calls return the
    /// same `Arc`.
    pub fn resolve_displayed_payload(&self, key: &SlotKey, lane: usize) -> Option<Arc<ContentPayload>> {
        self.slots
            .get(key)
            .and_then(|slot| slot.lane(lane))
            .map(|l| Arc::clone(l.displayed()))
    }

    /// Payload displayed by the slot's active lane
    pub fn active_payload(&self, key: &SlotKey) -> Option<Arc<ContentPayload>> {
        let slot = self.slots.get(key)?;
        self.resolve_displayed_payload(key, slot.active_lane())
    }

    /// Apply a user edit to a lane
    ///
    /// With a history entry selected, the edit forks a new entry derived
    /// from it and selects that entry; past entries are never rewritten.
    /// Otherwise the live payload is replaced.
    pub fn apply_edit(
        &mut self,
        key: &SlotKey,
        lane: usize,
        command: &EditCommand,
        timestamp_ms: u64,
    ) -> Result<EditOutcome, ContentError> {
        let target = self.lane_mut(key, lane)?;
        let edited = Arc::new(command.apply(target.displayed())?);

        if target.current_history().is_some() {
            let index = target.push_history(HistoryEntry {
                timestamp_ms,
                label: history_label(lane, timestamp_ms),
                payload: edited,
            });
            target.select_history(Some(index));
            tracing::debug!(slot = %key, lane, index, "edit forked history entry");
            Ok(EditOutcome::Forked { history_index: index })
        } else {
            target.set_base(edited);
            Ok(EditOutcome::BaseReplaced)
        }
    }

    fn lane_mut(&mut self, key: &SlotKey, lane: usize) -> Result<&mut VersionLane, ContentError> {
        let out_of_range = |len| ContentError::LaneOutOfRange {
            slot: key.to_string(),
            lane,
            len,
        };
        let slot = self.slots.get_mut(key).ok_or_else(|| out_of_range(0))?;
        let len = slot.lanes().len();
        slot.lane_mut(lane).ok_or_else(|| out_of_range(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> SlotKey {
        SlotKey::channel("email")
    }

    fn payload(title: &str) -> ContentPayload {
        ContentPayload::plain(title, format!("{title} body"), "email")
    }

    fn two_lane_store() -> ContentStore {
        let mut store = ContentStore::new();
        store.set_base_content(&email(), 0, payload("v1")).unwrap();
        store.set_base_content(&email(), 1, payload("v2")).unwrap();
        store
    }

    #[test]
    fn test_slot_created_lazily() {
        let mut store = ContentStore::new();
        assert!(store.peek(&email()).is_none());
        assert!(store.slot(&email()).is_empty());
        assert!(store.peek(&email()).is_some());
    }

    #[test]
    fn test_set_base_appends_next_lane_only() {
        let mut store = two_lane_store();
        assert_eq!(store.lane_count(&email()), 2);

        let err = store.set_base_content(&email(), 5, payload("far")).unwrap_err();
        assert!(matches!(err, ContentError::LaneOutOfRange { lane: 5, len: 2, .. }));
        assert_eq!(store.lane_count(&email()), 2);
    }

    #[test]
    fn test_set_base_replaces_live_payload() {
        let mut store = two_lane_store();
        store.set_base_content(&email(), 0, payload("v1b")).unwrap();
        assert_eq!(store.resolve_displayed_payload(&email(), 0).unwrap().title, "v1b");
    }

    #[test]
    fn test_append_history_labels_and_preserves_prior() {
        let mut store = two_lane_store();
        let first = store.append_history(&email(), 1, payload("h0"), 0).unwrap();
        let prior = Arc::clone(&store.peek(&email()).unwrap().lane(1).unwrap().history()[0].payload);
        let second = store.append_history(&email(), 1, payload("h1"), 61_000).unwrap();

        let lane = store.peek(&email()).unwrap().lane(1).unwrap();
        assert_eq!((first, second), (0, 1));
        assert_eq!(lane.history()[0].label, "V2-00:00:00");
        assert_eq!(lane.history()[1].label, "V2-00:01:01");
        assert!(Arc::ptr_eq(&lane.history()[0].payload, &prior));
        assert_eq!(lane.history()[0].payload.title, "h0");
    }

    #[test]
    fn test_append_history_requires_lane() {
        let mut store = ContentStore::new();
        assert!(store.append_history(&email(), 0, payload("x"), 0).is_err());
    }

    #[test]
    fn test_declined_calls_on_unknown_slot_leave_store_empty() {
        let mut store = ContentStore::new();
        assert!(store.select_version(&email(), 0).is_err());
        assert!(store.select_history(&email(), 0, 0).is_err());
        assert!(store.clear_history_selection(&email(), 0).is_err());
        assert!(store.apply_edit(&email(), 0, &EditCommand::SetBody("x".to_string()), 0).is_err());

        assert!(store.peek(&email()).is_none());
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_select_history_resolves_entry_not_base() {
        let mut store = two_lane_store();
        store.append_history(&email(), 0, payload("old"), 0).unwrap();
        store.select_history(&email(), 0, 0).unwrap();

        assert_eq!(store.resolve_displayed_payload(&email(), 0).unwrap().title, "old");

        store.clear_history_selection(&email(), 0).unwrap();
        assert_eq!(store.resolve_displayed_payload(&email(), 0).unwrap().title, "v1");
    }

    #[test]
    fn test_select_history_out_of_range() {
        let mut store = two_lane_store();
        let err = store.select_history(&email(), 0, 3).unwrap_err();
        assert!(matches!(err, ContentError::HistoryOutOfRange { index: 3, len: 0, .. }));
        assert_eq!(store.peek(&email()).unwrap().lane(0).unwrap().current_history(), None);
    }

    #[test]
    fn test_resolution_is_pure() {
        let mut store = two_lane_store();
        store.append_history(&email(), 0, payload("h"), 0).unwrap();
        store.select_history(&email(), 0, 0).unwrap();

        let a = store.resolve_displayed_payload(&email(), 0).unwrap();
        let b = store.resolve_displayed_payload(&email(), 0).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_select_version_is_view_only() {
        let mut store = two_lane_store();
        let before = store.resolve_displayed_payload(&email(), 1).unwrap();
        store.select_version(&email(), 1).unwrap();

        assert_eq!(store.peek(&email()).unwrap().active_lane(), 1);
        assert!(Arc::ptr_eq(&store.active_payload(&email()).unwrap(), &before));
        assert!(store.select_version(&email(), 2).is_err());
        assert_eq!(store.peek(&email()).unwrap().active_lane(), 1);
    }

    #[test]
    fn test_edit_on_base_replaces_live_payload() {
        let mut store = two_lane_store();
        let outcome = store
            .apply_edit(&email(), 0, &EditCommand::SetBody("new body".to_string()), 0)
            .unwrap();

        assert_eq!(outcome, EditOutcome::BaseReplaced);
        assert_eq!(store.resolve_displayed_payload(&email(), 0).unwrap().body, "new body");
    }

    #[test]
    fn test_edit_while_viewing_history_forks() {
        let mut store = two_lane_store();
        store.append_history(&email(), 0, payload("h0"), 0).unwrap();
        store.append_history(&email(), 0, payload("h1"), 1_000).unwrap();
        store.select_history(&email(), 0, 0).unwrap();

        let outcome = store
            .apply_edit(&email(), 0, &EditCommand::SetTitle("h0 edited".to_string()), 2_000)
            .unwrap();

        let lane = store.peek(&email()).unwrap().lane(0).unwrap();
        assert_eq!(outcome, EditOutcome::Forked { history_index: 2 });
        assert_eq!(lane.history()[0].payload.title, "h0");
        assert_eq!(lane.history()[2].payload.title, "h0 edited");
        assert_eq!(lane.history()[2].payload.body, "h0 body");
        assert_eq!(lane.current_history(), Some(2));
        assert_eq!(lane.base().title, "v1");
    }

    #[test]
    fn test_invalid_edit_leaves_store_unchanged() {
        let mut store = two_lane_store();
        let before = store.resolve_displayed_payload(&email(), 0).unwrap();
        assert!(store.apply_edit(&email(), 0, &EditCommand::SetTitle(String::new()), 0).is_err());
        assert!(Arc::ptr_eq(&before, &store.resolve_displayed_payload(&email(), 0).unwrap()));
    }
}
