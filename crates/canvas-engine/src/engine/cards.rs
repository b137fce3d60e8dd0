//! Card lifecycle and slot bindings

use std::sync::Arc;

use serde::Serialize;

use crate::content::{ContentKey, ContentPayload, SlotKey};
use crate::entity::{EntityId, EntityKind, SpatialEntity};
use crate::error::{EngineError, EntityError};
use crate::math::Vec2;
use crate::pipeline::RevealView;
use super::CanvasEngine;

/// Everything a host needs to draw one card
#[derive(Clone, Debug, Serialize)]
pub struct CardView {
    pub entity: SpatialEntity,
    pub slot: Option<SlotKey>,
    /// Lane the card shows (the slot's active lane)
    pub lane: usize,
    /// Partially revealed text while streaming
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<String>,
    /// Payload once fully revealed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Arc<ContentPayload>>,
}

impl CanvasEngine {
    /// Create a card, optionally bound to a slot
    pub fn add_card(&mut self, kind: EntityKind, slot: Option<SlotKey>, hint: Option<Vec2>) -> EntityId {
        let id = self.entities.create(kind, hint);
        if let Some(slot) = slot {
            self.bindings.insert(id, slot);
        }
        id
    }

    /// Delete a card and its binding
    pub fn remove_card(&mut self, id: EntityId) -> Result<SpatialEntity, EngineError> {
        let removed = self.entities.remove(id)?;
        self.bindings.remove(&id);
        Ok(removed)
    }

    /// Point a card at a slot, replacing any previous binding
    pub fn bind(&mut self, id: EntityId, slot: SlotKey) -> Result<(), EngineError> {
        if !self.entities.contains(id) {
            return Err(EntityError::NotFound(id).into());
        }
        tracing::debug!(id, %slot, "card bound");
        self.bindings.insert(id, slot);
        Ok(())
    }

    /// Remove a card's binding, returning the slot it showed
    pub fn unbind(&mut self, id: EntityId) -> Option<SlotKey> {
        self.bindings.remove(&id)
    }

    /// Slot a card displays
    pub fn binding(&self, id: EntityId) -> Option<&SlotKey> {
        self.bindings.get(&id)
    }

    /// Cards bound to `slot`, by id
    pub fn cards_for(&self, slot: &SlotKey) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .bindings
            .iter()
            .filter(|(_, bound)| *bound == slot)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn set_card_title(&mut self, id: EntityId, title: &str) -> bool {
        self.entities.set_title(id, title)
    }

    /// What a card currently shows
    ///
    /// A stream in progress on the card's active lane wins; otherwise the
    /// lane's displayed payload (history entry or base).
    pub fn card_view(&self, id: EntityId) -> Option<CardView> {
        let entity = self.entities.get(id)?.clone();
        let slot = self.bindings.get(&id).cloned();

        let mut view = CardView {
            entity,
            slot: slot.clone(),
            lane: 0,
            streaming: None,
            payload: None,
        };
        let slot = match slot {
            Some(slot) => slot,
            None => return Some(view),
        };

        view.lane = self.content.peek(&slot).map_or(0, |s| s.active_lane());
        let key = ContentKey::new(slot, view.lane);
        match self.pipeline.reveal_view(&key) {
            RevealView::Partial { text, .. } => view.streaming = Some(text),
            _ => view.payload = self.content.resolve_displayed_payload(&key.slot, key.lane),
        }
        Some(view)
    }

    /// Views of every card, bottom to top
    pub fn card_views(&self) -> Vec<CardView> {
        self.entities
            .entities_by_z()
            .into_iter()
            .filter_map(|e| self.card_view(e.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentPayload;

    #[test]
    fn test_remove_clears_binding() {
        let mut engine = CanvasEngine::default();
        let a = engine.add_card(EntityKind::SocialCard, Some(SlotKey::channel("sms")), None);

        engine.remove_card(a).unwrap();
        assert_eq!(engine.binding(a), None);
        assert!(engine.cards_for(&SlotKey::channel("sms")).is_empty());
    }

    #[test]
    fn test_bind_unknown_card() {
        let mut engine = CanvasEngine::default();
        assert_eq!(
            engine.bind(99, SlotKey::Default),
            Err(EngineError::Entity(EntityError::NotFound(99)))
        );
    }

    #[test]
    fn test_cards_for_slot() {
        let mut engine = CanvasEngine::default();
        let a = engine.add_card(EntityKind::SocialCard, Some(SlotKey::channel("sms")), None);
        let b = engine.add_card(EntityKind::SocialCard, None, None);
        engine.bind(b, SlotKey::channel("sms")).unwrap();

        assert_eq!(engine.cards_for(&SlotKey::channel("sms")), vec![a, b]);
        assert_eq!(engine.unbind(a), Some(SlotKey::channel("sms")));
        assert_eq!(engine.cards_for(&SlotKey::channel("sms")), vec![b]);
    }

    #[test]
    fn test_card_view_shows_displayed_payload() {
        let mut engine = CanvasEngine::default();
        let id = engine.add_card(EntityKind::SocialCard, Some(SlotKey::channel("sms")), None);
        assert!(engine.card_view(id).unwrap().payload.is_none());

        engine
            .content
            .set_base_content(&SlotKey::channel("sms"), 0, ContentPayload::plain("SMS", "Hi", "sms"))
            .unwrap();
        let view = engine.card_view(id).unwrap();
        assert_eq!(view.payload.unwrap().body, "Hi");
        assert_eq!(view.lane, 0);
        assert!(view.streaming.is_none());
    }
}
