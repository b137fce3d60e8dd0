//! Gesture controller state machine

use crate::entity::{EntityId, EntityStore, HandleRegion, ResizeEdge};
use crate::error::GestureError;
use crate::math::Vec2;
use super::{calculate_resize, GestureResult, GestureState};

/// Interprets pointer events as drag/resize gestures
///
/// The controller holds no reference to the store; callers pass it in on
/// every event so the store stays owned by the orchestrator.
#[derive(Debug, Default)]
pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    /// Create an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture state
    #[inline]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Check if a gesture is in progress
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.state.is_idle()
    }

    fn ensure_idle(&self) -> Result<(), GestureError> {
        match self.state.entity() {
            Some(entity) => Err(GestureError::Busy(entity)),
            None => Ok(()),
        }
    }

    /// Start moving a card
    pub fn begin_drag(
        &mut self,
        store: &mut EntityStore,
        id: EntityId,
        pointer: Vec2,
    ) -> Result<(), GestureError> {
        self.ensure_idle()?;
        let position = store.get(id).ok_or(GestureError::UnknownEntity(id))?.position;

        store.bring_to_front(id);
        self.state = GestureState::Dragging {
            entity: id,
            offset: pointer - position,
        };
        tracing::trace!(id, "drag started");
        Ok(())
    }

    /// Start resizing a card from `edge` (south-east when omitted)
    pub fn begin_resize(
        &mut self,
        store: &mut EntityStore,
        id: EntityId,
        pointer: Vec2,
        edge: Option<ResizeEdge>,
    ) -> Result<(), GestureError> {
        self.ensure_idle()?;
        let entity = store.get(id).ok_or(GestureError::UnknownEntity(id))?;
        let (start_pos, start_size) = (entity.position, entity.size);

        store.bring_to_front(id);
        self.state = GestureState::Resizing {
            entity: id,
            edge: edge.unwrap_or_default(),
            start_pos,
            start_size,
            start_pointer: pointer,
        };
        tracing::trace!(id, "resize started");
        Ok(())
    }

    /// Start whichever gesture the region under `pointer` calls for
    ///
    /// Clicking empty canvas clears the selection and is unhandled.
    pub fn pointer_down(
        &mut self,
        store: &mut EntityStore,
        pointer: Vec2,
    ) -> Result<GestureResult, GestureError> {
        self.ensure_idle()?;
        let (id, region) = match store.region_at(pointer) {
            Some(hit) => hit,
            None => {
                store.deselect();
                return Ok(GestureResult::Unhandled);
            }
        };

        match region {
            HandleRegion::Body => self.begin_drag(store, id, pointer)?,
            HandleRegion::Resize(edge) => self.begin_resize(store, id, pointer, Some(edge))?,
        }
        store.set_selected(id);
        Ok(GestureResult::Started { entity_id: id })
    }

    /// Apply pointer movement to the active gesture
    pub fn on_pointer_move(&mut self, store: &mut EntityStore, pointer: Vec2) -> GestureResult {
        match self.state.clone() {
            GestureState::Idle => GestureResult::Unhandled,
            GestureState::Dragging { entity, offset } => {
                if !store.move_to(entity, pointer - offset) {
                    return self.drop_stale(entity);
                }
                match store.get(entity) {
                    Some(e) => GestureResult::Moved {
                        entity_id: entity,
                        position: e.position,
                    },
                    None => self.drop_stale(entity),
                }
            }
            GestureState::Resizing { entity, edge, start_pos, start_size, start_pointer } => {
                let min = match store.get(entity) {
                    Some(e) => e.kind.min_size(),
                    None => return self.drop_stale(entity),
                };
                let (position, size) = calculate_resize(edge, start_pos, start_size, min, pointer - start_pointer);
                store.set_bounds(entity, position, size);
                match store.get(entity) {
                    Some(e) => GestureResult::Resized {
                        entity_id: entity,
                        position: e.position,
                        size: e.size,
                    },
                    None => self.drop_stale(entity),
                }
            }
        }
    }

    /// Finish the active gesture; applied changes are kept
    pub fn end_gesture(&mut self, store: &EntityStore) -> GestureResult {
        let entity = match self.state.entity() {
            Some(entity) => entity,
            None => return GestureResult::Unhandled,
        };
        self.state = GestureState::Idle;
        if store.contains(entity) {
            GestureResult::Ended { entity_id: entity }
        } else {
            GestureResult::Stale
        }
    }

    /// Abandon the gesture without touching the store
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    fn drop_stale(&mut self, entity: EntityId) -> GestureResult {
        tracing::debug!(entity, "gesture target vanished, returning to idle");
        self.state = GestureState::Idle;
        GestureResult::Stale
    }
}
