//! Gesture state machine states

use crate::entity::{EntityId, ResizeEdge};
use crate::math::{Size, Vec2};

/// Current gesture
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GestureState {
    /// No gesture in progress
    #[default]
    Idle,
    /// Moving a card
    Dragging {
        /// Card being moved
        entity: EntityId,
        /// Pointer position minus card origin at gesture start
        offset: Vec2,
    },
    /// Resizing a card
    Resizing {
        /// Card being resized
        entity: EntityId,
        /// Which handle was grabbed
        edge: ResizeEdge,
        /// Card origin at gesture start
        start_pos: Vec2,
        /// Card size at gesture start
        start_size: Size,
        /// Pointer position at gesture start
        start_pointer: Vec2,
    },
}

impl GestureState {
    /// Check if no gesture is active
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Check if this is a drag
    #[inline]
    pub fn is_drag(&self) -> bool {
        matches!(self, GestureState::Dragging { .. })
    }

    /// Check if this is a resize
    #[inline]
    pub fn is_resize(&self) -> bool {
        matches!(self, GestureState::Resizing { .. })
    }

    /// Card bound to the active gesture
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging { entity, .. } | GestureState::Resizing { entity, .. } => Some(*entity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_has_no_entity() {
        let state = GestureState::default();
        assert!(state.is_idle());
        assert!(state.entity().is_none());
    }

    #[test]
    fn test_resize_state_accessors() {
        let state = GestureState::Resizing {
            entity: 9,
            edge: ResizeEdge::South,
            start_pos: Vec2::new(0.0, 0.0),
            start_size: Size::new(300.0, 200.0),
            start_pointer: Vec2::new(150.0, 200.0),
        };
        assert!(state.is_resize());
        assert!(!state.is_drag());
        assert_eq!(state.entity(), Some(9));
    }
}
