//! Gesture result type

use serde::Serialize;
use crate::entity::EntityId;
use crate::math::{Size, Vec2};

/// Outcome of feeding a pointer event to the controller
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GestureResult {
    /// Event was not consumed
    Unhandled,
    /// A gesture started on this card
    Started {
        entity_id: EntityId,
    },
    /// Card was moved
    Moved {
        entity_id: EntityId,
        position: Vec2,
    },
    /// Card was resized (origin may move for north/west edges)
    Resized {
        entity_id: EntityId,
        position: Vec2,
        size: Size,
    },
    /// Gesture finished normally
    Ended {
        entity_id: EntityId,
    },
    /// The card vanished mid-gesture; controller returned to idle
    Stale,
}

impl GestureResult {
    /// Check if the host should treat the event as consumed
    #[inline]
    pub fn is_handled(&self) -> bool {
        !matches!(self, GestureResult::Unhandled | GestureResult::Stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handled_flags() {
        assert!(!GestureResult::Unhandled.is_handled());
        assert!(!GestureResult::Stale.is_handled());
        assert!(GestureResult::Ended { entity_id: 1 }.is_handled());
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let json = serde_json::to_value(GestureResult::Moved {
            entity_id: 3,
            position: Vec2::new(1.0, 2.0),
        })
        .unwrap();
        assert_eq!(json["type"], "moved");
        assert_eq!(json["entity_id"], 3);
        assert_eq!(json["position"]["x"], 1.0);
    }
}
