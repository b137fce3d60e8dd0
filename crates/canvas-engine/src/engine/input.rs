//! Pointer event routing

use crate::entity::{EntityId, ResizeEdge};
use crate::error::EngineError;
use crate::gesture::GestureResult;
use crate::math::Vec2;
use super::CanvasEngine;

impl CanvasEngine {
    /// Start moving a card
    pub fn begin_drag(&mut self, id: EntityId, x: f32, y: f32) -> Result<(), EngineError> {
        self.gestures.begin_drag(&mut self.entities, id, Vec2::new(x, y))?;
        self.entities.set_selected(id);
        Ok(())
    }

    /// Start resizing a card from `edge` (south-east when omitted)
    pub fn begin_resize(&mut self, id: EntityId, x: f32, y: f32, edge: Option<ResizeEdge>) -> Result<(), EngineError> {
        self.gestures.begin_resize(&mut self.entities, id, Vec2::new(x, y), edge)?;
        self.entities.set_selected(id);
        Ok(())
    }

    /// Handle pointer down at canvas-local coordinates
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Result<GestureResult, EngineError> {
        Ok(self.gestures.pointer_down(&mut self.entities, Vec2::new(x, y))?)
    }

    /// Handle pointer move
    pub fn pointer_move(&mut self, x: f32, y: f32) -> GestureResult {
        self.gestures.on_pointer_move(&mut self.entities, Vec2::new(x, y))
    }

    /// Handle pointer up
    pub fn pointer_up(&mut self) -> GestureResult {
        self.gestures.end_gesture(&self.entities)
    }

    /// Select a card, bringing it to the front
    pub fn select_card(&mut self, id: EntityId) -> bool {
        self.entities.select(id)
    }

    /// Clear the selection
    pub fn deselect(&mut self) {
        self.entities.deselect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::error::GestureError;

    #[test]
    fn test_drag_through_engine() {
        let mut engine = CanvasEngine::default();
        let id = engine.add_card(EntityKind::EmailCard, None, Some(Vec2::new(100.0, 100.0)));

        engine.begin_drag(id, 150.0, 160.0).unwrap();
        engine.pointer_move(300.0, 260.0);
        assert_eq!(engine.pointer_up(), GestureResult::Ended { entity_id: id });

        assert_eq!(engine.entities().get(id).unwrap().position, Vec2::new(250.0, 200.0));
        assert_eq!(engine.entities().selected(), Some(id));
    }

    #[test]
    fn test_gesture_start_issues_one_z_value() {
        let mut engine = CanvasEngine::default();
        let a = engine.add_card(EntityKind::EmailCard, None, None);
        let b = engine.add_card(EntityKind::SocialCard, None, None);
        let before = engine.entities().top_z();

        engine.begin_drag(a, 10.0, 10.0).unwrap();
        engine.pointer_up();
        engine.begin_resize(b, 0.0, 0.0, None).unwrap();

        assert_eq!(engine.entities().top_z(), before + 2);
        assert_eq!(engine.entities().get(b).unwrap().z_order, before + 2);
        assert_eq!(engine.entities().selected(), Some(b));
    }

    #[test]
    fn test_busy_gesture_surfaces_as_engine_error() {
        let mut engine = CanvasEngine::default();
        let a = engine.add_card(EntityKind::EmailCard, None, None);
        let b = engine.add_card(EntityKind::EmailCard, None, None);

        engine.begin_resize(a, 0.0, 0.0, None).unwrap();
        assert_eq!(
            engine.begin_drag(b, 0.0, 0.0),
            Err(EngineError::Gesture(GestureError::Busy(a)))
        );
    }

    #[test]
    fn test_pointer_removed_card_mid_drag() {
        let mut engine = CanvasEngine::default();
        let _keep = engine.add_card(EntityKind::EmailCard, None, None);
        let id = engine.add_card(EntityKind::SocialCard, None, Some(Vec2::new(600.0, 600.0)));

        engine.pointer_down(700.0, 700.0).unwrap();
        engine.remove_card(id).unwrap();

        assert_eq!(engine.pointer_move(10.0, 10.0), GestureResult::Stale);
        assert_eq!(engine.pointer_up(), GestureResult::Unhandled);
        assert!(!engine.gestures().is_active());
    }
}
