//! Canvas layout snapshots

use crate::content::SlotKey;
use crate::entity::EntityId;
use crate::error::EngineError;
use crate::persistence::CanvasSnapshot;
use super::CanvasEngine;

impl CanvasEngine {
    /// Export cards and bindings
    pub fn snapshot(&self) -> CanvasSnapshot {
        let mut entities: Vec<_> = self.entities.all().cloned().collect();
        entities.sort_by_key(|e| e.id);

        let mut bindings: Vec<(EntityId, SlotKey)> =
            self.bindings.iter().map(|(id, slot)| (*id, slot.clone())).collect();
        bindings.sort();

        CanvasSnapshot::new(entities, bindings)
    }

    /// Replace cards and bindings with a snapshot
    ///
    /// Any gesture in progress is abandoned. Content is left as is. A
    /// snapshot the card store declines leaves the canvas untouched.
    pub fn restore(&mut self, mut snapshot: CanvasSnapshot) -> Result<(), EngineError> {
        if snapshot.needs_migration() {
            tracing::debug!(from = snapshot.version, "migrating canvas snapshot");
            snapshot.migrate();
        }

        self.entities.restore(snapshot.entities)?;
        self.gestures.reset();
        self.bindings = snapshot
            .bindings
            .into_iter()
            .filter(|(id, _)| self.entities.contains(*id))
            .collect();
        tracing::info!(cards = self.entities.count(), bindings = self.bindings.len(), "canvas restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::error::EntityError;
    use crate::math::Vec2;

    #[test]
    fn test_snapshot_restore_keeps_layout_and_counters() {
        let mut engine = CanvasEngine::default();
        let a = engine.add_card(EntityKind::EmailCard, Some(SlotKey::channel("email")), Some(Vec2::new(10.0, 10.0)));
        let b = engine.add_card(EntityKind::SocialCard, Some(SlotKey::channel("sms")), None);
        engine.entities.bring_to_front(a);
        let snapshot = engine.snapshot();

        let mut restored = CanvasEngine::default();
        restored.restore(snapshot.clone()).unwrap();

        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.binding(b), Some(&SlotKey::channel("sms")));

        let c = restored.add_card(EntityKind::SocialCard, None, None);
        assert!(c > b);
        assert!(restored.entities().get(c).unwrap().z_order > restored.entities().get(a).unwrap().z_order);
    }

    #[test]
    fn test_restore_without_email_card_is_declined() {
        let mut engine = CanvasEngine::default();
        engine.init(0);
        let before = engine.snapshot();

        let err = engine.restore(CanvasSnapshot::new(vec![], vec![]));

        assert_eq!(err, Err(EngineError::Entity(EntityError::LastProtected(EntityKind::EmailCard))));
        assert_eq!(engine.entities().count_of(EntityKind::EmailCard), 1);
        assert_eq!(engine.snapshot(), before);
    }
}
