//! Entity store for card lifecycle, selection, and z-order

use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::error::EntityError;
use crate::math::{Rect, Size, Vec2};
use super::{EntityId, EntityKind, HandleRegion, ResizeEdge, SpatialEntity};

/// Corner handle size in canvas pixels
const CORNER_HANDLE: f32 = 14.0;
/// Edge handle thickness in canvas pixels
const EDGE_HANDLE: f32 = 6.0;

/// Store owning every card on the canvas
///
/// Geometry invariants are enforced here rather than by callers: positions
/// are clamped to the positive quadrant and sizes to the kind minimum.
/// Overlap between cards is allowed.
pub struct EntityStore {
    /// All cards by ID
    entities: HashMap<EntityId, SpatialEntity>,
    /// Currently selected card
    selected: Option<EntityId>,
    /// Next card ID
    next_id: EntityId,
    /// Next z-order value
    next_z: u32,
    /// Kinds that must keep at least one card
    protected: Vec<EntityKind>,
    /// Tiling used for cards created without a position hint
    layout: LayoutConfig,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), vec![EntityKind::EmailCard])
    }
}

impl EntityStore {
    /// Create an empty store
    pub fn new(layout: LayoutConfig, protected: Vec<EntityKind>) -> Self {
        Self {
            entities: HashMap::new(),
            selected: None,
            next_id: 1,
            next_z: 1,
            protected,
            layout,
        }
    }

    /// Create a card of `kind`, at `hint` if given or in the first free tile
    pub fn create(&mut self, kind: EntityKind, hint: Option<Vec2>) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;

        let size = kind.default_size();
        let position = match hint {
            Some(pos) if pos.is_finite() => pos.clamp_non_negative(),
            _ => self.free_tile(size),
        };

        let z_order = self.issue_z();
        self.entities.insert(
            id,
            SpatialEntity {
                id,
                kind,
                title: kind.default_title().to_string(),
                position,
                size,
                z_order,
            },
        );
        tracing::debug!(id, ?kind, x = position.x, y = position.y, z_order, "card created");
        id
    }

    /// Find the first tile of the row/column grid not overlapping any card
    fn free_tile(&self, size: Size) -> Vec2 {
        let columns = self.layout.columns.max(1);
        let tile = |index: u32| {
            let col = (index % columns) as f32;
            let row = (index / columns) as f32;
            Vec2::new(
                self.layout.origin.x + col * (size.width + self.layout.gap),
                self.layout.origin.y + row * (size.height + self.layout.gap),
            )
        };

        (0..self.layout.max_tiles)
            .map(tile)
            .find(|pos| {
                let candidate = Rect::from_pos_size(*pos, size);
                !self.entities.values().any(|e| e.rect().intersects(&candidate))
            })
            .unwrap_or_else(|| tile(self.layout.max_tiles))
            .clamp_non_negative()
    }

    fn issue_z(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Remove a card
    ///
    /// Declined when it is the last card of a protected kind; the store is
    /// unchanged in that case.
    pub fn remove(&mut self, id: EntityId) -> Result<SpatialEntity, EntityError> {
        let kind = self.entities.get(&id).ok_or(EntityError::NotFound(id))?.kind;
        if self.protected.contains(&kind) && self.count_of(kind) <= 1 {
            tracing::debug!(id, ?kind, "refusing to remove last protected card");
            return Err(EntityError::LastProtected(kind));
        }

        let removed = self.entities.remove(&id).ok_or(EntityError::NotFound(id))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        tracing::debug!(id, "card removed");
        Ok(removed)
    }

    /// Get a card by ID
    pub fn get(&self, id: EntityId) -> Option<&SpatialEntity> {
        self.entities.get(&id)
    }

    /// Check whether a card exists
    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Move a card; coordinates are clamped to be non-negative
    pub fn move_to(&mut self, id: EntityId, position: Vec2) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) if position.is_finite() => {
                entity.position = position.clamp_non_negative();
                true
            }
            _ => false,
        }
    }

    /// Resize a card; dimensions are clamped to the kind minimum
    pub fn resize(&mut self, id: EntityId, size: Size) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) if size.as_vec2().is_finite() => {
                entity.size = size.at_least(entity.kind.min_size());
                true
            }
            _ => false,
        }
    }

    /// Set both position and size in one assignment
    pub(crate) fn set_bounds(&mut self, id: EntityId, position: Vec2, size: Size) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) if position.is_finite() && size.as_vec2().is_finite() => {
                entity.position = position.clamp_non_negative();
                entity.size = size.at_least(entity.kind.min_size());
                true
            }
            _ => false,
        }
    }

    /// Rename a card
    pub fn set_title(&mut self, id: EntityId, title: &str) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.title = title.to_string();
                true
            }
            None => false,
        }
    }

    /// Raise a card above all others, returning its new z-order
    pub fn bring_to_front(&mut self, id: EntityId) -> Option<u32> {
        if !self.entities.contains_key(&id) {
            return None;
        }
        let z = self.issue_z();
        let entity = self.entities.get_mut(&id)?;
        entity.z_order = z;
        Some(z)
    }

    /// Select a card (brings it to front)
    pub fn select(&mut self, id: EntityId) -> bool {
        if self.bring_to_front(id).is_some() {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    /// Mark a card selected without touching its z-order
    pub(crate) fn set_selected(&mut self, id: EntityId) -> bool {
        if !self.entities.contains_key(&id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Clear the selection
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Currently selected card
    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// Cards sorted by z-order (back to front)
    pub fn entities_by_z(&self) -> Vec<&SpatialEntity> {
        let mut entities: Vec<&SpatialEntity> = self.entities.values().collect();
        entities.sort_by_key(|e| e.z_order);
        entities
    }

    /// All cards, unordered
    pub fn all(&self) -> impl Iterator<Item = &SpatialEntity> {
        self.entities.values()
    }

    /// Topmost card containing `pos`
    pub fn entity_at(&self, pos: Vec2) -> Option<EntityId> {
        self.entities
            .values()
            .filter(|e| e.rect().contains(pos))
            .max_by_key(|e| e.z_order)
            .map(|e| e.id)
    }

    /// Topmost card under `pos` and which of its regions was hit
    pub fn region_at(&self, pos: Vec2) -> Option<(EntityId, HandleRegion)> {
        let id = self.entity_at(pos)?;
        let rect = self.entities.get(&id)?.rect();
        Some((id, hit_test_handles(&rect, pos)))
    }

    /// Number of cards
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    /// Number of cards of a kind
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }

    /// Highest z-order issued so far (0 if none)
    pub fn top_z(&self) -> u32 {
        self.next_z - 1
    }

    /// Replace the store contents with restored cards
    ///
    /// Declined, with the store unchanged, when the cards would leave a
    /// protected kind empty or carry an id or z-order at the top of its
    /// range. Counters resume past the highest restored id and z-order so
    /// issued values keep increasing.
    pub fn restore(&mut self, entities: Vec<SpatialEntity>) -> Result<(), EntityError> {
        if let Some(&kind) = self
            .protected
            .iter()
            .find(|kind| !entities.iter().any(|e| e.kind == **kind))
        {
            tracing::debug!(?kind, "refusing restore without a protected card");
            return Err(EntityError::LastProtected(kind));
        }
        if let Some(entity) = entities
            .iter()
            .find(|e| e.id == EntityId::MAX || e.z_order == u32::MAX)
        {
            return Err(EntityError::CounterExhausted(entity.id));
        }

        self.entities.clear();
        self.selected = None;
        let mut max_id = 0;
        let mut max_z = 0;
        for mut entity in entities {
            entity.position = entity.position.clamp_non_negative();
            entity.size = entity.size.at_least(entity.kind.min_size());
            max_id = max_id.max(entity.id);
            max_z = max_z.max(entity.z_order);
            self.entities.insert(entity.id, entity);
        }
        self.next_id = self.next_id.max(max_id.saturating_add(1));
        self.next_z = self.next_z.max(max_z.saturating_add(1));
        Ok(())
    }
}

// =============================================================================
// Hit testing helper functions
// =============================================================================

/// Classify a point already known to be inside `rect`
fn hit_test_handles(rect: &Rect, pos: Vec2) -> HandleRegion {
    let near = |handle: f32| {
        (
            pos.x < rect.x + handle,
            pos.x >= rect.right() - handle,
            pos.y < rect.y + handle,
            pos.y >= rect.bottom() - handle,
        )
    };

    let (left, right, top, bottom) = near(CORNER_HANDLE);
    let corner = match (left, right, top, bottom) {
        (true, _, true, _) => Some(ResizeEdge::NorthWest),
        (_, true, true, _) => Some(ResizeEdge::NorthEast),
        (true, _, _, true) => Some(ResizeEdge::SouthWest),
        (_, true, _, true) => Some(ResizeEdge::SouthEast),
        _ => None,
    };
    if let Some(edge) = corner {
        return HandleRegion::Resize(edge);
    }

    let (left, right, top, bottom) = near(EDGE_HANDLE);
    if top {
        HandleRegion::Resize(ResizeEdge::North)
    } else if bottom {
        HandleRegion::Resize(ResizeEdge::South)
    } else if left {
        HandleRegion::Resize(ResizeEdge::West)
    } else if right {
        HandleRegion::Resize(ResizeEdge::East)
    } else {
        HandleRegion::Body
    }
}
