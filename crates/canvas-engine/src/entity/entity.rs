//! Card struct and kinds

use serde::{Deserialize, Serialize};
use crate::math::{Rect, Size, Vec2};
use super::EntityId;

/// Kind of card; selects default geometry and which content it shows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// Single-channel email card
    EmailCard,
    /// Single-channel social post card
    SocialCard,
    /// Container showing several channels side by side
    ChannelGroup,
}

impl EntityKind {
    /// Size given to a freshly created card
    pub fn default_size(self) -> Size {
        match self {
            EntityKind::EmailCard => Size::new(360.0, 480.0),
            EntityKind::SocialCard => Size::new(320.0, 400.0),
            EntityKind::ChannelGroup => Size::new(720.0, 520.0),
        }
    }

    /// Smallest size a gesture or autosize may produce
    pub fn min_size(self) -> Size {
        match self {
            EntityKind::EmailCard => Size::new(280.0, 200.0),
            EntityKind::SocialCard => Size::new(240.0, 180.0),
            EntityKind::ChannelGroup => Size::new(480.0, 320.0),
        }
    }

    /// Label used for new cards
    pub fn default_title(self) -> &'static str {
        match self {
            EntityKind::EmailCard => "Email",
            EntityKind::SocialCard => "Social post",
            EntityKind::ChannelGroup => "Channels",
        }
    }
}

/// A card on the canvas
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub title: String,
    /// Top-left corner, never negative
    pub position: Vec2,
    /// Never smaller than `kind.min_size()`
    pub size: Size,
    /// Higher = on top
    pub z_order: u32,
}

impl SpatialEntity {
    /// Bounding rectangle
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }
}
