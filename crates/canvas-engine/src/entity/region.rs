//! Card regions for hit testing

use serde::{Deserialize, Serialize};

/// Edge or corner grabbed by a resize gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "w")]
    West,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "nw")]
    NorthWest,
    #[default]
    #[serde(rename = "se")]
    SouthEast,
    #[serde(rename = "sw")]
    SouthWest,
}

impl ResizeEdge {
    /// Parse the short direction names used by the host ("n", "se", ...)
    pub fn from_direction(direction: &str) -> Option<Self> {
        Some(match direction {
            "n" => ResizeEdge::North,
            "s" => ResizeEdge::South,
            "e" => ResizeEdge::East,
            "w" => ResizeEdge::West,
            "ne" => ResizeEdge::NorthEast,
            "nw" => ResizeEdge::NorthWest,
            "se" => ResizeEdge::SouthEast,
            "sw" => ResizeEdge::SouthWest,
            _ => return None,
        })
    }

    /// Whether dragging this edge moves the left side
    #[inline]
    pub fn moves_left(self) -> bool {
        matches!(self, ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest)
    }

    /// Whether dragging this edge moves the top side
    #[inline]
    pub fn moves_top(self) -> bool {
        matches!(self, ResizeEdge::North | ResizeEdge::NorthEast | ResizeEdge::NorthWest)
    }

    /// Whether this edge changes the width at all
    #[inline]
    pub fn affects_width(self) -> bool {
        !matches!(self, ResizeEdge::North | ResizeEdge::South)
    }

    /// Whether this edge changes the height at all
    #[inline]
    pub fn affects_height(self) -> bool {
        !matches!(self, ResizeEdge::East | ResizeEdge::West)
    }
}

/// Part of a card under the pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleRegion {
    /// Anywhere that starts a drag
    Body,
    /// A resize handle
    Resize(ResizeEdge),
}
