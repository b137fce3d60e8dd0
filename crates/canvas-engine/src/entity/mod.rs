//! Spatial entity module
//!
//! Cards placed on the canvas: identity, geometry, z-order and hit testing.

#[allow(clippy::module_inception)]
mod entity;
mod region;
mod store;

pub use entity::{EntityKind, SpatialEntity};
pub use region::{HandleRegion, ResizeEdge};
pub use store::EntityStore;

/// Unique card identifier, never reused within a session
pub type EntityId = u64;
