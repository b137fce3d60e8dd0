//! Geometry types for the canvas
//!
//! All coordinates are canvas-local: the host translates pointer events
//! before handing them to the engine.

mod vec2;
mod size;
mod rect;

pub use vec2::Vec2;
pub use size::Size;
pub use rect::Rect;
