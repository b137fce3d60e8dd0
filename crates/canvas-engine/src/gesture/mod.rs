//! Pointer gesture module
//!
//! Turns pointer movement into drag and resize operations on the entity
//! store. One gesture at a time.

mod controller;
mod result;
mod state;

pub use controller::GestureController;
pub use result::GestureResult;
pub use state::GestureState;

use crate::entity::ResizeEdge;
use crate::math::{Size, Vec2};

/// Compute the bounds after dragging `edge` by `delta`
///
/// Dimensions never drop below `min`. When the left or top side moves, the
/// opposite side stays anchored and the origin never goes negative.
pub fn calculate_resize(
    edge: ResizeEdge,
    start_pos: Vec2,
    start_size: Size,
    min: Size,
    delta: Vec2,
) -> (Vec2, Size) {
    let (x, width) = resize_axis(
        start_pos.x,
        start_size.width,
        min.width,
        delta.x,
        edge.affects_width(),
        edge.moves_left(),
    );
    let (y, height) = resize_axis(
        start_pos.y,
        start_size.height,
        min.height,
        delta.y,
        edge.affects_height(),
        edge.moves_top(),
    );
    (Vec2::new(x, y), Size::new(width, height))
}

fn resize_axis(start: f32, extent: f32, min: f32, delta: f32, affected: bool, leading: bool) -> (f32, f32) {
    if !affected {
        return (start, extent);
    }
    if !leading {
        return (start, (extent + delta).max(min));
    }

    let far_side = start + extent;
    let extent = (extent - delta).max(min);
    let origin = far_side - extent;
    if origin < 0.0 {
        (0.0, far_side.max(min))
    } else {
        (origin, extent)
    }
}
