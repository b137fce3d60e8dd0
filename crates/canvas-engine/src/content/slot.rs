//! Content slot

use serde::{Deserialize, Serialize};
use super::VersionLane;

/// All version lanes for one channel
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSlot {
    lanes: Vec<VersionLane>,
    active_lane: usize,
}

impl ContentSlot {
    /// Lanes in version order
    #[inline]
    pub fn lanes(&self) -> &[VersionLane] {
        &self.lanes
    }

    /// Lane by index
    #[inline]
    pub fn lane(&self, index: usize) -> Option<&VersionLane> {
        self.lanes.get(index)
    }

    /// Lane the user is currently viewing
    #[inline]
    pub fn active_lane(&self) -> usize {
        self.active_lane
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub(crate) fn lane_mut(&mut self, index: usize) -> Option<&mut VersionLane> {
        self.lanes.get_mut(index)
    }

    pub(crate) fn push_lane(&mut self, lane: VersionLane) {
        self.lanes.push(lane);
    }

    pub(crate) fn set_active_lane(&mut self, index: usize) {
        self.active_lane = index;
    }
}
