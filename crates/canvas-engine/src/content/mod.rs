//! Versioned content module
//!
//! Content is organized as slots (one per channel) holding parallel version
//! lanes (V1, V2, ...), each with an append-only history of immutable
//! payload snapshots.

mod edit;
mod lane;
mod payload;
mod slot;
mod store;

pub use edit::{EditCommand, EditOutcome};
pub use lane::{HistoryEntry, VersionLane};
pub use payload::ContentPayload;
pub use slot::ContentSlot;
pub use store::ContentStore;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Channel identifier, e.g. `"email"` or `"linkedin"`
pub type ChannelId = String;

/// Key of a content slot
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "id")]
pub enum SlotKey {
    /// Content for a specific channel
    Channel(ChannelId),
    /// Content generated with no channel selected
    Default,
}

impl SlotKey {
    /// Slot for a channel
    pub fn channel(id: impl Into<ChannelId>) -> Self {
        SlotKey::Channel(id.into())
    }

    /// Channel id, if this is a channel slot
    pub fn channel_id(&self) -> Option<&str> {
        match self {
            SlotKey::Channel(id) => Some(id),
            SlotKey::Default => None,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKey::Channel(id) => f.write_str(id),
            SlotKey::Default => f.write_str("default"),
        }
    }
}

/// One lane of one slot; displays as `{slot}-{lane}`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentKey {
    pub slot: SlotKey,
    pub lane: usize,
}

impl ContentKey {
    pub fn new(slot: SlotKey, lane: usize) -> Self {
        Self { slot, lane }
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.slot, self.lane)
    }
}

/// Format a history label such as `V2-14:03:09`
pub fn history_label(lane: usize, timestamp_ms: u64) -> String {
    let time = i64::try_from(timestamp_ms)
        .ok()
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    format!("V{}-{}", lane + 1, time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(ContentKey::new(SlotKey::channel("email"), 1).to_string(), "email-1");
        assert_eq!(ContentKey::new(SlotKey::Default, 0).to_string(), "default-0");
    }

    #[test]
    fn test_history_label() {
        // 1970-01-01T01:02:03Z
        assert_eq!(history_label(0, 3_723_000), "V1-01:02:03");
        assert_eq!(history_label(1, 0), "V2-00:00:00");
    }

    #[test]
    fn test_slot_key_serde() {
        let json = serde_json::to_string(&SlotKey::channel("sms")).unwrap();
        assert_eq!(json, r#"{"type":"channel","id":"sms"}"#);
        let back: SlotKey = serde_json::from_str(r#"{"type":"default"}"#).unwrap();
        assert_eq!(back, SlotKey::Default);
    }
}
