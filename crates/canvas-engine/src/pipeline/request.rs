//! Generation requests

use serde::{Deserialize, Serialize};

use crate::content::{ChannelId, SlotKey};

/// File attached to a request; only its metadata is kept
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
}

/// Input of one generation run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub input_text: String,
    /// Channels to generate for; empty means the default slot
    #[serde(default)]
    pub target_channels: Vec<ChannelId>,
    #[serde(default)]
    pub attached_files: Vec<Attachment>,
    #[serde(default)]
    pub is_revision: bool,
}

impl GenerationRequest {
    /// First-time generation
    pub fn new(input_text: impl Into<String>, target_channels: Vec<ChannelId>) -> Self {
        Self {
            input_text: input_text.into(),
            target_channels,
            attached_files: Vec::new(),
            is_revision: false,
        }
    }

    /// Revision of previously generated content
    pub fn revision(input_text: impl Into<String>, target_channels: Vec<ChannelId>) -> Self {
        Self {
            is_revision: true,
            ..Self::new(input_text, target_channels)
        }
    }

    pub fn with_attachments(mut self, attached_files: Vec<Attachment>) -> Self {
        self.attached_files = attached_files;
        self
    }

    /// Slots this request writes, in request order without duplicates
    pub fn slots(&self) -> Vec<SlotKey> {
        let mut slots: Vec<SlotKey> = Vec::with_capacity(self.target_channels.len().max(1));
        for channel in &self.target_channels {
            let key = SlotKey::channel(channel.as_str());
            if !slots.contains(&key) {
                slots.push(key);
            }
        }
        if slots.is_empty() {
            slots.push(SlotKey::Default);
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_channels_targets_default_slot() {
        let request = GenerationRequest::new("launch", vec![]);
        assert_eq!(request.slots(), vec![SlotKey::Default]);
        assert!(!request.is_revision);
    }

    #[test]
    fn test_slots_dedupe_in_order() {
        let request = GenerationRequest::revision(
            "shorter",
            vec!["sms".to_string(), "email".to_string(), "sms".to_string()],
        );
        assert_eq!(request.slots(), vec![SlotKey::channel("sms"), SlotKey::channel("email")]);
        assert!(request.is_revision);
    }
}
