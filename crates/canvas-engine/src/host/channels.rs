//! Channel registry

use serde::{Deserialize, Serialize};
use crate::content::ChannelId;

/// A selectable destination channel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
}

/// Ordered list of channels the user can target
pub trait ChannelRegistry {
    fn channels(&self) -> Vec<Channel>;

    /// Whether `id` is a known channel
    fn contains(&self, id: &str) -> bool {
        self.channels().iter().any(|c| c.id == id)
    }
}

/// Fixed channel list
#[derive(Clone, Debug)]
pub struct StaticChannels {
    channels: Vec<Channel>,
}

impl StaticChannels {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self { channels }
    }
}

impl Default for StaticChannels {
    fn default() -> Self {
        let channel = |id: &str, name: &str| Channel {
            id: id.to_string(),
            name: name.to_string(),
        };
        Self::new(vec![
            channel("email", "Email"),
            channel("sms", "SMS"),
            channel("linkedin", "LinkedIn"),
            channel("twitter", "X / Twitter"),
            channel("facebook", "Facebook"),
            channel("instagram", "Instagram"),
            channel("whatsapp", "WhatsApp"),
        ])
    }
}

impl ChannelRegistry for StaticChannels {
    fn channels(&self) -> Vec<Channel> {
        self.channels.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order_starts_with_email() {
        let registry = StaticChannels::default();
        assert_eq!(registry.channels()[0].id, "email");
        assert!(registry.contains("whatsapp"));
        assert!(!registry.contains("fax"));
    }
}
