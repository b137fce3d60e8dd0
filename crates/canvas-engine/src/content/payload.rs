//! Content payload

use serde::{Deserialize, Serialize};
use super::ChannelId;

/// Generated or edited content shown by a card
///
/// Payloads are shared behind `Arc` once stored and never mutated; edits
/// build a new payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub title: String,
    /// Email subject line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Plain text or markup, depending on `is_rich_format`
    pub body: String,
    pub channels: Vec<ChannelId>,
    pub is_rich_format: bool,
}

impl ContentPayload {
    /// Plain-text payload for one channel
    pub fn plain(title: impl Into<String>, body: impl Into<String>, channel: impl Into<ChannelId>) -> Self {
        Self {
            title: title.into(),
            subject: None,
            body: body.into(),
            channels: vec![channel.into()],
            is_rich_format: false,
        }
    }

    /// Rich-format payload for one channel
    pub fn rich(title: impl Into<String>, body: impl Into<String>, channel: impl Into<ChannelId>) -> Self {
        Self {
            is_rich_format: true,
            ..Self::plain(title, body, channel)
        }
    }

    /// Builder-style subject line
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Lines revealed one at a time while streaming
    pub fn body_lines(&self) -> Vec<&str> {
        self.body.lines().collect()
    }
}
