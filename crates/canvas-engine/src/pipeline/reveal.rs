//! Incremental reveal of streamed payloads

use std::collections::HashSet;
use std::sync::Arc;

use crate::content::{ContentKey, ContentPayload};

/// What a card should show for one content key
#[derive(Clone, Debug, PartialEq)]
pub enum RevealView {
    /// Nothing generated yet
    Hidden,
    /// Streaming in progress; `text` holds the first `shown` lines
    Partial { text: String, shown: usize, total: usize },
    /// Fully revealed
    Complete(Arc<ContentPayload>),
}

/// Line-by-line progress of one payload
#[derive(Clone, Debug)]
pub struct StreamProgress {
    pub payload: Arc<ContentPayload>,
    /// Sequence number of the payload within the pipeline
    pub seq: u64,
    pub shown: usize,
    pub total: usize,
}

impl StreamProgress {
    pub fn new(payload: Arc<ContentPayload>, seq: u64) -> Self {
        let total = payload.body_lines().len();
        Self { payload, seq, shown: 0, total }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.shown >= self.total
    }

    /// Reveal one more line; returns the new count
    pub fn advance(&mut self) -> usize {
        self.shown = (self.shown + 1).min(self.total);
        self.shown
    }

    /// Text revealed so far
    pub fn text(&self) -> String {
        self.payload.body_lines()[..self.shown].join("\n")
    }

    pub fn view(&self) -> RevealView {
        RevealView::Partial {
            text: self.text(),
            shown: self.shown,
            total: self.total,
        }
    }
}

/// Append-only record of payloads that finished revealing
///
/// Keyed by content key and payload sequence, so a later run writing the
/// same key streams again while re-selecting a finished one does not.
#[derive(Clone, Debug, Default)]
pub struct RevealedSet {
    entries: HashSet<(ContentKey, u64)>,
}

impl RevealedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a payload; `false` if it was already recorded
    pub fn insert(&mut self, key: ContentKey, seq: u64) -> bool {
        self.entries.insert((key, seq))
    }

    pub fn contains(&self, key: &ContentKey, seq: u64) -> bool {
        self.entries.contains(&(key.clone(), seq))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SlotKey;

    #[test]
    fn test_progress_reveals_prefix() {
        let payload = Arc::new(ContentPayload::rich("Email", "a\nb\nc", "email"));
        let mut progress = StreamProgress::new(payload, 0);
        assert_eq!(progress.total, 3);

        progress.advance();
        progress.advance();
        assert_eq!(
            progress.view(),
            RevealView::Partial { text: "a\nb".to_string(), shown: 2, total: 3 }
        );

        progress.advance();
        assert!(progress.is_complete());
        assert_eq!(progress.advance(), 3);
    }

    #[test]
    fn test_revealed_set_is_keyed_by_sequence() {
        let key = ContentKey::new(SlotKey::channel("email"), 0);
        let mut set = RevealedSet::new();

        assert!(set.insert(key.clone(), 4));
        assert!(!set.insert(key.clone(), 4));
        assert!(set.contains(&key, 4));
        assert!(!set.contains(&key, 5));
        assert_eq!(set.len(), 1);
    }
}
