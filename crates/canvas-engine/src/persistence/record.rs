//! Chat session records

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{ContentPayload, SlotKey};
use crate::error::StoreError;
use crate::host::SessionStore;

/// Author of a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One payload produced by a generation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub slot: SlotKey,
    pub lane: usize,
    pub payload: ContentPayload,
}

/// Chat message, optionally carrying generated content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<GeneratedContent>,
    pub timestamp_ms: u64,
}

impl Message {
    pub fn user(text: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            contents: Vec::new(),
            timestamp_ms,
        }
    }

    pub fn assistant(text: impl Into<String>, contents: Vec<GeneratedContent>, timestamp_ms: u64) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            contents,
            timestamp_ms,
        }
    }
}

/// A chat session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub title: String,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl SessionRecord {
    /// Empty session with a fresh v4 id
    pub fn new(title: impl Into<String>, now_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
            messages: Vec::new(),
        }
    }

    /// Append a message and bump `updated_at_ms`
    pub fn push(&mut self, message: Message) {
        self.updated_at_ms = self.updated_at_ms.max(message.timestamp_ms);
        self.messages.push(message);
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: HashMap<Uuid, SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&mut self, title: &str, now_ms: u64) -> Result<SessionRecord, StoreError> {
        let record = SessionRecord::new(title, now_ms);
        self.records.insert(record.id, record.clone());
        Ok(record)
    }

    fn save(&mut self, record: &SessionRecord) -> Result<(), StoreError> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> Option<SessionRecord> {
        self.records.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_get() {
        let mut store = MemorySessionStore::new();
        let record = store.create("Launch", 1_000).unwrap();

        let fetched = store.get_by_id(record.id).unwrap();
        assert_eq!(fetched.title, "Launch");
        assert_eq!(fetched.created_at_ms, 1_000);
        assert!(fetched.messages.is_empty());
    }

    #[test]
    fn test_last_save_wins() {
        let mut store = MemorySessionStore::new();
        let mut record = store.create("Launch", 0).unwrap();

        record.push(Message::user("first", 10));
        store.save(&record).unwrap();
        record.push(Message::user("second", 20));
        store.save(&record).unwrap();

        let fetched = store.get_by_id(record.id).unwrap();
        assert_eq!(fetched.messages.len(), 2);
        assert_eq!(fetched.updated_at_ms, 20);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_id() {
        let store = MemorySessionStore::new();
        assert!(store.get_by_id(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_record_json() {
        let mut record = SessionRecord::new("Launch", 5);
        record.push(Message::assistant(
            "Here are two versions",
            vec![GeneratedContent {
                slot: SlotKey::channel("sms"),
                lane: 1,
                payload: ContentPayload::plain("SMS", "Hello", "sms"),
            }],
            6,
        ));

        let json = record.to_json().unwrap();
        assert!(json.contains(r#""role":"assistant""#));
        let back = SessionRecord::from_json(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SessionRecord::from_json("{\"id\":"),
            Err(StoreError::Serialization(_))
        ));
    }
}
