//! Session persistence boundary

use uuid::Uuid;

use crate::error::StoreError;
use crate::persistence::SessionRecord;

/// Key-value store of chat sessions
///
/// No transactional guarantees: the last `save` for an id wins.
pub trait SessionStore {
    /// Create and store a new empty session
    fn create(&mut self, title: &str, now_ms: u64) -> Result<SessionRecord, StoreError>;

    /// Store a session, replacing any previous record with the same id
    fn save(&mut self, record: &SessionRecord) -> Result<(), StoreError>;

    fn get_by_id(&self, id: Uuid) -> Option<SessionRecord>;
}
