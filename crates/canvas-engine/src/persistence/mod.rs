//! Persistence module for state serialization
//!
//! Provides the chat session records kept by a [`SessionStore`] and the
//! snapshot export/import of the canvas layout.
//!
//! [`SessionStore`]: crate::host::SessionStore

mod record;
mod snapshot;

pub use record::{GeneratedContent, MemorySessionStore, Message, Role, SessionRecord};
pub use snapshot::CanvasSnapshot;
