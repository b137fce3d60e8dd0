//! Collaborator interfaces
//!
//! Everything the engine needs from its surroundings goes through one of
//! these traits. Each comes with a small built-in implementation so the
//! engine runs standalone and in tests.

mod channels;
mod feedback;
mod measure;
mod session;
mod templates;

pub use channels::{Channel, ChannelRegistry, StaticChannels};
pub use feedback::{CannedFeedback, FeedbackProvider};
pub use measure::{ContentMeasurer, LineMeasurer};
pub use session::SessionStore;
pub use templates::{BuiltinCatalog, Template, TemplateCatalog};

/// Bundle of collaborators handed to the engine
pub struct Host {
    pub templates: Box<dyn TemplateCatalog>,
    pub channels: Box<dyn ChannelRegistry>,
    pub sessions: Box<dyn SessionStore>,
    pub feedback: Box<dyn FeedbackProvider>,
    pub measurer: Box<dyn ContentMeasurer>,
}

impl Default for Host {
    fn default() -> Self {
        Self {
            templates: Box::new(BuiltinCatalog::new()),
            channels: Box::new(StaticChannels::default()),
            sessions: Box::new(crate::persistence::MemorySessionStore::new()),
            feedback: Box::new(CannedFeedback::default()),
            measurer: Box::new(LineMeasurer::default()),
        }
    }
}
