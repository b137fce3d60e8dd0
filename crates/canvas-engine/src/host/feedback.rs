//! Revision pre-check

use crate::error::FeedbackError;
use crate::pipeline::GenerationRequest;

/// Reviews a revision request before it is generated
///
/// This is the only fallible collaborator call in a generation flow.
pub trait FeedbackProvider {
    fn review(&mut self, request: &GenerationRequest) -> Result<String, FeedbackError>;
}

/// Offline reviewer returning a fixed note
#[derive(Clone, Debug)]
pub struct CannedFeedback {
    note: String,
}

impl CannedFeedback {
    pub fn new(note: impl Into<String>) -> Self {
        Self { note: note.into() }
    }
}

impl Default for CannedFeedback {
    fn default() -> Self {
        Self::new("Tightened the opening line and sharpened the call to action.")
    }
}

impl FeedbackProvider for CannedFeedback {
    fn review(&mut self, request: &GenerationRequest) -> Result<String, FeedbackError> {
        if request.input_text.trim().is_empty() {
            return Err(FeedbackError::Rejected("nothing to revise".to_string()));
        }
        Ok(self.note.clone())
    }
}
