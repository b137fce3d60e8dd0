//! Error types for the canvas engine
//!
//! Every variant describes a declined operation. None of them are fatal:
//! the store that reported the error is left exactly as it was.

use crate::entity::{EntityId, EntityKind};

/// Errors from the spatial entity store.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EntityError {
    /// No entity with this id exists.
    #[error("entity {0} not found")]
    NotFound(EntityId),

    /// Removing the entity would leave no entity of a protected kind.
    #[error("cannot remove the last {0:?} on the canvas")]
    LastProtected(EntityKind),

    /// A restored entity's id or z-order leaves no room for new values.
    #[error("entity {0} exhausts the id or z-order range")]
    CounterExhausted(EntityId),
}

/// Errors from the pointer-gesture controller.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GestureError {
    /// Another drag or resize is already in progress.
    #[error("gesture already in progress on entity {0}")]
    Busy(EntityId),

    /// The gesture target does not exist.
    #[error("gesture target {0} not found")]
    UnknownEntity(EntityId),
}

/// Errors from the content version store.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ContentError {
    /// Lane index is neither an existing lane nor the next one.
    #[error("lane {lane} out of range for slot {slot} ({len} lanes)")]
    LaneOutOfRange { slot: String, lane: usize, len: usize },

    /// History index does not exist in the lane.
    #[error("history entry {index} out of range for slot {slot} lane {lane} ({len} entries)")]
    HistoryOutOfRange {
        slot: String,
        lane: usize,
        index: usize,
        len: usize,
    },

    /// An edit command carried an invalid value.
    #[error("invalid edit: {0}")]
    InvalidEdit(String),
}

/// Errors from the generation pipeline.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// A run is already active; the new request was not queued.
    #[error("generation already running (run {0})")]
    Busy(u64),
}

/// Failure of the revision pre-check collaborator.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FeedbackError {
    /// The feedback service could not be reached.
    #[error("feedback unavailable: {0}")]
    Unavailable(String),

    /// The service answered but rejected the request.
    #[error("feedback rejected: {0}")]
    Rejected(String),
}

/// Errors from the session store collaborator.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Record could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Backing store refused the write.
    #[error("write failed: {0}")]
    Write(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Errors loading engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration text is not valid JSON for `EngineConfig`.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is out of its allowed range.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Umbrella error returned by the canvas engine facade.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Gesture(#[from] GestureError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The engine has been disposed or was never initialized.
    #[error("engine is not initialized")]
    NotInitialized,
}
