//! Pipeline phases, timer events and notices

use serde::{Deserialize, Serialize};

use crate::content::ContentKey;

/// Identifier of one generation run
pub type RunId = u64;

/// Phase of the generation pipeline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelinePhase {
    #[default]
    Idle,
    Thinking,
    Streaming,
    Committed,
}

impl PipelinePhase {
    /// Whether a run is in progress
    #[inline]
    pub fn is_busy(self) -> bool {
        self != PipelinePhase::Idle
    }
}

/// Timer payloads scheduled by the pipeline
///
/// Each carries the run that scheduled it; events from an earlier run are
/// ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Reveal the next thinking step
    RevealStep { run: RunId },
    /// Thinking window elapsed
    FinishThinking { run: RunId },
    /// Reveal the next line of one streamed payload
    RevealLine { run: RunId, key: ContentKey },
    /// Leave Committed
    CommitReset { run: RunId },
}

impl PipelineEvent {
    pub fn run(&self) -> RunId {
        match self {
            PipelineEvent::RevealStep { run }
            | PipelineEvent::FinishThinking { run }
            | PipelineEvent::RevealLine { run, .. }
            | PipelineEvent::CommitReset { run } => *run,
        }
    }
}

/// Observable pipeline progress, drained by the orchestrator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PipelineNotice {
    PhaseChanged { run: RunId, phase: PipelinePhase },
    StepRevealed { run: RunId, index: usize, text: String },
    LineRevealed { run: RunId, key: ContentKey, shown: usize, total: usize },
    StreamCompleted { run: RunId, key: ContentKey },
    /// Every payload of the run is fully revealed
    Committed { run: RunId, keys: Vec<ContentKey> },
}
