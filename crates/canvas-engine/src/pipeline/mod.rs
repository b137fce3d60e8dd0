//! Generation pipeline
//!
//! Simulated content generation as a timer-driven state machine:
//!
//! ```text
//! Idle ──start──▶ Thinking ──window──▶ Streaming ──all lines──▶ Committed ──reset──▶ Idle
//! ```
//!
//! Thinking reveals scripted progress steps. Streaming writes two payloads
//! per target channel into the [`ContentStore`] and reveals rich payloads
//! line by line. Nothing here sleeps; every delay is a [`Scheduler`] timer.
//!
//! [`ContentStore`]: crate::content::ContentStore
//! [`Scheduler`]: crate::schedule::Scheduler

mod phase;
mod request;
mod reveal;
mod runner;
mod script;

pub use phase::{PipelineEvent, PipelineNotice, PipelinePhase, RunId};
pub use request::{Attachment, GenerationRequest};
pub use reveal::{RevealView, RevealedSet, StreamProgress};
pub use runner::{GenerationPipeline, PipelineContext};
pub use script::{GENERATION_STEPS, REVISION_STEPS};
