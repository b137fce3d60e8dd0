//! Canvas engine coordinating all components
//!
//! This module is split into focused submodules:
//! - `cards`: Card lifecycle and the card/slot binding table
//! - `input`: Pointer event routing to the gesture controller
//! - `content`: Version and history selection, user edits
//! - `generation`: Pipeline runs, virtual time and commit handling
//! - `layout`: Snapshot export/import

mod cards;
mod content;
mod generation;
mod input;
mod layout;

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::content::{ContentStore, SlotKey};
use crate::entity::{EntityId, EntityKind, EntityStore};
use crate::error::EngineError;
use crate::gesture::GestureController;
use crate::host::Host;
use crate::persistence::SessionRecord;
use crate::pipeline::{GenerationPipeline, PipelineEvent, PipelineNotice};
use crate::schedule::Scheduler;

pub use cards::CardView;

/// Canvas engine coordinating all canvas components
///
/// This is the main entry point for canvas operations, managing:
/// - Entity store (cards, selection, z-order)
/// - Gesture controller (drag/resize state machine)
/// - Content store (slots, version lanes, history)
/// - Generation pipeline and the scheduler driving it
/// - Binding table mapping cards to the slot they display
///
/// All counters and sets live here, so two engines never share state.
pub struct CanvasEngine {
    pub(crate) config: EngineConfig,
    pub(crate) host: Host,
    pub(crate) entities: EntityStore,
    pub(crate) gestures: GestureController,
    pub(crate) content: ContentStore,
    pub(crate) pipeline: GenerationPipeline,
    pub(crate) scheduler: Scheduler<PipelineEvent>,
    /// Which slot each card displays
    pub(crate) bindings: HashMap<EntityId, SlotKey>,
    /// Wall-clock time at logical time zero; `None` until `init`
    pub(crate) epoch_ms: Option<u64>,
    pub(crate) session: Option<SessionRecord>,
    /// Reviewer note for the revision in flight
    pub(crate) pending_note: Option<String>,
    /// One-line message for the user about the last failed request
    pub(crate) last_error: Option<String>,
    /// Notices not yet taken by the host
    pub(crate) notices: Vec<PipelineNotice>,
}

impl Default for CanvasEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default(), Host::default())
    }
}

impl CanvasEngine {
    /// Create a new canvas engine
    pub fn new(config: EngineConfig, host: Host) -> Self {
        let pipeline = GenerationPipeline::new(config.timing.clone(), config.rich_channels.clone(), config.rng_seed);
        Self {
            entities: EntityStore::new(config.layout.clone(), config.protected_kinds.clone()),
            gestures: GestureController::new(),
            content: ContentStore::new(),
            pipeline,
            scheduler: Scheduler::new(),
            bindings: HashMap::new(),
            epoch_ms: None,
            session: None,
            pending_note: None,
            last_error: None,
            notices: Vec::new(),
            config,
            host,
        }
    }

    /// Initialize the engine at wall-clock time `epoch_ms`
    ///
    /// Opens a chat session and places the initial email card. Calling it
    /// again after `dispose` resumes with the existing canvas.
    pub fn init(&mut self, epoch_ms: u64) {
        if self.epoch_ms.is_some() {
            return;
        }
        self.epoch_ms = Some(epoch_ms.saturating_sub(self.scheduler.now_ms()));

        if self.session.is_none() {
            match self.host.sessions.create("New session", epoch_ms) {
                Ok(record) => self.session = Some(record),
                Err(e) => tracing::warn!(error = %e, "could not open session"),
            }
        }

        // Only create the first card if none exists yet (idempotent for remounts)
        if self.entities.count() == 0 {
            self.add_card(EntityKind::EmailCard, Some(SlotKey::channel("email")), None);
        }
        tracing::info!(epoch_ms, cards = self.entities.count(), "canvas engine initialized");
    }

    /// Tear down timers when the host unmounts
    ///
    /// Pending pipeline events are dropped and the pipeline returns to Idle;
    /// cards and content are kept.
    pub fn dispose(&mut self) {
        let dropped = self.scheduler.cancel_all();
        self.pipeline.reset();
        self.gestures.reset();
        self.pending_note = None;
        self.epoch_ms = None;
        tracing::info!(dropped, "canvas engine disposed");
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.epoch_ms.is_some()
    }

    pub(crate) fn ensure_initialized(&self) -> Result<u64, EngineError> {
        self.epoch_ms.ok_or(EngineError::NotInitialized)
    }

    /// Wall-clock time corresponding to the scheduler's logical time
    pub fn now_ms(&self) -> u64 {
        self.epoch_ms.unwrap_or(0).saturating_add(self.scheduler.now_ms())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn pipeline(&self) -> &GenerationPipeline {
        &self.pipeline
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Current chat session, if one could be opened
    pub fn session(&self) -> Option<&SessionRecord> {
        self.session.as_ref()
    }

    /// Message for the user about the last failed request
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Take pipeline notices produced since the last call
    pub fn drain_notices(&mut self) -> Vec<PipelineNotice> {
        std::mem::take(&mut self.notices)
    }
}
