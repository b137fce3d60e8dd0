//! Generation pipeline state machine

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{DurationWindow, PipelineTiming};
use crate::content::{ContentKey, ContentPayload, ContentStore, SlotKey};
use crate::error::{ContentError, PipelineError};
use crate::host::TemplateCatalog;
use crate::schedule::{Scheduler, TimerHandle};
use super::script::steps_for;
use super::{
    GenerationRequest, PipelineEvent, PipelineNotice, PipelinePhase, RevealView, RevealedSet, RunId,
    StreamProgress,
};

/// Lanes written per slot by every run
const LANES_PER_RUN: usize = 2;

/// Everything a pipeline step touches outside the pipeline itself
pub struct PipelineContext<'a> {
    pub scheduler: &'a mut Scheduler<PipelineEvent>,
    pub content: &'a mut ContentStore,
    pub templates: &'a dyn TemplateCatalog,
    /// Wall-clock time used for history labels
    pub wall_ms: u64,
}

/// Staged generation run: Thinking, then Streaming, then Committed
///
/// At most one run is active. Content is written into the store when
/// thinking ends; the pipeline only tracks how much of it is revealed.
pub struct GenerationPipeline {
    timing: PipelineTiming,
    rich_channels: Vec<String>,
    rng: SmallRng,

    phase: PipelinePhase,
    /// Id of the current (or last) run
    run: RunId,
    request: Option<GenerationRequest>,
    script: &'static [&'static str],
    revealed_steps: Vec<String>,
    step_timer: Option<TimerHandle>,

    /// Keys written by the current run, in write order
    run_keys: Vec<ContentKey>,
    /// Streams still revealing lines
    streams: BTreeMap<ContentKey, StreamProgress>,
    /// Last payload written per key
    latest: HashMap<ContentKey, (u64, Arc<ContentPayload>)>,
    revealed: RevealedSet,
    next_seq: u64,

    notices: Vec<PipelineNotice>,
}

impl GenerationPipeline {
    /// Create an idle pipeline
    ///
    /// `seed` makes the thinking windows reproducible; `None` seeds from
    /// entropy.
    pub fn new(timing: PipelineTiming, rich_channels: Vec<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            timing,
            rich_channels,
            rng,
            phase: PipelinePhase::Idle,
            run: 0,
            request: None,
            script: &[],
            revealed_steps: Vec::new(),
            step_timer: None,
            run_keys: Vec::new(),
            streams: BTreeMap::new(),
            latest: HashMap::new(),
            revealed: RevealedSet::new(),
            next_seq: 0,
            notices: Vec::new(),
        }
    }

    #[inline]
    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// Id of the current run, or of the last one when idle
    #[inline]
    pub fn run_id(&self) -> RunId {
        self.run
    }

    /// Request of the active run
    pub fn request(&self) -> Option<&GenerationRequest> {
        self.request.as_ref()
    }

    /// Thinking steps revealed so far in this run
    pub fn revealed_steps(&self) -> &[String] {
        &self.revealed_steps
    }

    /// Content keys written by the current run
    pub fn run_keys(&self) -> &[ContentKey] {
        &self.run_keys
    }

    /// Streams still in progress
    pub fn streams(&self) -> impl Iterator<Item = (&ContentKey, &StreamProgress)> {
        self.streams.iter()
    }

    pub fn revealed(&self) -> &RevealedSet {
        &self.revealed
    }

    /// Drain notices produced since the last call
    pub fn drain_notices(&mut self) -> Vec<PipelineNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Reveal state of the last payload generated for `key`
    pub fn reveal_view(&self, key: &ContentKey) -> RevealView {
        if let Some(stream) = self.streams.get(key) {
            return stream.view();
        }
        match self.latest.get(key) {
            Some((seq, payload)) if self.revealed.contains(key, *seq) => RevealView::Complete(Arc::clone(payload)),
            _ => RevealView::Hidden,
        }
    }

    /// Start a run
    ///
    /// Rejected with `Busy`, without any state change, while another run is
    /// active.
    pub fn start(
        &mut self,
        request: GenerationRequest,
        ctx: &mut PipelineContext<'_>,
    ) -> Result<RunId, PipelineError> {
        if self.is_busy() {
            tracing::debug!(run = self.run, phase = ?self.phase, "generation already running");
            return Err(PipelineError::Busy(self.run));
        }

        self.run += 1;
        let run = self.run;
        let window = if request.is_revision {
            self.timing.revision_window
        } else {
            self.timing.generation_window
        };
        let thinking_ms = self.sample(window);

        self.script = steps_for(request.is_revision);
        self.revealed_steps.clear();
        self.run_keys.clear();
        self.streams.clear();
        self.request = Some(request);
        self.set_phase(PipelinePhase::Thinking);

        ctx.scheduler.schedule(thinking_ms, PipelineEvent::FinishThinking { run });
        self.reveal_next_step();
        if self.revealed_steps.len() < self.script.len() {
            self.step_timer = Some(ctx.scheduler.schedule(self.timing.step_cadence_ms, PipelineEvent::RevealStep { run }));
        }

        tracing::info!(run, thinking_ms, "generation started");
        Ok(run)
    }

    /// Handle a due timer event
    ///
    /// Events from another run, or arriving in the wrong phase, are
    /// ignored.
    pub fn handle(&mut self, event: PipelineEvent, ctx: &mut PipelineContext<'_>) -> Result<(), ContentError> {
        if event.run() != self.run {
            tracing::trace!(event_run = event.run(), run = self.run, "ignoring event from earlier run");
            return Ok(());
        }

        match (event, self.phase) {
            (PipelineEvent::RevealStep { run }, PipelinePhase::Thinking) => {
                self.step_timer = None;
                self.reveal_next_step();
                if self.revealed_steps.len() < self.script.len() {
                    self.step_timer =
                        Some(ctx.scheduler.schedule(self.timing.step_cadence_ms, PipelineEvent::RevealStep { run }));
                }
            }
            (PipelineEvent::FinishThinking { run }, PipelinePhase::Thinking) => {
                if let Some(handle) = self.step_timer.take() {
                    ctx.scheduler.cancel(handle);
                }
                self.begin_streaming(run, ctx)?;
            }
            (PipelineEvent::RevealLine { run, key }, PipelinePhase::Streaming) => {
                self.reveal_line(run, key, ctx);
            }
            (PipelineEvent::CommitReset { run }, PipelinePhase::Committed) => {
                self.request = None;
                self.set_phase(PipelinePhase::Idle);
                tracing::debug!(run, "pipeline idle");
            }
            (event, phase) => {
                tracing::trace!(?event, ?phase, "ignoring event in wrong phase");
            }
        }
        Ok(())
    }

    /// Return to Idle, abandoning the active run
    ///
    /// Content already written stays; pending timers become stale and are
    /// ignored when they fire.
    pub fn reset(&mut self) {
        if self.is_busy() {
            tracing::debug!(run = self.run, phase = ?self.phase, "pipeline reset");
        }
        self.phase = PipelinePhase::Idle;
        self.request = None;
        self.step_timer = None;
        self.streams.clear();
        self.revealed_steps.clear();
    }

    fn sample(&mut self, window: DurationWindow) -> u64 {
        if window.min_ms < window.max_ms {
            self.rng.gen_range(window.min_ms..window.max_ms)
        } else {
            window.min_ms
        }
    }

    fn set_phase(&mut self, phase: PipelinePhase) {
        self.phase = phase;
        self.notices.push(PipelineNotice::PhaseChanged { run: self.run, phase });
    }

    fn reveal_next_step(&mut self) {
        let index = self.revealed_steps.len();
        if let Some(step) = self.script.get(index) {
            self.revealed_steps.push(step.to_string());
            self.notices.push(PipelineNotice::StepRevealed {
                run: self.run,
                index,
                text: step.to_string(),
            });
        }
    }

    fn is_rich(&self, slot: &SlotKey) -> bool {
        slot.channel_id()
            .is_some_and(|c| self.rich_channels.iter().any(|r| r == c))
    }

    /// Build the payload for one lane of one slot from the template catalog
    fn synthesize(&self, slot: &SlotKey, lane: usize, templates: &dyn TemplateCatalog, topic: &str) -> ContentPayload {
        let version = lane + 1;
        let prefix = slot.channel_id().unwrap_or("generic");
        let template = templates
            .find(&format!("{prefix}-v{version}"))
            .or_else(|| templates.find(&format!("generic-v{version}")))
            .unwrap_or_else(|| templates.default_template());

        let mut payload = template.render(topic);
        payload.channels = slot.channel_id().map(|c| vec![c.to_string()]).unwrap_or_default();
        payload.is_rich_format = self.is_rich(slot);
        payload
    }

    fn begin_streaming(&mut self, run: RunId, ctx: &mut PipelineContext<'_>) -> Result<(), ContentError> {
        let request = match self.request.clone() {
            Some(request) => request,
            None => return Ok(()),
        };
        self.set_phase(PipelinePhase::Streaming);

        for slot in request.slots() {
            let payloads: Vec<Arc<ContentPayload>> = (0..LANES_PER_RUN)
                .map(|lane| Arc::new(self.synthesize(&slot, lane, ctx.templates, &request.input_text)))
                .collect();

            for (lane, payload) in payloads.into_iter().enumerate() {
                ctx.content.set_base_content(&slot, lane, Arc::clone(&payload))?;
                if request.is_revision {
                    let index = ctx.content.append_history(&slot, lane, Arc::clone(&payload), ctx.wall_ms)?;
                    ctx.content.select_history(&slot, lane, index)?;
                } else {
                    ctx.content.clear_history_selection(&slot, lane)?;
                }
                self.track(run, ContentKey::new(slot.clone(), lane), payload, ctx);
            }
        }

        tracing::debug!(run, keys = self.run_keys.len(), streams = self.streams.len(), "streaming started");
        if self.streams.is_empty() {
            self.commit(run, ctx);
        }
        Ok(())
    }

    /// Start revealing a freshly written payload
    fn track(&mut self, run: RunId, key: ContentKey, payload: Arc<ContentPayload>, ctx: &mut PipelineContext<'_>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest.insert(key.clone(), (seq, Arc::clone(&payload)));
        self.run_keys.push(key.clone());

        let progress = StreamProgress::new(payload, seq);
        if progress.payload.is_rich_format && !progress.is_complete() {
            ctx.scheduler.schedule(self.timing.line_delay_ms, PipelineEvent::RevealLine { run, key: key.clone() });
            self.streams.insert(key, progress);
        } else {
            self.finish_stream(run, key, seq);
        }
    }

    fn reveal_line(&mut self, run: RunId, key: ContentKey, ctx: &mut PipelineContext<'_>) {
        let (shown, total, seq) = match self.streams.get_mut(&key) {
            Some(stream) => {
                let shown = stream.advance();
                (shown, stream.total, stream.seq)
            }
            None => return,
        };
        self.notices.push(PipelineNotice::LineRevealed {
            run,
            key: key.clone(),
            shown,
            total,
        });

        if shown < total {
            ctx.scheduler.schedule(self.timing.line_delay_ms, PipelineEvent::RevealLine { run, key });
            return;
        }

        self.streams.remove(&key);
        self.finish_stream(run, key, seq);
        if self.streams.is_empty() {
            self.commit(run, ctx);
        }
    }

    fn finish_stream(&mut self, run: RunId, key: ContentKey, seq: u64) {
        self.revealed.insert(key.clone(), seq);
        self.notices.push(PipelineNotice::StreamCompleted { run, key });
    }

    fn commit(&mut self, run: RunId, ctx: &mut PipelineContext<'_>) {
        self.set_phase(PipelinePhase::Committed);
        self.notices.push(PipelineNotice::Committed {
            run,
            keys: self.run_keys.clone(),
        });
        ctx.scheduler.schedule(self.timing.commit_reset_ms, PipelineEvent::CommitReset { run });
        tracing::info!(run, keys = self.run_keys.len(), "generation committed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::BuiltinCatalog;
    use crate::pipeline::{GENERATION_STEPS, REVISION_STEPS};

    struct Harness {
        pipeline: GenerationPipeline,
        scheduler: Scheduler<PipelineEvent>,
        content: ContentStore,
        templates: BuiltinCatalog,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                pipeline: GenerationPipeline::new(PipelineTiming::default(), vec!["email".to_string()], Some(7)),
                scheduler: Scheduler::new(),
                content: ContentStore::new(),
                templates: BuiltinCatalog::new(),
            }
        }

        fn start(&mut self, request: GenerationRequest) -> Result<RunId, PipelineError> {
            let mut ctx = PipelineContext {
                scheduler: &mut self.scheduler,
                content: &mut self.content,
                templates: &self.templates,
                wall_ms: 0,
            };
            self.pipeline.start(request, &mut ctx)
        }

        fn dispatch(&mut self, event: PipelineEvent) {
            let wall_ms = self.scheduler.now_ms();
            let mut ctx = PipelineContext {
                scheduler: &mut self.scheduler,
                content: &mut self.content,
                templates: &self.templates,
                wall_ms,
            };
            self.pipeline.handle(event, &mut ctx).unwrap();
        }

        /// Fire every event due up to `until_ms`
        fn run_until(&mut self, until_ms: u64) {
            while let Some((_, event)) = self.scheduler.pop_due(until_ms) {
                self.dispatch(event);
            }
            self.scheduler.set_now(until_ms);
        }

        /// Fire events one at a time until the pipeline reaches `phase`
        fn run_until_phase(&mut self, phase: PipelinePhase) {
            while self.pipeline.phase() != phase {
                let (_, event) = self.scheduler.pop_due(u64::MAX).expect("pipeline stalled");
                self.dispatch(event);
            }
        }

        fn run_to_idle(&mut self) {
            self.run_until(self.scheduler.now_ms() + 60_000);
            assert_eq!(self.pipeline.phase(), PipelinePhase::Idle);
        }
    }

    fn email() -> SlotKey {
        SlotKey::channel("email")
    }

    #[test]
    fn test_start_reveals_first_step() {
        let mut h = Harness::new();
        h.start(GenerationRequest::new("Aurora", vec!["email".to_string()])).unwrap();

        assert_eq!(h.pipeline.phase(), PipelinePhase::Thinking);
        assert_eq!(h.pipeline.revealed_steps(), &[GENERATION_STEPS[0].to_string()]);
    }

    #[test]
    fn test_steps_follow_cadence() {
        let mut h = Harness::new();
        h.start(GenerationRequest::new("Aurora", vec![])).unwrap();

        h.run_until(1_200);
        assert_eq!(h.pipeline.revealed_steps().len(), 3);
        assert_eq!(h.pipeline.phase(), PipelinePhase::Thinking);
    }

    #[test]
    fn test_thinking_window_bounds() {
        let mut h = Harness::new();
        h.start(GenerationRequest::revision("shorter", vec!["sms".to_string()])).unwrap();

        h.run_until(1_499);
        assert_eq!(h.pipeline.phase(), PipelinePhase::Thinking);
        assert!(h.pipeline.revealed_steps().len() <= REVISION_STEPS.len());

        h.run_until(2_500);
        assert_ne!(h.pipeline.phase(), PipelinePhase::Thinking);
    }

    #[test]
    fn test_second_start_is_rejected_without_change() {
        let mut h = Harness::new();
        let run = h.start(GenerationRequest::new("a", vec!["email".to_string()])).unwrap();
        let pending = h.scheduler.pending();
        let steps = h.pipeline.revealed_steps().to_vec();

        let err = h.start(GenerationRequest::revision("b", vec!["sms".to_string()])).unwrap_err();

        assert_eq!(err, PipelineError::Busy(run));
        assert_eq!(h.pipeline.run_id(), run);
        assert_eq!(h.scheduler.pending(), pending);
        assert_eq!(h.pipeline.revealed_steps(), steps.as_slice());
        assert!(!h.pipeline.request().unwrap().is_revision);
    }

    #[test]
    fn test_first_generation_writes_two_distinct_lanes() {
        let mut h = Harness::new();
        h.start(GenerationRequest::new("Aurora", vec!["email".to_string()])).unwrap();
        h.run_to_idle();

        assert_eq!(h.content.lane_count(&email()), 2);
        let v1 = h.content.resolve_displayed_payload(&email(), 0).unwrap();
        let v2 = h.content.resolve_displayed_payload(&email(), 1).unwrap();
        assert_ne!(v1, v2);
        assert!(v1.is_rich_format);
        assert_eq!(h.content.peek(&email()).unwrap().lane(0).unwrap().current_history(), None);
    }

    #[test]
    fn test_revision_appends_history_and_points_at_it() {
        let mut h = Harness::new();
        h.start(GenerationRequest::new("Aurora", vec!["email".to_string()])).unwrap();
        h.run_to_idle();

        h.start(GenerationRequest::revision("Aurora 2", vec!["email".to_string()])).unwrap();
        h.run_to_idle();

        for lane in 0..2 {
            let lane_state = h.content.peek(&email()).unwrap().lane(lane).unwrap();
            assert_eq!(lane_state.history().len(), 1);
            assert_eq!(lane_state.current_history(), Some(0));
            assert!(lane_state.history()[0].payload.body.contains("Aurora 2"));
        }
    }

    #[test]
    fn test_no_channels_uses_default_slot() {
        let mut h = Harness::new();
        h.start(GenerationRequest::new("Aurora", vec![])).unwrap();
        h.run_to_idle();

        assert_eq!(h.content.lane_count(&SlotKey::Default), 2);
        let payload = h.content.resolve_displayed_payload(&SlotKey::Default, 0).unwrap();
        assert!(!payload.is_rich_format);
        assert!(payload.channels.is_empty());
    }

    #[test]
    fn test_rich_payload_streams_line_by_line() {
        let mut h = Harness::new();
        h.start(GenerationRequest::new("Aurora", vec!["email".to_string()])).unwrap();
        h.run_until_phase(PipelinePhase::Streaming);
        let started = h.scheduler.now_ms();

        let key = ContentKey::new(email(), 0);
        let total = h.content.resolve_displayed_payload(&email(), 0).unwrap().body_lines().len();
        assert_eq!(
            h.pipeline.reveal_view(&key),
            RevealView::Partial { text: String::new(), shown: 0, total }
        );

        h.run_until(started + 80);
        match h.pipeline.reveal_view(&key) {
            RevealView::Partial { shown, text, .. } => {
                assert_eq!(shown, 1);
                assert!(text.starts_with("<h1>"));
            }
            other => panic!("expected partial view, got {other:?}"),
        }

        h.run_until(started + 80 * total as u64);
        assert!(matches!(h.pipeline.reveal_view(&key), RevealView::Complete(_)));
        assert_eq!(h.pipeline.phase(), PipelinePhase::Committed);
    }

    #[test]
    fn test_plain_payloads_commit_immediately() {
        let mut h = Harness::new();
        h.start(GenerationRequest::new("Aurora", vec!["sms".to_string()])).unwrap();
        h.run_until_phase(PipelinePhase::Committed);

        assert!(h.pipeline.streams().next().is_none());
        let key = ContentKey::new(SlotKey::channel("sms"), 1);
        assert!(matches!(h.pipeline.reveal_view(&key), RevealView::Complete(_)));

        let notices = h.pipeline.drain_notices();
        assert!(notices.iter().any(|n| matches!(n, PipelineNotice::Committed { keys, .. } if keys.len() == 2)));
    }

    #[test]
    fn test_revealed_content_stays_complete_across_runs() {
        let mut h = Harness::new();
        h.start(GenerationRequest::new("Aurora", vec!["email".to_string()])).unwrap();
        h.run_to_idle();
        let before = h.pipeline.revealed().len();

        let key = ContentKey::new(email(), 1);
        let first = h.pipeline.reveal_view(&key);
        assert_eq!(first, h.pipeline.reveal_view(&key));
        assert!(matches!(first, RevealView::Complete(_)));

        h.start(GenerationRequest::new("Other", vec!["sms".to_string()])).unwrap();
        h.run_to_idle();
        assert!(matches!(h.pipeline.reveal_view(&key), RevealView::Complete(_)));
        assert_eq!(h.pipeline.revealed().len(), before + 2);
    }

    #[test]
    fn test_unknown_key_is_hidden() {
        let h = Harness::new();
        assert_eq!(h.pipeline.reveal_view(&ContentKey::new(email(), 0)), RevealView::Hidden);
    }

    #[test]
    fn test_stale_events_are_ignored_after_reset() {
        let mut h = Harness::new();
        h.start(GenerationRequest::new("Aurora", vec!["email".to_string()])).unwrap();
        h.pipeline.reset();

        h.start(GenerationRequest::new("Aurora", vec!["sms".to_string()])).unwrap();
        h.run_to_idle();

        // the abandoned email run never wrote anything
        assert_eq!(h.content.lane_count(&email()), 0);
        assert_eq!(h.content.lane_count(&SlotKey::channel("sms")), 2);
    }

    #[test]
    fn test_same_seed_same_window() {
        let window = DurationWindow::new(3_000, 5_000);
        let mut a = Harness::new();
        let mut b = Harness::new();

        for _ in 0..3 {
            let sample = a.pipeline.sample(window);
            assert!((3_000..5_000).contains(&sample));
            assert_eq!(sample, b.pipeline.sample(window));
        }
        assert_eq!(a.pipeline.sample(DurationWindow::new(700, 700)), 700);
    }
}
