//! Generation runs, virtual time and commit handling

use crate::content::{ChannelId, ContentKey, SlotKey};
use crate::entity::{EntityId, EntityKind};
use crate::error::EngineError;
use crate::math::Size;
use crate::persistence::{GeneratedContent, Message};
use crate::pipeline::{Attachment, GenerationRequest, PipelineContext, PipelineNotice, RunId};
use super::CanvasEngine;

impl CanvasEngine {
    /// Generate content for `channels` (the default slot when empty)
    pub fn generate(
        &mut self,
        input: &str,
        channels: Vec<ChannelId>,
        attachments: Vec<Attachment>,
    ) -> Result<RunId, EngineError> {
        let request = GenerationRequest::new(input, channels).with_attachments(attachments);
        self.start_run(request, None)
    }

    /// Revise previously generated content
    ///
    /// The feedback provider reviews the request first; if it fails, the
    /// failure becomes `last_error` and no run starts.
    pub fn request_revision(&mut self, input: &str, channels: Vec<ChannelId>) -> Result<RunId, EngineError> {
        self.ensure_initialized()?;
        if self.pipeline.is_busy() {
            return Err(crate::error::PipelineError::Busy(self.pipeline.run_id()).into());
        }

        let request = GenerationRequest::revision(input, channels);
        match self.host.feedback.review(&request) {
            Ok(note) => self.start_run(request, Some(note)),
            Err(e) => {
                tracing::warn!(error = %e, "revision review failed");
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Start a run; `note` is recorded as the reply once the run commits
    fn start_run(&mut self, request: GenerationRequest, note: Option<String>) -> Result<RunId, EngineError> {
        self.ensure_initialized()?;
        let wall_ms = self.now_ms();
        let input = request.input_text.clone();

        let mut ctx = PipelineContext {
            scheduler: &mut self.scheduler,
            content: &mut self.content,
            templates: self.host.templates.as_ref(),
            wall_ms,
        };
        let run = self.pipeline.start(request, &mut ctx)?;

        self.pending_note = note;
        self.last_error = None;
        self.record_message(Message::user(input, wall_ms));
        self.collect_notices();
        Ok(run)
    }

    /// Advance virtual time by `delta_ms`, firing due timers
    ///
    /// Returns the number of timers fired.
    pub fn advance(&mut self, delta_ms: u64) -> Result<usize, EngineError> {
        let target = self.scheduler.now_ms().saturating_add(delta_ms);
        self.advance_to(target)
    }

    /// Advance virtual time to `t_ms` (logical time since `init`)
    pub fn advance_to(&mut self, t_ms: u64) -> Result<usize, EngineError> {
        self.ensure_initialized()?;
        let mut fired = 0;

        while let Some((_, event)) = self.scheduler.pop_due(t_ms) {
            fired += 1;
            let wall_ms = self.now_ms();
            let mut ctx = PipelineContext {
                scheduler: &mut self.scheduler,
                content: &mut self.content,
                templates: self.host.templates.as_ref(),
                wall_ms,
            };
            if let Err(e) = self.pipeline.handle(event, &mut ctx) {
                tracing::warn!(error = %e, "pipeline event failed");
            }
            self.collect_notices();
        }

        self.scheduler.set_now(t_ms);
        Ok(fired)
    }

    /// Move pipeline notices to the host queue, reacting to commits
    fn collect_notices(&mut self) {
        for notice in self.pipeline.drain_notices() {
            if let PipelineNotice::Committed { run, keys } = &notice {
                self.on_committed(*run, keys);
            }
            self.notices.push(notice);
        }
    }

    fn on_committed(&mut self, run: RunId, keys: &[ContentKey]) {
        let mut slots: Vec<SlotKey> = Vec::new();
        for key in keys {
            if !slots.contains(&key.slot) {
                slots.push(key.slot.clone());
            }
        }

        for slot in &slots {
            if self.cards_for(slot).is_empty() {
                self.create_card_for(slot);
            }
        }
        for slot in &slots {
            for id in self.cards_for(slot) {
                self.autosize(id);
            }
        }

        let is_revision = self.pipeline.request().is_some_and(|r| r.is_revision);
        let text = match self.pending_note.take() {
            Some(note) if is_revision => note,
            _ => format!("Generated {} versions for {} channel(s)", keys.len(), slots.len()),
        };
        let contents = keys
            .iter()
            .filter_map(|key| {
                self.content
                    .resolve_displayed_payload(&key.slot, key.lane)
                    .map(|payload| GeneratedContent {
                        slot: key.slot.clone(),
                        lane: key.lane,
                        payload: (*payload).clone(),
                    })
            })
            .collect();
        let now = self.now_ms();
        self.record_message(Message::assistant(text, contents, now));
        tracing::debug!(run, slots = slots.len(), "commit handled");
    }

    /// Place a card for a slot that has none
    fn create_card_for(&mut self, slot: &SlotKey) -> EntityId {
        let (kind, title) = match slot.channel_id() {
            Some(channel) => {
                let kind = if self.config.is_rich_channel(channel) {
                    EntityKind::EmailCard
                } else {
                    EntityKind::SocialCard
                };
                let title = self
                    .host
                    .channels
                    .channels()
                    .into_iter()
                    .find(|c| c.id == channel)
                    .map_or_else(|| channel.to_string(), |c| c.name);
                (kind, title)
            }
            None => (EntityKind::SocialCard, "Draft".to_string()),
        };

        let id = self.add_card(kind, Some(slot.clone()), None);
        self.entities.set_title(id, &title);
        tracing::debug!(id, %slot, "card created for generated content");
        id
    }

    /// Fit a rich-format card's height to its content
    ///
    /// Changes within the autosize threshold are ignored so layout does not
    /// jitter.
    pub(crate) fn autosize(&mut self, id: EntityId) -> bool {
        let Some(view) = self.card_view(id) else {
            return false;
        };
        let Some(payload) = view.payload.filter(|p| p.is_rich_format) else {
            return false;
        };

        let size = view.entity.size;
        let target = self
            .host
            .measurer
            .intrinsic_height(&payload, size.width)
            .max(view.entity.kind.min_size().height);
        if (target - size.height).abs() <= self.config.autosize_threshold {
            return false;
        }

        tracing::debug!(id, from = size.height, to = target, "autosizing card");
        self.entities.resize(id, Size::new(size.width, target))
    }

    fn record_message(&mut self, message: Message) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.push(message);
        if let Err(e) = self.host.sessions.save(session) {
            tracing::warn!(error = %e, "could not save session");
        }
    }
}
