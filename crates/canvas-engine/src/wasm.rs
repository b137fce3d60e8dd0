//! WASM exports for the canvas engine
//!
//! This module provides wasm-bindgen exports for the CanvasEngine,
//! allowing the web UI to drive the canvas directly. Structured results
//! cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::content::{EditCommand, SlotKey};
use crate::engine::CanvasEngine;
use crate::entity::{EntityKind, ResizeEdge};
use crate::host::Host;
use crate::math::Vec2;
use crate::persistence::CanvasSnapshot;
use crate::pipeline::Attachment;

// Import js_sys::Date for timestamps
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Date, js_name = now)]
    fn date_now() -> f64;
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn slot_key(channel: &str) -> SlotKey {
    if channel.is_empty() || channel == "default" {
        SlotKey::Default
    } else {
        SlotKey::channel(channel)
    }
}

fn parse_kind(kind: &str) -> Option<EntityKind> {
    match kind {
        "emailCard" => Some(EntityKind::EmailCard),
        "socialCard" => Some(EntityKind::SocialCard),
        "channelGroup" => Some(EntityKind::ChannelGroup),
        _ => None,
    }
}

/// Canvas controller for WASM - wraps CanvasEngine with JS-friendly API
#[wasm_bindgen]
pub struct CanvasController {
    engine: CanvasEngine,
    /// `Date.now()` at the last tick, for advancing virtual time
    last_tick_ms: Option<f64>,
}

#[wasm_bindgen]
impl CanvasController {
    /// Create a controller, optionally from a JSON `EngineConfig`
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<CanvasController, JsValue> {
        let config = match config_json {
            Some(text) => EngineConfig::from_json(&text).map_err(to_js_error)?,
            None => EngineConfig::default(),
        };
        Ok(Self {
            engine: CanvasEngine::new(config, Host::default()),
            last_tick_ms: None,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Initialize the canvas
    #[wasm_bindgen]
    pub fn init(&mut self) {
        let now = date_now();
        self.engine.init(now.max(0.0) as u64);
        self.last_tick_ms = Some(now);
    }

    /// Cancel pending timers; call on unmount
    #[wasm_bindgen]
    pub fn dispose(&mut self) {
        self.engine.dispose();
        self.last_tick_ms = None;
    }

    /// Advance virtual time to `Date.now()`; call once per animation frame
    ///
    /// Returns true if any timer fired.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Result<bool, JsValue> {
        let now = date_now();
        let elapsed = match self.last_tick_ms {
            Some(last) => (now - last).max(0.0) as u64,
            None => return Ok(false),
        };
        self.last_tick_ms = Some(now);
        let fired = self.engine.advance(elapsed).map_err(to_js_error)?;
        Ok(fired > 0)
    }

    // =========================================================================
    // Cards
    // =========================================================================

    /// Create a card bound to `channel` (empty for unbound)
    #[wasm_bindgen]
    pub fn add_card(&mut self, kind: &str, channel: &str, x: Option<f32>, y: Option<f32>) -> Result<u64, JsValue> {
        let kind = parse_kind(kind).ok_or_else(|| JsValue::from_str("unknown card kind"))?;
        let slot = (!channel.is_empty()).then(|| slot_key(channel));
        let hint = x.zip(y).map(|(x, y)| Vec2::new(x, y));
        Ok(self.engine.add_card(kind, slot, hint))
    }

    #[wasm_bindgen]
    pub fn remove_card(&mut self, id: u64) -> Result<(), JsValue> {
        self.engine.remove_card(id).map(|_| ()).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn select_card(&mut self, id: u64) -> bool {
        self.engine.select_card(id)
    }

    #[wasm_bindgen]
    pub fn get_selected_card(&self) -> Option<u64> {
        self.engine.entities().selected()
    }

    /// Get all cards, bottom to top, as JSON
    #[wasm_bindgen]
    pub fn get_cards_json(&self) -> String {
        serde_json::to_string(&self.engine.card_views()).unwrap_or_else(|_| "[]".to_string())
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    #[wasm_bindgen]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> String {
        match self.engine.pointer_down(x, y) {
            Ok(result) => serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string()),
            Err(e) => serde_json::json!({ "type": "error", "message": e.to_string() }).to_string(),
        }
    }

    #[wasm_bindgen]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> String {
        let result = self.engine.pointer_move(x, y);
        serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen]
    pub fn pointer_up(&mut self) -> String {
        let result = self.engine.pointer_up();
        serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Start a resize from a handle direction ("n", "se", ...)
    #[wasm_bindgen]
    pub fn start_resize_drag(&mut self, id: u64, direction: &str, x: f32, y: f32) -> Result<(), JsValue> {
        let edge = ResizeEdge::from_direction(direction);
        self.engine.begin_resize(id, x, y, edge).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn start_move_drag(&mut self, id: u64, x: f32, y: f32) -> Result<(), JsValue> {
        self.engine.begin_drag(id, x, y).map_err(to_js_error)
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Start a generation run
    ///
    /// `channels_json` is an array of channel ids, `attachments_json` an
    /// array of `{ name, size }`.
    #[wasm_bindgen]
    pub fn generate(&mut self, input: &str, channels_json: &str, attachments_json: &str) -> Result<u64, JsValue> {
        let channels: Vec<String> = serde_json::from_str(channels_json).map_err(to_js_error)?;
        let attachments: Vec<Attachment> = if attachments_json.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(attachments_json).map_err(to_js_error)?
        };
        self.engine.generate(input, channels, attachments).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn request_revision(&mut self, input: &str, channels_json: &str) -> Result<u64, JsValue> {
        let channels: Vec<String> = serde_json::from_str(channels_json).map_err(to_js_error)?;
        self.engine.request_revision(input, channels).map_err(to_js_error)
    }

    /// Current pipeline phase ("idle", "thinking", ...)
    #[wasm_bindgen]
    pub fn get_phase(&self) -> String {
        serde_json::to_value(self.engine.pipeline().phase())
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn get_thinking_steps_json(&self) -> String {
        serde_json::to_string(self.engine.pipeline().revealed_steps()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Take notices produced since the last call, as a JSON array
    #[wasm_bindgen]
    pub fn drain_notices_json(&mut self) -> String {
        serde_json::to_string(&self.engine.drain_notices()).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen]
    pub fn get_last_error(&self) -> Option<String> {
        self.engine.last_error().map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn clear_error(&mut self) {
        self.engine.clear_error();
    }

    // =========================================================================
    // Versions and edits
    // =========================================================================

    #[wasm_bindgen]
    pub fn select_version(&mut self, channel: &str, lane: usize) -> Result<(), JsValue> {
        self.engine.select_version(&slot_key(channel), lane).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn select_history(&mut self, channel: &str, lane: usize, index: usize) -> Result<(), JsValue> {
        self.engine.select_history(&slot_key(channel), lane, index).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn clear_history_selection(&mut self, channel: &str, lane: usize) -> Result<(), JsValue> {
        self.engine.clear_history_selection(&slot_key(channel), lane).map_err(to_js_error)
    }

    /// Get a slot's lanes and histories as JSON
    #[wasm_bindgen]
    pub fn get_slot_json(&self, channel: &str) -> String {
        match self.engine.content().peek(&slot_key(channel)) {
            Some(slot) => serde_json::to_string(slot).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }

    /// Apply an edit given as `{ "command": "setBody", "value": "..." }`
    #[wasm_bindgen]
    pub fn apply_edit(&mut self, channel: &str, lane: usize, command_json: &str) -> Result<String, JsValue> {
        let command: EditCommand = serde_json::from_str(command_json).map_err(to_js_error)?;
        let outcome = self
            .engine
            .apply_edit(&slot_key(channel), lane, &command)
            .map_err(to_js_error)?;
        serde_json::to_string(&outcome).map_err(to_js_error)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    #[wasm_bindgen]
    pub fn export_snapshot(&self) -> Result<String, JsValue> {
        self.engine.snapshot().to_json().map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn import_snapshot(&mut self, json: &str) -> Result<(), JsValue> {
        let snapshot = CanvasSnapshot::from_json(json).map_err(to_js_error)?;
        self.engine.restore(snapshot).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn get_session_json(&self) -> String {
        match self.engine.session() {
            Some(session) => serde_json::to_string(session).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }
}
