//! Canvas Layout & Versioned-Content Engine
//!
//! This crate provides the core of a content-authoring canvas:
//! - Card management (create, delete, selection, z-order)
//! - Drag and resize gestures with hit testing
//! - Per-channel content slots with parallel versions and edit history
//! - A staged, timer-driven generation pipeline with streamed reveal
//!
//! ## Architecture
//!
//! The crate is organized into focused modules:
//!
//! - [`math`]: Core geometry types (`Vec2`, `Rect`, `Size`)
//! - [`entity`]: Card store, kinds and hit regions
//! - [`gesture`]: Pointer-gesture state machine
//! - [`content`]: Slots, version lanes, history and edits
//! - [`schedule`]: Logical-clock timer queue
//! - [`pipeline`]: Thinking / streaming / committed generation runs
//! - [`host`]: Collaborator traits with built-in implementations
//! - [`persistence`]: Session records and layout snapshots
//!
//! ## Example
//!
//! ```rust
//! use canvas_engine::{CanvasEngine, PipelinePhase, SlotKey};
//!
//! let mut engine = CanvasEngine::default();
//! engine.init(0);
//!
//! engine.generate("Spring sale", vec!["email".to_string()], vec![]).unwrap();
//! engine.advance(10_000).unwrap();
//!
//! assert_eq!(engine.pipeline().phase(), PipelinePhase::Idle);
//! assert_eq!(engine.content().lane_count(&SlotKey::channel("email")), 2);
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All state management is pure Rust, testable without browser
//! 2. **Time Abstraction**: Timers run on a logical clock the host advances
//! 3. **Immutable History**: Payloads are shared snapshots; edits create new ones
//! 4. **Minimal Dependencies**: Core types have no browser dependencies

pub mod config;
pub mod content;
pub mod entity;
pub mod error;
pub mod gesture;
pub mod host;
pub mod math;
pub mod persistence;
pub mod pipeline;
pub mod schedule;

mod engine;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::*;

// Re-export core types for convenience
pub use config::{EngineConfig, LayoutConfig, PipelineTiming};
pub use content::{ContentKey, ContentPayload, ContentStore, EditCommand, EditOutcome, SlotKey};
pub use engine::{CanvasEngine, CardView};
pub use entity::{EntityId, EntityKind, EntityStore, ResizeEdge, SpatialEntity};
pub use error::EngineError;
pub use gesture::{GestureController, GestureResult, GestureState};
pub use host::Host;
pub use math::{Rect, Size, Vec2};
pub use persistence::{CanvasSnapshot, SessionRecord};
pub use pipeline::{GenerationPipeline, GenerationRequest, PipelinePhase, RevealView};
pub use schedule::Scheduler;
