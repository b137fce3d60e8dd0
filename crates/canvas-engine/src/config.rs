//! Engine configuration
//!
//! Every field has a default, so hosts only need to supply the values they
//! want to override:
//!
//! ```rust
//! use canvas_engine::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "timing": { "line_delay_ms": 40 } }"#).unwrap();
//! assert_eq!(config.timing.line_delay_ms, 40);
//! assert_eq!(config.timing.step_cadence_ms, 600);
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::error::ConfigError;
use crate::math::Vec2;

/// Placement of new cards when no position hint is given
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Top-left corner of the first tile
    pub origin: Vec2,
    /// Tiles per row
    pub columns: u32,
    /// Gap between tiles in both directions
    pub gap: f32,
    /// Tiles scanned for a free slot before falling back to the next row
    pub max_tiles: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin: Vec2::new(40.0, 40.0),
            columns: 3,
            gap: 24.0,
            max_tiles: 64,
        }
    }
}

/// Randomized duration window, `[min_ms, max_ms)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationWindow {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DurationWindow {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }
}

/// Timer cadence of the generation pipeline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineTiming {
    /// Delay between revealed thinking steps
    pub step_cadence_ms: u64,
    /// Thinking duration for revisions
    pub revision_window: DurationWindow,
    /// Thinking duration for first-time generation
    pub generation_window: DurationWindow,
    /// Delay between streamed lines of rich content
    pub line_delay_ms: u64,
    /// Time spent in Committed before returning to Idle
    pub commit_reset_ms: u64,
}

impl Default for PipelineTiming {
    fn default() -> Self {
        Self {
            step_cadence_ms: 600,
            revision_window: DurationWindow::new(1_500, 2_500),
            generation_window: DurationWindow::new(3_000, 5_000),
            line_delay_ms: 80,
            commit_reset_ms: 500,
        }
    }
}

/// Top-level engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    pub timing: PipelineTiming,
    /// Minimum height change (px) before a card is auto-resized
    pub autosize_threshold: f32,
    /// Seed for thinking-window jitter; `None` seeds from entropy
    pub rng_seed: Option<u64>,
    /// Channels whose generated payloads are rich format
    pub rich_channels: Vec<String>,
    /// Kinds of which at least one card must remain on the canvas
    pub protected_kinds: Vec<EntityKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            timing: PipelineTiming::default(),
            autosize_threshold: 4.0,
            rng_seed: None,
            rich_channels: vec!["email".to_string()],
            protected_kinds: vec![EntityKind::EmailCard],
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.columns == 0 {
            return Err(ConfigError::Invalid {
                field: "layout.columns",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.timing.step_cadence_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.step_cadence_ms",
                reason: "must be positive".to_string(),
            });
        }
        if self.timing.line_delay_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.line_delay_ms",
                reason: "must be positive".to_string(),
            });
        }
        for (field, window) in [
            ("timing.revision_window", self.timing.revision_window),
            ("timing.generation_window", self.timing.generation_window),
        ] {
            if window.min_ms > window.max_ms || window.max_ms == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("empty window {}..{}", window.min_ms, window.max_ms),
                });
            }
        }
        if self.autosize_threshold.is_nan() || self.autosize_threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "autosize_threshold",
                reason: "must be non-negative".to_string(),
            });
        }
        Ok(())
    }

    /// Whether generated payloads for `channel` are rich format
    pub fn is_rich_channel(&self, channel: &str) -> bool {
        self.rich_channels.iter().any(|c| c == channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "rng_seed": 7, "layout": { "columns": 2 } }"#).unwrap();
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.layout.columns, 2);
        assert!((config.layout.gap - 24.0).abs() < 0.001);
        assert_eq!(config.timing, PipelineTiming::default());
    }

    #[test]
    fn test_protected_kinds_use_camel_case() {
        let config = EngineConfig::from_json(r#"{ "protected_kinds": ["socialCard"] }"#).unwrap();
        assert_eq!(config.protected_kinds, vec![EntityKind::SocialCard]);
    }

    #[test]
    fn test_rejects_zero_columns() {
        let err = EngineConfig::from_json(r#"{ "layout": { "columns": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "layout.columns", .. }));
    }

    #[test]
    fn test_rejects_inverted_window() {
        let err = EngineConfig::from_json(
            r#"{ "timing": { "revision_window": { "min_ms": 900, "max_ms": 100 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "timing.revision_window", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(EngineConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rich_channel_lookup() {
        let config = EngineConfig::default();
        assert!(config.is_rich_channel("email"));
        assert!(!config.is_rich_channel("linkedin"));
    }
}
