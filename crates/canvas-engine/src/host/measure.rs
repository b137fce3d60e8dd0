//! Intrinsic content height

use crate::content::ContentPayload;

/// Measures how tall a card must be to show a payload
pub trait ContentMeasurer {
    fn intrinsic_height(&self, payload: &ContentPayload, width: f32) -> f32;
}

/// Estimate from line count and an average glyph width
#[derive(Clone, Debug)]
pub struct LineMeasurer {
    pub line_height: f32,
    pub glyph_width: f32,
    /// Horizontal padding inside the card
    pub padding: f32,
    /// Header and footer height
    pub chrome: f32,
}

impl Default for LineMeasurer {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            glyph_width: 7.5,
            padding: 32.0,
            chrome: 120.0,
        }
    }
}

impl ContentMeasurer for LineMeasurer {
    fn intrinsic_height(&self, payload: &ContentPayload, width: f32) -> f32 {
        let usable = (width - self.padding).max(self.glyph_width);
        let per_line = (usable / self.glyph_width).floor().max(1.0) as usize;

        let wrapped: usize = payload
            .body
            .lines()
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum();
        let subject = usize::from(payload.subject.is_some());

        self.chrome + (wrapped + subject) as f32 * self.line_height
    }
}
