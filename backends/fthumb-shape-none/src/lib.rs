//! None Shaper - Simple left-to-right horizontal advancement
//!
//! Places one glyph per character at its nominal advance, with no kerning,
//! ligatures or reordering. Missing characters fall back to `.notdef`.

use fthumb_core::{
    error::Result,
    traits::{FontRef, Shaper},
    types::{PositionedGlyph, ShapingResult},
    ShapingParams,
};

/// A minimal shaper that only does simple LTR advancement
pub struct NoneShaper;

impl NoneShaper {
    /// Create a new NoneShaper
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoneShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Shaper for NoneShaper {
    fn name(&self) -> &'static str {
        "none"
    }

    fn shape(
        &self,
        text: &str,
        font: &dyn FontRef,
        params: &ShapingParams,
    ) -> Result<ShapingResult> {
        log::debug!(
            "NoneShaper: Shaping {} chars at {}",
            text.chars().count(),
            params.size
        );

        let mut glyphs = Vec::new();
        let mut x_advance = 0.0;
        let scale = params.size / font.units_per_em().max(1) as f32;

        for (cluster, ch) in text.char_indices() {
            // .notdef (0) if not found
            let glyph_id = font.glyph_id(ch).unwrap_or(0);
            let advance = font.advance_width(glyph_id) * scale;

            glyphs.push(PositionedGlyph {
                id: glyph_id,
                x: x_advance,
                y: 0.0,
                advance,
                cluster: cluster as u32,
            });

            x_advance += advance;
        }

        Ok(ShapingResult {
            glyphs,
            advance_width: x_advance,
            size: params.size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mock font for testing
    struct MockFont;

    impl FontRef for MockFont {
        fn data(&self) -> &[u8] {
            &[]
        }

        fn units_per_em(&self) -> u16 {
            1000
        }

        fn glyph_id(&self, ch: char) -> Option<u32> {
            // Simple mapping: ASCII characters to their values
            if ch.is_ascii() {
                Some(ch as u32)
            } else {
                None
            }
        }

        fn advance_width(&self, glyph_id: u32) -> f32 {
            if glyph_id == 0 {
                250.0
            } else {
                500.0
            }
        }
    }

    #[test]
    fn test_basic_shaping() {
        let shaper = NoneShaper::new();
        let params = ShapingParams { size: 16.0 };

        let result = shaper.shape("Hello", &MockFont, &params).unwrap();

        assert_eq!(result.glyphs.len(), 5);
        assert_eq!(result.size, 16.0);
        assert_eq!(result.advance_width, 40.0);

        // Check that glyphs are positioned sequentially
        for i in 1..result.glyphs.len() {
            assert!(result.glyphs[i].x > result.glyphs[i - 1].x);
        }
    }

    #[test]
    fn test_advances_scale_with_size() {
        let shaper = NoneShaper::new();
        let small = shaper.shape("Aa", &MockFont, &ShapingParams { size: 100.0 }).unwrap();
        let large = shaper.shape("Aa", &MockFont, &ShapingParams { size: 250.0 }).unwrap();

        assert_eq!(small.advance_width, 100.0);
        assert_eq!(large.advance_width, 250.0);
    }

    #[test]
    fn test_missing_char_uses_notdef() {
        let shaper = NoneShaper::new();
        let result = shaper
            .shape("é", &MockFont, &ShapingParams::default())
            .unwrap();

        assert_eq!(result.glyphs[0].id, 0);
        assert_eq!(result.glyphs[0].cluster, 0);
        assert_eq!(result.advance_width, 25.0);
    }

    #[test]
    fn test_empty_text() {
        let shaper = NoneShaper::new();
        let result = shaper
            .shape("", &MockFont, &ShapingParams::default())
            .unwrap();

        assert_eq!(result.glyphs.len(), 0);
        assert_eq!(result.advance_width, 0.0);
    }
}
