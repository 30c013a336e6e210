//! The contracts between pipeline stages
//!
//! - [`FontRef`] - Your window into font data and metrics
//! - [`Shaper`] - Where characters become positioned glyphs
//! - [`Renderer`] - Where glyphs become a fitted, centered canvas
//! - [`Exporter`] - Where the canvas becomes a tagged image file

use crate::{
    error::Result,
    types::{Canvas, GlyphId, Rendered, ShapingResult, TextChunks},
    RenderParams, ShapingParams,
};

/// Read access to a loaded font
///
/// ```ignore
/// struct MyFont {
///     data: Vec<u8>,
/// }
///
/// impl FontRef for MyFont {
///     fn data(&self) -> &[u8] {
///         &self.data
///     }
///
///     fn units_per_em(&self) -> u16 {
///         2048
///     }
///
///     fn glyph_id(&self, ch: char) -> Option<GlyphId> {
///         Some(42)
///     }
///
///     fn advance_width(&self, glyph_id: GlyphId) -> f32 {
///         1229.0
///     }
/// }
/// ```
pub trait FontRef {
    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    /// Which face of a collection the data refers to
    fn face_index(&self) -> u32 {
        0
    }

    /// The font's internal coordinate system scale
    fn units_per_em(&self) -> u16;

    /// Find the glyph that represents this character
    ///
    /// Returns None when the font doesn't contain this character.
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// Horizontal advance of a glyph in font units
    fn advance_width(&self, glyph_id: GlyphId) -> f32;

    /// How many glyphs this font contains
    fn glyph_count(&self) -> Option<u32> {
        None
    }
}

/// Turns text into positioned glyphs at a given size
pub trait Shaper {
    fn name(&self) -> &'static str;

    fn shape(&self, text: &str, font: &dyn FontRef, params: &ShapingParams)
        -> Result<ShapingResult>;
}

/// Fits text into a canvas and rasterizes it
pub trait Renderer {
    fn name(&self) -> &'static str;

    /// Render `text` centered inside a `params.width` x `params.height` canvas
    fn render(&self, text: &str, font: &dyn FontRef, params: &RenderParams) -> Result<Rendered>;
}

/// Encodes a canvas plus its metadata into file bytes
pub trait Exporter {
    fn name(&self) -> &'static str;

    fn export(&self, canvas: &Canvas, chunks: &TextChunks) -> Result<Vec<u8>>;

    /// What file extension should be used?
    fn extension(&self) -> &'static str;

    /// What MIME type identifies your format?
    fn mime_type(&self) -> &'static str;
}
