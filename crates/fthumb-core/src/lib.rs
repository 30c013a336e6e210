//! fthumb Core: four stages from font file to thumbnail
//!
//! A thumbnail run is a straight line through four stages:
//!
//! 1. **Argument Resolution** - flags become a [`RenderRequest`]
//! 2. **Font Loading** - the font file becomes a [`traits::FontRef`]
//! 3. **Layout & Render** - a [`traits::Shaper`] positions glyphs, a
//!    [`traits::Renderer`] fits and centers them on a [`types::Canvas`]
//! 4. **Encode & Tag** - an [`traits::Exporter`] writes the canvas with its
//!    [`types::TextChunks`]
//!
//! This crate holds the shared data model, the stage traits, the error
//! taxonomy and the fit/centering arithmetic in [`layout`].

use std::path::PathBuf;

pub mod error;
pub mod layout;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use error::{ErrorCategory, Result, ThumbError};
pub use traits::{Exporter, FontRef, Renderer, Shaper};

/// Values used when the command line leaves something unspecified
pub mod defaults {
    /// Canvas edge length when neither width nor height is given
    pub const SIZE: u32 = 256;

    /// Sample text rendered into the thumbnail
    pub const TEXT: &str = "Aa";

    /// Font size used for the first, unscaled measurement
    pub const REFERENCE_SIZE: f32 = 100.0;

    /// The margin on every side is `height / MARGIN_DIVISOR`
    pub const MARGIN_DIVISOR: u32 = 20;
}

/// The data structures passed between stages
pub mod types {
    use crate::layout::{Fit, Inset};

    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// A glyph that knows exactly where it belongs
    #[derive(Debug, Clone, PartialEq)]
    pub struct PositionedGlyph {
        pub id: GlyphId,
        pub x: f32,
        pub y: f32,
        pub advance: f32,
        pub cluster: u32,
    }

    /// Glyphs positioned along a single left-to-right line
    #[derive(Debug, Clone)]
    pub struct ShapingResult {
        pub glyphs: Vec<PositionedGlyph>,
        pub advance_width: f32,
        /// Font size the positions were computed at
        pub size: f32,
    }

    /// Ink bounding box of a run of text
    ///
    /// Coordinates are y-down and relative to the pen origin on the baseline,
    /// so `y_bearing` is negative for ink above the baseline.
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub struct TextExtents {
        pub x_bearing: f64,
        pub y_bearing: f64,
        pub width: f64,
        pub height: f64,
        pub x_advance: f64,
    }

    impl TextExtents {
        /// True when there is nothing visible to fit
        pub fn is_empty(&self) -> bool {
            !(self.width > 0.0 && self.height > 0.0)
        }

        /// Center of the ink box, relative to the pen origin
        pub fn ink_center(&self) -> (f64, f64) {
            (
                self.x_bearing + self.width / 2.0,
                self.y_bearing + self.height / 2.0,
            )
        }
    }

    /// Fixed-size RGBA8 pixel buffer with straight alpha
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Canvas {
        width: u32,
        height: u32,
        data: Vec<u8>,
    }

    impl Canvas {
        /// Bytes per pixel
        pub const CHANNELS: usize = 4;

        /// A fully transparent canvas
        pub fn new(width: u32, height: u32) -> Self {
            let len = width as usize * height as usize * Self::CHANNELS;
            Self {
                width,
                height,
                data: vec![0; len],
            }
        }

        /// Wrap existing RGBA8 rows; `None` when the length doesn't match
        pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
            if data.len() != width as usize * height as usize * Self::CHANNELS {
                return None;
            }
            Some(Self {
                width,
                height,
                data,
            })
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        /// Bytes per row in the backing buffer
        pub fn stride(&self) -> usize {
            self.width as usize * Self::CHANNELS
        }

        pub fn data(&self) -> &[u8] {
            &self.data
        }

        pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
            if x >= self.width || y >= self.height {
                return None;
            }
            let idx = y as usize * self.stride() + x as usize * Self::CHANNELS;
            let px = self.data.get(idx..idx + Self::CHANNELS)?;
            Some([px[0], px[1], px[2], px[3]])
        }
    }

    /// Ordered key to text mapping stored as image metadata
    ///
    /// Insertion order is the write order. Re-inserting a key replaces its
    /// text in place.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct TextChunks {
        entries: Vec<(String, String)>,
    }

    impl TextChunks {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
            let key = key.into();
            let text = text.into();
            match self.entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = text,
                None => self.entries.push((key, text)),
            }
        }

        pub fn get(&self, key: &str) -> Option<&str> {
            self.entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, text)| text.as_str())
        }

        pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
            self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
        }

        pub fn keys(&self) -> impl Iterator<Item = &str> {
            self.entries.iter().map(|(k, _)| k.as_str())
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }
    }

    impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TextChunks {
        fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
            let mut chunks = TextChunks::new();
            for (key, text) in iter {
                chunks.insert(key, text);
            }
            chunks
        }
    }

    /// Where and how large the text ends up
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct LayoutResult {
        /// Which dimension limited the fit
        pub fit: Fit,
        /// Final font size
        pub scale: f64,
        /// Extents measured at `scale`
        pub extents: TextExtents,
        /// Pen origin inside the inset area
        pub origin: (f64, f64),
        pub inset: Inset,
    }

    /// A finished canvas and the layout that produced it
    #[derive(Debug, Clone)]
    pub struct Rendered {
        pub canvas: Canvas,
        pub layout: LayoutResult,
    }
}

/// How shaping should behave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapingParams {
    pub size: f32,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self {
            size: defaults::REFERENCE_SIZE,
        }
    }
}

/// How rendering should look
#[derive(Debug, Clone)]
pub struct RenderParams {
    pub width: u32,
    pub height: u32,
    pub foreground: Color,
    pub antialias: bool,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: defaults::SIZE,
            height: defaults::SIZE,
            foreground: Color::black(),
            antialias: true,
        }
    }
}

/// Simple RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }
}

/// Everything one thumbnail run needs, with defaults already applied
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub font_path: PathBuf,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub text: String,
    /// Recorded as `Thumb::URI`; empty when absent
    pub source_uri: Option<String>,
    /// Face within a TTC/OTC collection
    pub face_index: u32,
    pub foreground: Color,
}

impl RenderRequest {
    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            width: self.width,
            height: self.height,
            foreground: self.foreground,
            ..RenderParams::default()
        }
    }
}
