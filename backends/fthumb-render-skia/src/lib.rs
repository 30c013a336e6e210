//! Skia Renderer - fitted, centered sample text via tiny-skia
//!
//! The renderer measures text by tracing real glyph outlines with skrifa,
//! so every size it reports is the size of the visible ink rather than of
//! nominal advance boxes. The thumbnail is built in three passes:
//!
//! 1. Measure at the reference size to learn the text's natural proportions
//! 2. Scale uniformly so the ink fills the inset area along one axis,
//!    then measure again at the new size and center the ink
//! 3. Record the outlines and replay them onto the final canvas, offset by
//!    the margin

use fthumb_core::{
    error::{LayoutError, RenderError, Result},
    layout::{self, Inset},
    traits::{FontRef, Renderer, Shaper},
    types::{LayoutResult, Rendered, TextExtents},
    defaults, RenderParams, ShapingParams,
};
use kurbo::{Affine, BezPath, Shape};
use skrifa::{
    instance::{LocationRef, Size},
    outline::DrawSettings,
    MetadataProvider,
};

mod recording;

pub use recording::Recording;

/// tiny-skia powered thumbnail renderer
pub struct SkiaRenderer {
    shaper: Box<dyn Shaper>,
    /// Size of the first, unscaled measurement
    reference_size: f32,
    /// Maximum canvas dimension to prevent memory exhaustion
    max_size: u32,
}

/// Outlines of a run of text, already positioned, plus their ink box
struct TracedText {
    path: BezPath,
    extents: TextExtents,
}

impl SkiaRenderer {
    /// Creates a renderer that positions glyphs with `shaper`
    pub fn new(shaper: Box<dyn Shaper>) -> Self {
        Self {
            shaper,
            reference_size: defaults::REFERENCE_SIZE,
            max_size: 65535,
        }
    }

    /// Ink extents of `text` at `size`, relative to the pen origin
    pub fn measure(&self, text: &str, font: &dyn FontRef, size: f32) -> Result<TextExtents> {
        Ok(self.trace(text, font, size)?.extents)
    }

    /// Shape `text` and trace every glyph outline into a single y-down path
    fn trace(&self, text: &str, font: &dyn FontRef, size: f32) -> Result<TracedText> {
        let shaped = self.shaper.shape(text, font, &ShapingParams { size })?;

        let font_ref = skrifa::FontRef::from_index(font.data(), font.face_index())
            .map_err(|_| RenderError::InvalidFont)?;
        let outlines = font_ref.outline_glyphs();

        let mut path = BezPath::new();
        for glyph in &shaped.glyphs {
            let Some(outline) = outlines.get(skrifa::GlyphId::new(glyph.id)) else {
                log::debug!("Skia: no outline for glyph {}", glyph.id);
                continue;
            };

            let mut pen = PathPen {
                path: &mut path,
                dx: glyph.x as f64,
                dy: glyph.y as f64,
            };
            // Each size is traced from scratch, never scaled from an earlier pass
            let settings = DrawSettings::unhinted(Size::new(size), LocationRef::default());
            outline
                .draw(settings, &mut pen)
                .map_err(|_| RenderError::OutlineExtractionFailed(glyph.id))?;
        }

        let extents = ink_extents(&path, shaped.advance_width as f64);
        log::debug!(
            "Skia: {:?} at {:.3}: ink {:.2}x{:.2}, bearing ({:.2}, {:.2})",
            text,
            size,
            extents.width,
            extents.height,
            extents.x_bearing,
            extents.y_bearing
        );
        Ok(TracedText { path, extents })
    }
}

/// Tight bounding box of the ink, with the pen origin at (0, 0)
fn ink_extents(path: &BezPath, x_advance: f64) -> TextExtents {
    if path.elements().is_empty() {
        return TextExtents {
            x_advance,
            ..TextExtents::default()
        };
    }

    let bbox = path.bounding_box();
    TextExtents {
        x_bearing: bbox.x0,
        y_bearing: bbox.y0,
        width: bbox.width(),
        height: bbox.height(),
        x_advance,
    }
}

impl Renderer for SkiaRenderer {
    fn name(&self) -> &'static str {
        "skia"
    }

    fn render(&self, text: &str, font: &dyn FontRef, params: &RenderParams) -> Result<Rendered> {
        let (width, height) = (params.width, params.height);
        if width > self.max_size || height > self.max_size {
            return Err(RenderError::TooLarge {
                width,
                height,
                max: self.max_size,
            }
            .into());
        }

        let inset = Inset::for_canvas(width, height)?;
        let (target_w, target_h) = (inset.width as f64, inset.height as f64);

        // Pass 1: natural proportions
        let natural = self.measure(text, font, self.reference_size)?;
        if natural.is_empty() {
            return Err(LayoutError::NoInk(text.to_string()).into());
        }

        // Pass 2: fit, re-measure at the fitted size, center the ink
        let (fit, scale) =
            layout::fit_scale(&natural, self.reference_size as f64, target_w, target_h);
        let TracedText { mut path, extents } = self.trace(text, font, scale as f32)?;
        if extents.is_empty() {
            return Err(LayoutError::NoInk(text.to_string()).into());
        }
        let origin = layout::centered_origin(&extents, target_w, target_h);
        path.apply_affine(Affine::translate(origin));

        // Pass 3: record, then replay inside the margin
        let mut recording = Recording::new();
        recording.fill(path, params.foreground);
        if let Some(ink) = recording.bounds() {
            log::trace!(
                "Recorded ink ({:.2}, {:.2})-({:.2}, {:.2}) in a {}x{} inset",
                ink.x0,
                ink.y0,
                ink.x1,
                ink.y1,
                inset.width,
                inset.height
            );
        }
        let margin = inset.margin as f64;
        let canvas = recording.replay(width, height, margin, margin, params.antialias)?;

        log::debug!(
            "Skia: {:?} fit by {:?} at size {:.3}, origin ({:.2}, {:.2}), margin {}",
            text,
            fit,
            scale,
            origin.0,
            origin.1,
            inset.margin
        );

        Ok(Rendered {
            canvas,
            layout: LayoutResult {
                fit,
                scale,
                extents,
                origin,
                inset,
            },
        })
    }
}

/// Bridge between skrifa's outline commands and kurbo's path format
///
/// Font outlines are y-up around the glyph origin; the path is y-down with
/// the glyph origin moved to `(dx, dy)`.
struct PathPen<'a> {
    path: &'a mut BezPath,
    dx: f64,
    dy: f64,
}

impl PathPen<'_> {
    fn point(&self, x: f32, y: f32) -> (f64, f64) {
        (self.dx + x as f64, self.dy - y as f64)
    }
}

impl skrifa::outline::OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let c = self.point(cx0, cy0);
        let p = self.point(x, y);
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let c0 = self.point(cx0, cy0);
        let c1 = self.point(cx1, cy1);
        let p = self.point(x, y);
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
