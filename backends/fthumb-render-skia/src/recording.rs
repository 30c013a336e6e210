//! Record-then-replay drawing
//!
//! A [`Recording`] collects fills in unbounded coordinates without touching
//! any pixels. Replaying it onto a fixed-size canvas with an offset is the
//! only point where rasterization happens, so anything outside the canvas
//! is simply clipped.

use fthumb_core::{
    error::{RenderError, Result},
    types::Canvas,
    Color,
};
use kurbo::{BezPath, PathEl, Shape};
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Transform};

struct FillOp {
    path: BezPath,
    color: Color,
}

/// Deferred list of path fills
#[derive(Default)]
pub struct Recording {
    ops: Vec<FillOp>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a non-zero winding fill of `path`
    pub fn fill(&mut self, path: BezPath, color: Color) {
        self.ops.push(FillOp { path, color });
    }

    /// Union of the bounding boxes of everything recorded so far
    pub fn bounds(&self) -> Option<kurbo::Rect> {
        self.ops
            .iter()
            .filter(|op| !op.path.elements().is_empty())
            .map(|op| op.path.bounding_box())
            .reduce(|a, b| a.union(b))
    }

    /// Rasterize onto a fresh transparent `width` x `height` canvas, shifted by `(dx, dy)`
    pub fn replay(&self, width: u32, height: u32, dx: f64, dy: f64, antialias: bool) -> Result<Canvas> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::PixmapCreationFailed { width, height })?;
        let transform = Transform::from_translate(dx as f32, dy as f32);

        for op in &self.ops {
            if op.path.elements().is_empty() {
                continue;
            }
            let path = to_skia_path(&op.path)?;

            let mut paint = Paint::default();
            paint.set_color_rgba8(op.color.r, op.color.g, op.color.b, op.color.a);
            paint.anti_alias = antialias;

            pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        }

        log::debug!(
            "Replayed {} fill(s) onto {}x{} at ({}, {})",
            self.ops.len(),
            width,
            height,
            dx,
            dy
        );
        canvas_from_pixmap(&pixmap)
    }
}

/// Translate kurbo's path format into tiny-skia's native format
fn to_skia_path(path: &BezPath) -> Result<Path> {
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(ctrl, end) => {
                builder.quad_to(ctrl.x as f32, ctrl.y as f32, end.x as f32, end.y as f32)
            },
            PathEl::CurveTo(c1, c2, end) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                end.x as f32,
                end.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish().ok_or_else(|| RenderError::PathBuildingFailed.into())
}

/// tiny-skia stores premultiplied pixels; the canvas holds straight alpha
fn canvas_from_pixmap(pixmap: &Pixmap) -> Result<Canvas> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Canvas::from_rgba(pixmap.width(), pixmap.height(), data).ok_or_else(|| {
        RenderError::PixmapCreationFailed {
            width: pixmap.width(),
            height: pixmap.height(),
        }
        .into()
    })
}
