//! Fit and centering arithmetic
//!
//! Text is measured once at [`REFERENCE_SIZE`](crate::defaults::REFERENCE_SIZE),
//! scaled uniformly so its ink box fills the inset area along the
//! constraining axis, then measured again and centered on its ink.

use crate::{defaults, error::LayoutError, types::TextExtents};

/// Which axis limited the fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Text is relatively taller than the box; its height fills the box
    Height,
    /// Text is relatively wider than (or as wide as) the box; its width fills the box
    Width,
}

impl std::fmt::Display for Fit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Height => "height",
            Self::Width => "width",
        })
    }
}

/// Margin and drawable area of a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inset {
    /// Gap kept free on every side
    pub margin: u32,
    pub width: u32,
    pub height: u32,
}

/// Margin for a canvas of the given height, truncating
pub fn margin_for(height: u32) -> u32 {
    height / defaults::MARGIN_DIVISOR
}

impl Inset {
    /// Drawable area of a `width` x `height` canvas
    ///
    /// Canvases too narrow for their margin are rejected rather than drawn
    /// with a zero or negative target box.
    pub fn for_canvas(width: u32, height: u32) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::InvalidDimensions { width, height });
        }

        let margin = margin_for(height);
        let border = 2 * margin;
        if width <= border || height <= border {
            return Err(LayoutError::EmptyInset {
                width,
                height,
                margin,
            });
        }

        Ok(Self {
            margin,
            width: width - border,
            height: height - border,
        })
    }

    /// Center of the drawable area in canvas coordinates
    pub fn center(&self) -> (f64, f64) {
        (
            self.margin as f64 + self.width as f64 / 2.0,
            self.margin as f64 + self.height as f64 / 2.0,
        )
    }
}

/// Decide which axis constrains the fit by comparing aspect ratios
pub fn choose_fit(natural_width: f64, natural_height: f64, target_width: f64, target_height: f64) -> Fit {
    if natural_width / natural_height < target_width / target_height {
        Fit::Height
    } else {
        Fit::Width
    }
}

/// Font size that makes text measured at `reference` fill the target box
///
/// `natural` must have visible ink; callers check [`TextExtents::is_empty`].
pub fn fit_scale(natural: &TextExtents, reference: f64, target_width: f64, target_height: f64) -> (Fit, f64) {
    let fit = choose_fit(natural.width, natural.height, target_width, target_height);
    let scale = match fit {
        Fit::Height => reference * target_height / natural.height,
        Fit::Width => reference * target_width / natural.width,
    };
    log::debug!(
        "fit {:?}: {:.2}x{:.2} into {}x{} -> size {:.3}",
        fit,
        natural.width,
        natural.height,
        target_width,
        target_height,
        scale
    );
    (fit, scale)
}

/// Pen origin that puts the ink center on the target box center
pub fn centered_origin(extents: &TextExtents, target_width: f64, target_height: f64) -> (f64, f64) {
    (
        target_width / 2.0 - (extents.width / 2.0 + extents.x_bearing),
        target_height / 2.0 - (extents.height / 2.0 + extents.y_bearing),
    )
}
