//! Error types for fthumb

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ThumbError>;

/// Main error type for fthumb
///
/// Every variant is terminal: the pipeline stops at the first one and the
/// binary reports it on stderr.
#[derive(Debug, Error)]
pub enum ThumbError {
    #[error("Could not initialize font engine: {0}")]
    EngineInit(String),

    /// The font file is missing, unreadable, or not a usable font.
    #[error("Could not open {}", .path.display())]
    FontOpen { path: PathBuf },

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Could not initialize PNG encoder: {0}")]
    EncoderInit(String),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Could not create {}", .path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse grouping used when reporting a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Library setup, allocation, or file access failed
    Resource,
    /// The font or the requested text cannot produce a thumbnail
    Input,
    /// Pixel data could not be turned into an image file
    Encoding,
}

impl ThumbError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EngineInit(_)
            | Self::EncoderInit(_)
            | Self::OutputOpen { .. }
            | Self::Io(_)
            | Self::Render(_) => ErrorCategory::Resource,
            Self::FontOpen { .. } | Self::Layout(_) => ErrorCategory::Input,
            Self::Export(_) => ErrorCategory::Encoding,
        }
    }
}

/// Layout errors
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Canvas {width}x{height} leaves no drawable area inside a {margin}px margin")]
    EmptyInset { width: u32, height: u32, margin: u32 },

    #[error("Text {0:?} has no visible ink in this font")]
    NoInk(String),
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid font data")]
    InvalidFont,

    #[error("Failed to extract outline of glyph {0}")]
    OutlineExtractionFailed(u32),

    #[error("Failed to build path")]
    PathBuildingFailed,

    #[error("Failed to allocate {width}x{height} pixmap")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("Canvas {width}x{height} exceeds the {max}px limit")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Row stride mismatch: encoder expects {expected} bytes per row, canvas has {actual}")]
    StrideMismatch { expected: usize, actual: usize },

    #[error("Invalid text chunk {key:?}: {reason}")]
    InvalidTextChunk { key: String, reason: String },
}
