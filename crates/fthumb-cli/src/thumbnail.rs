//! One thumbnail run: font file in, tagged PNG out

use std::path::PathBuf;

use anyhow::{Context, Result};
use fthumb_core::{
    error::ErrorCategory, layout::Fit, traits::Exporter, traits::Renderer, RenderRequest,
    ThumbError,
};
use fthumb_export::{read_text_chunks, thumbnail_chunks, write_thumbnail, PngExporter};
use fthumb_fontdb::FontEngine;
use fthumb_render_skia::SkiaRenderer;
use fthumb_shape_none::NoneShaper;

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct Report {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fit: Fit,
    pub bytes: usize,
}

/// Load, render, encode and save, stopping at the first failure
///
/// Nothing is written unless every stage before saving succeeded.
pub fn run(request: &RenderRequest) -> Result<Report> {
    log::debug!("Request: {request:?}");

    let engine = FontEngine::new().context("initializing font engine")?;
    let typeface = engine
        .open(&request.font_path, request.face_index)
        .context("loading font")?;

    let renderer = SkiaRenderer::new(Box::new(NoneShaper::new()));
    let rendered = renderer
        .render(&request.text, &typeface, &request.render_params())
        .context("rendering thumbnail")?;

    let chunks = thumbnail_chunks(request.source_uri.as_deref(), typeface.mtime_unix());
    let exporter = PngExporter::new();
    let bytes = exporter
        .export(&rendered.canvas, &chunks)
        .context("encoding PNG")?;
    write_thumbnail(&request.output_path, &bytes).context("saving PNG")?;

    if log::log_enabled!(log::Level::Debug) {
        match read_text_chunks(&bytes) {
            Ok(stored) => {
                for (key, text) in stored.iter() {
                    log::debug!("Stored {key} = {text:?}");
                }
            },
            Err(err) => log::warn!("Could not read back metadata: {err}"),
        }
    }

    log::debug!(
        "Fit by {} at size {:.3}",
        rendered.layout.fit,
        rendered.layout.scale
    );

    Ok(Report {
        output: request.output_path.clone(),
        width: rendered.canvas.width(),
        height: rendered.canvas.height(),
        fit: rendered.layout.fit,
        bytes: bytes.len(),
    })
}

/// Category of the library error underneath any added context
pub fn error_category(err: &anyhow::Error) -> Option<ErrorCategory> {
    err.downcast_ref::<ThumbError>().map(ThumbError::category)
}

/// The context chain of `err` as one line, without repeating wrapped messages
///
/// Library errors embed their cause in their own message, so a cause whose
/// text already appeared is skipped.
pub fn error_chain(err: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}
