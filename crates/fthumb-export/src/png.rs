//! PNG export format
//!
//! Encodes a canvas as 8-bit non-interlaced RGBA with the best compression
//! the `png` crate offers, and stores [`TextChunks`] as compressed text.

use ::png::{AdaptiveFilterType, BitDepth, ColorType, Compression, Decoder, Encoder};
use fthumb_core::{
    error::{ExportError, Result, ThumbError},
    traits::Exporter,
    types::{Canvas, TextChunks},
};

/// Longest keyword a PNG text chunk may carry
const MAX_KEYWORD_LEN: usize = 79;

/// PNG exporter for thumbnails
///
/// ```
/// use fthumb_export::PngExporter;
/// let exporter = PngExporter::new();
/// ```
pub struct PngExporter {
    compression: Compression,
}

impl PngExporter {
    /// Create an exporter using the strongest compression level
    pub fn new() -> Self {
        Self {
            compression: Compression::Best,
        }
    }

    /// Encode `canvas` with `chunks` into an in-memory PNG file
    pub fn encode(&self, canvas: &Canvas, chunks: &TextChunks) -> Result<Vec<u8>> {
        let color = ColorType::Rgba;
        let depth = BitDepth::Eight;

        let expected = row_bytes(color, depth, canvas.width());
        if expected != canvas.stride() {
            return Err(ExportError::StrideMismatch {
                expected,
                actual: canvas.stride(),
            }
            .into());
        }
        for (key, _) in chunks.iter() {
            validate_keyword(key)?;
        }

        let mut png_data = Vec::new();
        {
            let mut encoder = Encoder::new(&mut png_data, canvas.width(), canvas.height());
            encoder.set_color(color);
            encoder.set_depth(depth);
            encoder.set_compression(self.compression);
            encoder.set_adaptive_filter(AdaptiveFilterType::Adaptive);

            for (key, text) in chunks.iter() {
                let added = if is_latin1(text) {
                    encoder.add_ztxt_chunk(key.to_string(), text.to_string())
                } else {
                    log::debug!("PNG: {key} is not Latin-1, storing as iTXt");
                    encoder.add_itxt_chunk(key.to_string(), text.to_string())
                };
                added.map_err(|err| ExportError::InvalidTextChunk {
                    key: key.to_string(),
                    reason: err.to_string(),
                })?;
            }

            let mut writer = encoder
                .write_header()
                .map_err(|err| ThumbError::EncoderInit(err.to_string()))?;
            writer
                .write_image_data(canvas.data())
                .map_err(|err| ExportError::EncodingFailed(format!("PNG write error: {err}")))?;
            writer
                .finish()
                .map_err(|err| ExportError::EncodingFailed(format!("PNG finish error: {err}")))?;
        } // writer and encoder are dropped here

        log::debug!(
            "PNG: encoded {}x{} with {} text chunk(s) into {} bytes",
            canvas.width(),
            canvas.height(),
            chunks.len(),
            png_data.len()
        );
        Ok(png_data)
    }
}

impl Default for PngExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, canvas: &Canvas, chunks: &TextChunks) -> Result<Vec<u8>> {
        self.encode(canvas, chunks)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}

/// Bytes per row the encoder will consume for this pixel format
fn row_bytes(color: ColorType, depth: BitDepth, width: u32) -> usize {
    let bits = color.samples() * depth as usize * width as usize;
    bits.div_ceil(8)
}

fn is_latin1(text: &str) -> bool {
    text.chars().all(|c| u32::from(c) <= 0xFF)
}

fn validate_keyword(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "keyword is empty"
    } else if key.chars().count() > MAX_KEYWORD_LEN {
        "keyword is longer than 79 characters"
    } else if !is_latin1(key) {
        "keyword is not Latin-1"
    } else if key.contains('\0') {
        "keyword contains NUL"
    } else {
        return Ok(());
    };

    Err(ExportError::InvalidTextChunk {
        key: key.to_string(),
        reason: reason.to_string(),
    }
    .into())
}

/// Collect every text chunk stored before the image data
///
/// Compressed Latin-1 chunks come first, then plain Latin-1, then UTF-8.
pub fn read_text_chunks(bytes: &[u8]) -> Result<TextChunks> {
    let reader = Decoder::new(bytes)
        .read_info()
        .map_err(|err| ExportError::EncodingFailed(format!("PNG decode error: {err}")))?;
    let info = reader.info();

    let mut chunks = TextChunks::new();
    for chunk in &info.compressed_latin1_text {
        let text = chunk.get_text().map_err(|err| ExportError::InvalidTextChunk {
            key: chunk.keyword.clone(),
            reason: err.to_string(),
        })?;
        chunks.insert(chunk.keyword.clone(), text);
    }
    for chunk in &info.uncompressed_latin1_text {
        chunks.insert(chunk.keyword.clone(), chunk.text.clone());
    }
    for chunk in &info.utf8_text {
        let text = chunk.get_text().map_err(|err| ExportError::InvalidTextChunk {
            key: chunk.keyword.clone(),
            reason: err.to_string(),
        })?;
        chunks.insert(chunk.keyword.clone(), text);
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

    fn checker() -> Canvas {
        let data = vec![
            255, 0, 0, 255, // Red
            0, 255, 0, 255, // Green
            0, 0, 255, 128, // Translucent blue
            0, 0, 0, 0, // Transparent
        ];
        Canvas::from_rgba(2, 2, data).unwrap()
    }

    #[test]
    fn test_png_exporter_creation() {
        let exporter = PngExporter::default();
        assert_eq!(exporter.name(), "png");
        assert_eq!(exporter.extension(), "png");
        assert_eq!(exporter.mime_type(), "image/png");
    }

    #[test]
    fn test_png_export_rgba() {
        let png_data = PngExporter::new()
            .export(&checker(), &TextChunks::new())
            .unwrap();
        assert_eq!(&png_data[0..8], &PNG_MAGIC);

        let mut reader = Decoder::new(png_data.as_slice()).read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (2, 2));
        assert_eq!(info.color_type, ColorType::Rgba);
        assert_eq!(info.bit_depth, BitDepth::Eight);
        assert_eq!(&buf[..info.buffer_size()], checker().data());
        assert!(!reader.info().interlaced);
    }

    #[test]
    fn chunks_survive_encoding() {
        let chunks: TextChunks = [("Thumb::URI", "file:///a.ttf"), ("Thumb::MTime", "42")]
            .into_iter()
            .collect();
        let png_data = PngExporter::new().encode(&checker(), &chunks).unwrap();

        let read = read_text_chunks(&png_data).unwrap();
        assert_eq!(read, chunks);
    }

    #[test]
    fn non_latin1_text_uses_itxt() {
        let chunks: TextChunks = [("Title", "Ελληνικά")].into_iter().collect();
        let png_data = PngExporter::new().encode(&checker(), &chunks).unwrap();

        let info = Decoder::new(png_data.as_slice()).read_info().unwrap();
        assert!(info.info().compressed_latin1_text.is_empty());
        assert_eq!(info.info().utf8_text.len(), 1);
        assert_eq!(read_text_chunks(&png_data).unwrap().get("Title"), Some("Ελληνικά"));
    }

    #[test]
    fn bad_keywords_are_rejected() {
        let long = "k".repeat(80);
        for key in ["", "Ключ", long.as_str()] {
            let chunks: TextChunks = [(key, "v")].into_iter().collect();
            let err = PngExporter::new().encode(&checker(), &chunks).unwrap_err();
            assert!(
                matches!(err, ThumbError::Export(ExportError::InvalidTextChunk { .. })),
                "{key:?}: {err:?}"
            );
        }
    }

    #[test]
    fn row_bytes_rounds_up() {
        assert_eq!(row_bytes(ColorType::Rgba, BitDepth::Eight, 3), 12);
        assert_eq!(row_bytes(ColorType::Grayscale, BitDepth::One, 9), 2);
    }

    #[test]
    fn garbage_is_not_a_png() {
        assert!(read_text_chunks(b"definitely not a png").is_err());
    }
}
