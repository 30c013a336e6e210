//! Export module for fthumb
//!
//! Turns a finished canvas into PNG bytes tagged with thumbnail metadata,
//! and gets those bytes onto disk.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use fthumb_core::{
    error::{Result, ThumbError},
    types::TextChunks,
};

pub mod png;

pub use crate::png::{read_text_chunks, PngExporter};

/// Key of the chunk holding the URI of the source font
pub const THUMB_URI: &str = "Thumb::URI";

/// Key of the chunk holding the source font's mtime in Unix seconds
pub const THUMB_MTIME: &str = "Thumb::MTime";

/// The metadata every thumbnail carries, in write order
///
/// A missing URI is recorded as an empty string rather than omitted.
pub fn thumbnail_chunks(uri: Option<&str>, mtime: i64) -> TextChunks {
    let mut chunks = TextChunks::new();
    chunks.insert(THUMB_URI, uri.unwrap_or_default());
    chunks.insert(THUMB_MTIME, mtime.to_string());
    chunks
}

/// Write encoded bytes to `path`, creating or truncating it
///
/// If the file was created but the write fails, the partial file is removed.
pub fn write_thumbnail(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|source| ThumbError::OutputOpen {
        path: path.to_path_buf(),
        source,
    })?;

    if let Err(err) = file.write_all(bytes).and_then(|()| file.flush()) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            log::warn!("Could not remove partial {}: {}", path.display(), cleanup);
        }
        return Err(err.into());
    }

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_have_fixed_order() {
        let chunks = thumbnail_chunks(Some("file:///fonts/a.ttf"), 1_700_000_000);
        let entries: Vec<_> = chunks.iter().collect();
        assert_eq!(
            entries,
            [
                (THUMB_URI, "file:///fonts/a.ttf"),
                (THUMB_MTIME, "1700000000")
            ]
        );
    }

    #[test]
    fn missing_uri_is_empty() {
        let chunks = thumbnail_chunks(None, -5);
        assert_eq!(chunks.get(THUMB_URI), Some(""));
        assert_eq!(chunks.get(THUMB_MTIME), Some("-5"));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join(format!("fthumb_no_such_dir_{}", std::process::id()))
            .join("out.png");
        let err = write_thumbnail(&path, b"data").unwrap_err();
        match err {
            ThumbError::OutputOpen { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected OutputOpen, got {other:?}"),
        }
        assert!(!path.exists());
    }
}
