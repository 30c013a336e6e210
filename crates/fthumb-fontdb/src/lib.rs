//! Where font files become typefaces
//!
//! [`FontEngine`] is the font-side entry point of a thumbnail run. It opens
//! a file, validates that it parses as a font with a character map and
//! outlines, and hands back a [`Typeface`] that owns the bytes.
//!
//! ## Memory Management
//!
//! A typeface stores its raw data and creates parsed views on demand. Those
//! views borrow from the typeface, so they can never outlive it, and dropping
//! the typeface releases everything at once.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use read_fonts::{types::Tag, FontRef as ReadFontRef, TableProvider};
use skrifa::{string::StringId, MetadataProvider};

use fthumb_core::{
    error::{Result, ThumbError},
    traits::FontRef as ThumbFontRef,
    types::GlyphId,
};

/// Maximum font file size (50MB) to prevent resource exhaustion.
pub const MAX_FONT_SIZE: u64 = 50 * 1024 * 1024;

/// Tables that carry glyph outlines we know how to draw
const OUTLINE_TABLES: [&[u8; 4]; 3] = [b"glyf", b"CFF ", b"CFF2"];

/// Opens font files under engine-wide limits
#[derive(Debug, Clone)]
pub struct FontEngine {
    max_font_size: u64,
}

impl FontEngine {
    /// Bring up the engine with the default size limit
    pub fn new() -> Result<Self> {
        Self::with_max_font_size(MAX_FONT_SIZE)
    }

    /// Bring up the engine with a custom size limit
    pub fn with_max_font_size(max_font_size: u64) -> Result<Self> {
        if max_font_size == 0 {
            return Err(ThumbError::EngineInit(
                "maximum font size must be greater than zero".into(),
            ));
        }
        Ok(Self { max_font_size })
    }

    pub fn max_font_size(&self) -> u64 {
        self.max_font_size
    }

    /// Opens one face of a font file
    ///
    /// Any failure (missing file, oversized file, unparsable data, missing
    /// face) is reported as [`ThumbError::FontOpen`] carrying only the path;
    /// the underlying cause is logged at debug level.
    pub fn open(&self, path: impl AsRef<Path>, face_index: u32) -> Result<Typeface> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| open_failed(path, e))?;
        if !metadata.is_file() {
            return Err(open_failed(path, "not a regular file"));
        }
        if metadata.len() > self.max_font_size {
            return Err(open_failed(
                path,
                format_args!(
                    "file is {} bytes, limit is {}",
                    metadata.len(),
                    self.max_font_size
                ),
            ));
        }
        let modified = metadata.modified().map_err(|e| open_failed(path, e))?;

        let data = fs::read(path).map_err(|e| open_failed(path, e))?;
        let typeface = Typeface::parse(path.to_path_buf(), data, face_index, modified)?;

        log::debug!(
            "Loaded {} (face {}, family {:?}, {} glyphs, {} upem)",
            path.display(),
            face_index,
            typeface.family_name(),
            typeface.glyph_count().unwrap_or(0),
            typeface.units_per_em
        );
        Ok(typeface)
    }
}

fn open_failed(path: &Path, reason: impl Display) -> ThumbError {
    log::debug!("Cannot open {}: {}", path.display(), reason);
    ThumbError::FontOpen {
        path: path.to_path_buf(),
    }
}

/// A font face that's been brought into memory, ready to measure and draw
pub struct Typeface {
    path: PathBuf,
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
    modified: SystemTime,
}

impl Typeface {
    /// Turns raw font bytes into a typeface that has no file behind it
    pub fn from_data(data: Vec<u8>, face_index: u32) -> Result<Self> {
        Self::parse(PathBuf::from("<memory>"), data, face_index, UNIX_EPOCH)
    }

    fn parse(path: PathBuf, data: Vec<u8>, face_index: u32, modified: SystemTime) -> Result<Self> {
        let units_per_em = {
            let font = ReadFontRef::from_index(&data, face_index)
                .map_err(|e| open_failed(&path, e))?;

            if let Err(e) = font.cmap() {
                return Err(open_failed(&path, format_args!("no usable cmap: {e}")));
            }
            let has_outlines = OUTLINE_TABLES
                .iter()
                .any(|tag| font.table_data(Tag::new(tag)).is_some());
            if !has_outlines {
                return Err(open_failed(&path, "no glyf, CFF or CFF2 outlines"));
            }

            font.head()
                .map(|head| head.units_per_em())
                .unwrap_or(1000)
        };

        Ok(Self {
            path,
            data,
            face_index,
            units_per_em,
            modified,
        })
    }

    /// Creates a FontRef on-demand for parsing operations
    fn font_ref(&self) -> Option<ReadFontRef<'_>> {
        ReadFontRef::from_index(&self.data, self.face_index).ok()
    }

    /// Where this typeface was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last modification time of the font file at load time
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Modification time as whole seconds since the Unix epoch
    pub fn mtime_unix(&self) -> i64 {
        unix_seconds(self.modified)
    }

    /// The family name from the `name` table, English when available
    pub fn family_name(&self) -> Option<String> {
        let font = skrifa::FontRef::from_index(&self.data, self.face_index).ok()?;
        font.localized_strings(StringId::FAMILY_NAME)
            .english_or_first()
            .map(|name| name.to_string())
    }

    /// Finds which glyph draws this character
    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.font_ref()
            .and_then(|font| font.cmap().ok()?.map_codepoint(ch).map(|gid| gid.to_u32()))
    }

    /// Horizontal advance in font units
    pub fn advance_width(&self, glyph_id: GlyphId) -> f32 {
        self.font_ref()
            .and_then(|font| {
                let hmtx = font.hmtx().ok()?;
                let glyph = read_fonts::types::GlyphId::new(glyph_id);
                hmtx.advance(glyph).map(f32::from)
            })
            .unwrap_or(0.0)
    }

    /// Counts how many different glyphs this font contains
    pub fn glyph_count(&self) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.maxp().ok().map(|maxp| maxp.num_glyphs() as u32))
    }
}

impl ThumbFontRef for Typeface {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.glyph_id(ch)
    }

    fn advance_width(&self, glyph_id: GlyphId) -> f32 {
        self.advance_width(glyph_id)
    }

    fn glyph_count(&self) -> Option<u32> {
        self.glyph_count()
    }
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface")
            .field("path", &self.path)
            .field("face_index", &self.face_index)
            .field("units_per_em", &self.units_per_em)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Whole seconds since the Unix epoch, rounding toward negative infinity
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => {
            let before = before.duration();
            let secs = before.as_secs() + u64::from(before.subsec_nanos() > 0);
            -(secs as i64)
        },
    }
}
