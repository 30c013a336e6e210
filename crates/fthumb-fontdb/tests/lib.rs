// this_file: crates/fthumb-fontdb/tests/lib.rs

use std::fs;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use fthumb_core::traits::FontRef;
use fthumb_core::ThumbError;
use fthumb_fontdb::{FontEngine, Typeface};

/// A real TrueType font: the repo's test-fonts first, then common system locations
fn test_font_path() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fonts/NotoSans-Regular.ttf"),
        PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
        PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"),
        PathBuf::from("/usr/share/fonts/dejavu/DejaVuSans.ttf"),
        PathBuf::from("/Library/Fonts/Arial.ttf"),
    ];
    candidates.into_iter().find(|p| p.exists())
}

fn temp_path(ext: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("fthumb_fontdb_{}_{}.{}", std::process::id(), id, ext))
}

#[test]
fn test_open_real_font_exposes_metrics() {
    let Some(path) = test_font_path() else {
        eprintln!("Skipping test: no test font available");
        return;
    };

    let engine = FontEngine::new().unwrap();
    let typeface = engine.open(&path, 0).expect("load test font");

    assert!(typeface.units_per_em() >= 16);
    assert!(typeface.glyph_count().unwrap_or(0) > 0);
    assert!(!typeface.data().is_empty());
    assert_eq!(typeface.path(), path.as_path());

    let a = typeface.glyph_id('A').expect("font should map 'A'");
    assert_ne!(a, 0);
    assert!(typeface.advance_width(a) > 0.0);
    assert!(typeface.family_name().is_some());
}

#[test]
fn test_mtime_matches_filesystem() {
    let Some(path) = test_font_path() else {
        eprintln!("Skipping test: no test font available");
        return;
    };

    let engine = FontEngine::new().unwrap();
    let typeface = engine.open(&path, 0).unwrap();
    let expected = fs::metadata(&path)
        .unwrap()
        .modified()
        .unwrap()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    assert_eq!(typeface.mtime_unix(), expected);
}

#[test]
fn test_missing_face_fails() {
    let Some(path) = test_font_path() else {
        eprintln!("Skipping test: no test font available");
        return;
    };

    // Single-face files only have face 0
    let err = FontEngine::new().unwrap().open(&path, 7).unwrap_err();
    assert!(matches!(err, ThumbError::FontOpen { .. }));
}

#[test]
fn test_corrupted_font_fails() {
    let path = temp_path("ttf");
    fs::write(&path, b"not a real font file").unwrap();

    let err = FontEngine::new().unwrap().open(&path, 0).unwrap_err();
    match err {
        ThumbError::FontOpen { path: reported } => assert_eq!(reported, path),
        other => panic!("expected FontOpen, got {other:?}"),
    }

    let _ = fs::remove_file(path);
}

#[test]
fn test_oversized_font_fails() {
    let Some(path) = test_font_path() else {
        eprintln!("Skipping test: no test font available");
        return;
    };

    let engine = FontEngine::with_max_font_size(16).unwrap();
    assert!(matches!(
        engine.open(&path, 0),
        Err(ThumbError::FontOpen { .. })
    ));
}

#[test]
fn test_from_data_matches_file() {
    let Some(path) = test_font_path() else {
        eprintln!("Skipping test: no test font available");
        return;
    };

    let bytes = fs::read(&path).unwrap();
    let from_data = Typeface::from_data(bytes, 0).unwrap();
    let from_file = FontEngine::new().unwrap().open(&path, 0).unwrap();

    assert_eq!(from_data.units_per_em(), from_file.units_per_em());
    assert_eq!(from_data.glyph_id('g'), from_file.glyph_id('g'));
    assert_eq!(from_data.mtime_unix(), 0);
}
