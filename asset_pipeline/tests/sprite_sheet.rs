// Packer behavior against real folders.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use asset_pipeline::sprite_sheet::{pack, SheetOptions, MANIFEST_FILE, SHEET_FILE};
use asset_pipeline::PipelineError;

/// Fresh per-test folder under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("asset_pipeline_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn ids(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn missing_source_fails_before_writing() {
    let dir = scratch_dir("missing");
    fs::write(dir.join("a.webp"), b"not decoded").unwrap();
    fs::write(dir.join("b.webp"), b"not decoded").unwrap();

    let required = ids(&["a", "b", "c"]);
    let err = pack(&dir, &SheetOptions::default(), Some(&required), false).unwrap_err();

    match err {
        PipelineError::MissingSources(missing) => assert_eq!(missing, vec!["c".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.join(SHEET_FILE).exists());
    assert!(!dir.join(MANIFEST_FILE).exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn dry_run_plans_without_writing() {
    let dir = scratch_dir("dry");
    for name in ["slime", "cultist", "sprite-sheet", "jawWorm"] {
        fs::write(dir.join(format!("{name}.webp")), b"x").unwrap();
    }
    fs::write(dir.join("notes.txt"), b"ignored").unwrap();

    let options = SheetOptions {
        cols: 2,
        cell_size: 64,
        ..Default::default()
    };
    let outcome = pack(&dir, &options, Some(&ids(&["cultist"])), true).unwrap();

    let entries = outcome.manifest.entries("enemies").unwrap();
    let order: Vec<_> = {
        let mut v: Vec<_> = entries.iter().map(|(id, e)| (e.index, id.as_str())).collect();
        v.sort();
        v.into_iter().map(|(_, id)| id).collect()
    };
    assert_eq!(order, ["cultist", "jawWorm", "slime"]);
    assert_eq!(outcome.manifest.rows, 2);
    assert!(outcome.sheet_bytes.is_none());
    assert!(!dir.join(MANIFEST_FILE).exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn oversized_grid_is_an_error_not_a_panic() {
    let dir = scratch_dir("oversized");
    fs::write(dir.join("a.webp"), b"x").unwrap();

    let options = SheetOptions {
        cols: 2_000_000,
        cell_size: 4096,
        ..Default::default()
    };
    for dry_run in [true, false] {
        let err = pack(&dir, &options, None, dry_run).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidLayout(_)), "{err}");
    }
    assert!(!dir.join(SHEET_FILE).exists());
    assert!(!dir.join(MANIFEST_FILE).exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[cfg(feature = "raster")]
#[test]
fn packs_sheet_and_manifest() {
    use image::{Rgba, RgbaImage};

    let dir = scratch_dir("pack");
    for (name, color) in [("a", [255, 0, 0, 255]), ("b", [0, 0, 255, 255])] {
        RgbaImage::from_pixel(32, 32, Rgba(color))
            .save(dir.join(format!("{name}.webp")))
            .unwrap();
    }

    let options = SheetOptions {
        cols: 2,
        cell_size: 16,
        ..Default::default()
    };
    let outcome = pack(&dir, &options, Some(&ids(&["a", "b"])), false).unwrap();
    assert!(outcome.sheet_bytes.unwrap() > 0);

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest["sheetWidth"], 32);
    assert_eq!(manifest["sheetHeight"], 16);
    assert_eq!(manifest["enemies"]["b"]["x"], 16);

    let sheet = image::open(dir.join(SHEET_FILE)).unwrap();
    assert_eq!((sheet.width(), sheet.height()), (32, 16));
    assert!(!dir.join(format!("{MANIFEST_FILE}.tmp")).exists());

    fs::remove_dir_all(&dir).unwrap();
}
