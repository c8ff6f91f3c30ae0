// Grid sprite-sheet packer and its JSON manifest.
// Check all inputs, compose in memory, then write: a failed run leaves no partial output.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::compress::fit_cover;
use crate::error::{PipelineError, Result};
use crate::raster;

pub const SHEET_FILE: &str = "sprite-sheet.webp";
pub const MANIFEST_FILE: &str = "sprite-manifest.json";
const SPRITE_PREFIX: &str = "sprite-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOptions {
    pub cols: u32,
    pub cell_size: u32,
    pub quality: u8,
    /// Manifest key the entries are listed under (`enemies`, `cards`, ...).
    pub section: String,
}

impl Default for SheetOptions {
    fn default() -> Self {
        SheetOptions {
            cols: 6,
            cell_size: 512,
            quality: 80,
            section: "enemies".to_string(),
        }
    }
}

/// Cell of one sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteEntry {
    pub x: u32,
    pub y: u32,
    pub col: u32,
    pub row: u32,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteManifest {
    pub cell_size: u32,
    pub cols: u32,
    pub rows: u32,
    pub sheet_width: u32,
    pub sheet_height: u32,
    /// Section name → id → cell. A packed sheet has exactly one section.
    #[serde(flatten)]
    pub sections: BTreeMap<String, BTreeMap<String, SpriteEntry>>,
}

impl SpriteManifest {
    pub fn entries(&self, section: &str) -> Option<&BTreeMap<String, SpriteEntry>> {
        self.sections.get(section)
    }
}

/// A source image and the id it is packed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSource {
    pub id: String,
    pub path: PathBuf,
}

/// `*.webp` files in `dir` (excluding generated `sprite-*` files), sorted by id.
pub fn collect_sources(dir: &Path) -> Result<Vec<SpriteSource>> {
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;
    let mut sources = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PipelineError::io(dir, e))?.path();
        let is_webp = path.extension().map_or(false, |ext| ext == "webp");
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !path.is_file() || !is_webp || name.starts_with(SPRITE_PREFIX) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            sources.push(SpriteSource {
                id: stem.to_string(),
                path: path.clone(),
            });
        }
    }
    sources.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(sources)
}

/// Lay `ids` out row-major, in the given order. Fails when the sheet would
/// not fit `u32` pixel dimensions.
pub fn plan_sheet(ids: &[String], options: &SheetOptions) -> Result<SpriteManifest> {
    let cols = options.cols.max(1);
    let cell = options.cell_size;
    let count = u32::try_from(ids.len())
        .map_err(|_| PipelineError::InvalidLayout(format!("{} sprites is too many", ids.len())))?;
    let rows = count.div_ceil(cols);
    let too_large = |axis: &str, cells: u32| {
        PipelineError::InvalidLayout(format!("{cells} cells of {cell}px overflow the sheet {axis}"))
    };
    let sheet_width = cols.checked_mul(cell).ok_or_else(|| too_large("width", cols))?;
    let sheet_height = rows.checked_mul(cell).ok_or_else(|| too_large("height", rows))?;

    // Every cell lies inside the checked sheet bounds, so these cannot overflow.
    let entries = ids
        .iter()
        .zip(0u32..)
        .map(|(id, index)| {
            let col = index % cols;
            let row = index / cols;
            let entry = SpriteEntry {
                x: col * cell,
                y: row * cell,
                col,
                row,
                index: index as usize,
            };
            (id.clone(), entry)
        })
        .collect();

    Ok(SpriteManifest {
        cell_size: cell,
        cols,
        rows,
        sheet_width,
        sheet_height,
        sections: BTreeMap::from([(options.section.clone(), entries)]),
    })
}

/// Ids declared by a game-data file: an array of ids, an array of objects
/// with `id`, or an object keyed by id.
pub fn data_ids(json: &str) -> Result<BTreeSet<String>> {
    let value: Value = serde_json::from_str(json)?;
    let ids = match value {
        Value::Object(map) => map.into_iter().map(|(id, _)| id).collect(),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(id) => Ok(id),
                Value::Object(mut obj) => match obj.remove("id") {
                    Some(Value::String(id)) => Ok(id),
                    _ => Err(PipelineError::Catalog("data entry without a string `id`".to_string())),
                },
                other => Err(PipelineError::Catalog(format!("unexpected data entry: {other}"))),
            })
            .collect::<Result<_>>()?,
        other => {
            return Err(PipelineError::Catalog(format!(
                "game data must be an array or object, got {other}"
            )))
        }
    };
    Ok(ids)
}

pub fn load_data_ids(path: &Path) -> Result<BTreeSet<String>> {
    let json = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    data_ids(&json)
}

/// Data ids with no source image, sorted.
pub fn missing_sources(required: &BTreeSet<String>, sources: &[SpriteSource]) -> Vec<String> {
    let present: BTreeSet<&str> = sources.iter().map(|s| s.id.as_str()).collect();
    required
        .iter()
        .filter(|id| !present.contains(id.as_str()))
        .cloned()
        .collect()
}

/// Paste every source into its cell.
pub fn compose(sources: &[SpriteSource], manifest: &SpriteManifest, section: &str) -> Result<RgbaImage> {
    let mut sheet = RgbaImage::new(manifest.sheet_width, manifest.sheet_height);
    let cells = manifest.entries(section);
    for source in sources {
        let Some(entry) = cells.and_then(|c| c.get(&source.id)) else {
            continue;
        };
        let img = image::open(&source.path)?;
        let cell = fit_cover(&img, manifest.cell_size, manifest.cell_size);
        imageops::overlay(&mut sheet, &cell, i64::from(entry.x), i64::from(entry.y));
        debug!(id = %source.id, col = entry.col, row = entry.row, "placed sprite");
    }
    Ok(sheet)
}

/// `<name>.tmp` next to `path`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write every file to a staging name first, then rename them all into place.
/// A failed write removes what was staged and leaves the targets untouched.
pub(crate) fn write_staged(files: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for &(target, bytes) in files {
        let tmp = staging_path(target);
        if let Err(e) = fs::write(&tmp, bytes) {
            for (done, _) in &staged {
                let _ = fs::remove_file(done);
            }
            return Err(PipelineError::io(&tmp, e));
        }
        staged.push((tmp, target));
    }
    for (tmp, target) in staged {
        fs::rename(&tmp, target).map_err(|e| PipelineError::io(target, e))?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackOutcome {
    pub manifest: SpriteManifest,
    /// `None` on a dry run.
    pub sheet_bytes: Option<usize>,
    pub source_bytes: u64,
}

/// Pack `dir`'s sprites into `dir/sprite-sheet.webp` + `dir/sprite-manifest.json`.
///
/// With `required` ids, every one must have a source image, otherwise the
/// run fails with [`PipelineError::MissingSources`] and writes nothing.
pub fn pack(
    dir: &Path,
    options: &SheetOptions,
    required: Option<&BTreeSet<String>>,
    dry_run: bool,
) -> Result<PackOutcome> {
    let sources = collect_sources(dir)?;
    if let Some(required) = required {
        let missing = missing_sources(required, &sources);
        if !missing.is_empty() {
            return Err(PipelineError::MissingSources(missing));
        }
    }

    let ids: Vec<String> = sources.iter().map(|s| s.id.clone()).collect();
    let manifest = plan_sheet(&ids, options)?;
    let source_bytes = sources
        .iter()
        .map(|s| fs::metadata(&s.path).map(|m| m.len()).unwrap_or(0))
        .sum();

    if dry_run || sources.is_empty() {
        return Ok(PackOutcome {
            manifest,
            sheet_bytes: None,
            source_bytes,
        });
    }

    raster::ensure_available()?;
    let sheet = compose(&sources, &manifest, &options.section)?;
    let encoded = raster::encode_webp(&sheet, options.quality)?;
    let manifest_json = serde_json::to_string_pretty(&manifest)?;

    let sheet_path = dir.join(SHEET_FILE);
    let manifest_path = dir.join(MANIFEST_FILE);
    write_staged(&[
        (sheet_path.as_path(), encoded.as_slice()),
        (manifest_path.as_path(), manifest_json.as_bytes()),
    ])?;
    info!(
        sprites = sources.len(),
        bytes = encoded.len(),
        "wrote {} and {}",
        sheet_path.display(),
        manifest_path.display()
    );

    Ok(PackOutcome {
        manifest,
        sheet_bytes: Some(encoded.len()),
        source_bytes,
    })
}
