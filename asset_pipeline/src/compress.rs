// Source art → WebP: cover/center resize to the folder's target size, then
// step quality down until the file fits the size budget.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::{debug, error, info};

use crate::catalog::AssetKind;
use crate::error::{PipelineError, Result};
use crate::raster;

pub const DEFAULT_QUALITY: u8 = 80;
pub const MAX_FILE_BYTES: usize = 100 * 1024;
pub const MIN_QUALITY: u8 = 30;
pub const QUALITY_STEP: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    pub quality: u8,
    pub dry_run: bool,
    pub force: bool,
    pub keep_originals: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions {
            quality: DEFAULT_QUALITY,
            dry_run: false,
            force: false,
            keep_originals: false,
        }
    }
}

/// Encoded bytes and the quality that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub quality: u8,
}

/// PNG or JPEG by extension, case-insensitive.
pub fn is_source_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
        .unwrap_or(false)
}

/// Scale to cover `width`×`height`, cropping the overflow around the center.
pub fn fit_cover(img: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    img.resize_to_fill(width, height, FilterType::Lanczos3)
        .to_rgba8()
}

/// Encode at `quality`; while the result exceeds `max_bytes` and quality is
/// still above the floor, retry 10 lower (never below the floor).
pub fn encode_within_budget<F>(
    img: &RgbaImage,
    quality: u8,
    max_bytes: usize,
    mut encode: F,
) -> Result<Encoded>
where
    F: FnMut(&RgbaImage, u8) -> Result<Vec<u8>>,
{
    let mut quality = quality;
    let mut bytes = encode(img, quality)?;
    while bytes.len() > max_bytes && quality > MIN_QUALITY {
        quality = quality.saturating_sub(QUALITY_STEP).max(MIN_QUALITY);
        debug!(quality, size = bytes.len(), "over budget, lowering quality");
        bytes = encode(img, quality)?;
    }
    Ok(Encoded { bytes, quality })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Output already exists and `force` is off.
    Skipped,
    DryRun { original_bytes: u64 },
    Converted {
        original_bytes: u64,
        new_bytes: u64,
        quality: u8,
        removed_original: bool,
    },
}

/// `<dir>/<stem>.webp` next to the source.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension("webp")
}

pub fn compress_file(input: &Path, size: u32, options: &CompressOptions) -> Result<FileOutcome> {
    let output = output_path(input);
    if !options.force && output.exists() {
        return Ok(FileOutcome::Skipped);
    }

    let original_bytes = fs::metadata(input)
        .map_err(|e| PipelineError::io(input, e))?
        .len();
    if options.dry_run {
        return Ok(FileOutcome::DryRun { original_bytes });
    }

    let source = image::open(input)?;
    let resized = fit_cover(&source, size, size);
    let encoded = encode_within_budget(&resized, options.quality, MAX_FILE_BYTES, raster::encode_webp)?;
    fs::write(&output, &encoded.bytes).map_err(|e| PipelineError::io(&output, e))?;

    let removed_original = !options.keep_originals;
    if removed_original {
        fs::remove_file(input).map_err(|e| PipelineError::io(input, e))?;
    }

    Ok(FileOutcome::Converted {
        original_bytes,
        new_bytes: encoded.bytes.len() as u64,
        quality: encoded.quality,
        removed_original,
    })
}

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: Vec<PathBuf>,
    pub original_bytes: u64,
    pub new_bytes: u64,
    /// Bytes freed by removing originals.
    pub saved_bytes: u64,
}

impl CompressReport {
    fn record(&mut self, outcome: &FileOutcome) {
        match *outcome {
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::DryRun { .. } => self.processed += 1,
            FileOutcome::Converted {
                original_bytes,
                new_bytes,
                removed_original,
                ..
            } => {
                self.processed += 1;
                self.original_bytes += original_bytes;
                self.new_bytes += new_bytes;
                if removed_original {
                    self.saved_bytes += original_bytes.saturating_sub(new_bytes);
                }
            }
        }
    }

    /// Percentage shrink across converted files.
    pub fn reduction_percent(&self) -> Option<f64> {
        (self.original_bytes > 0)
            .then(|| (1.0 - self.new_bytes as f64 / self.original_bytes as f64) * 100.0)
    }
}

/// Sorted PNG/JPEG files directly inside `dir`.
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PipelineError::io(dir, e))?.path();
        if path.is_file() && is_source_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Compress every source image in `<art_root>/<kind>/`. A failing file is
/// logged and counted; the run continues.
pub fn compress_kind(
    art_root: &Path,
    kind: AssetKind,
    options: &CompressOptions,
    report: &mut CompressReport,
) -> Result<()> {
    let dir = art_root.join(kind.dir_name());
    if !dir.is_dir() {
        info!("Skipping {} - directory not found: {}", kind.dir_name(), dir.display());
        return Ok(());
    }

    let files = source_files(&dir)?;
    if files.is_empty() {
        info!("No images found in {}/", kind.dir_name());
        return Ok(());
    }

    let size = kind.target_size();
    info!(
        "{} ({} images), target {size}x{size} @ quality {}",
        kind.dir_name().to_uppercase(),
        files.len(),
        options.quality
    );

    for file in files {
        let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        match compress_file(&file, size, options) {
            Ok(outcome) => {
                match &outcome {
                    FileOutcome::Skipped => debug!("{name}: output exists, skipping"),
                    FileOutcome::DryRun { original_bytes } => {
                        println!("  [DRY] {name} ({}) -> {}", kib(*original_bytes), webp_name(&file));
                    }
                    FileOutcome::Converted {
                        original_bytes,
                        new_bytes,
                        quality,
                        ..
                    } => {
                        let lowered = if *quality < options.quality {
                            format!(", q={quality}")
                        } else {
                            String::new()
                        };
                        println!(
                            "  {name} ({}) -> {} ({}{lowered})",
                            kib(*original_bytes),
                            webp_name(&file),
                            kib(*new_bytes)
                        );
                    }
                }
                report.record(&outcome);
            }
            Err(err) => {
                error!("processing {name}: {err}");
                report.failed.push(file);
            }
        }
    }
    Ok(())
}

fn webp_name(input: &Path) -> String {
    output_path(input)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn kib(bytes: u64) -> String {
    format!("{:.1}KB", bytes as f64 / 1024.0)
}
