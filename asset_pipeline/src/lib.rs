// asset_pipeline: offline art tooling for Spire Ascent.
// SVG template art, WebP compression, sprite sheets, placeholder checks and prompt catalogs.

pub mod catalog;
pub mod compress;
pub mod error;
pub mod prompts;
pub mod raster;
pub mod sprite_sheet;
pub mod svg;
pub mod validate;

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

pub use catalog::{art_catalog, ArtCatalog, ArtSet, AssetKind};
pub use error::{PipelineError, Result};

/// Install the fmt subscriber for a binary. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second install (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Write `bytes`, creating parent folders as needed.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| PipelineError::io(path, e))
}

/// Banner used by the binaries' stdout reports.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(60);
    format!("{rule}\n{title}\n{rule}")
}
