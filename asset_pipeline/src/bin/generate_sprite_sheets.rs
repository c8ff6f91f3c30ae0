// generate-sprite-sheets: pack a folder of WebP sprites into one sheet plus a JSON manifest.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use asset_pipeline::compress::kib;
use asset_pipeline::sprite_sheet::{load_data_ids, pack, SheetOptions, MANIFEST_FILE, SHEET_FILE};
use asset_pipeline::{banner, init_logging, raster, AssetKind, PipelineError};
use clap::Parser;
use tracing::error;

#[derive(Parser)]
#[command(name = "generate-sprite-sheets", version, about = "Bundle sprites into a sheet and manifest")]
struct Args {
    /// Asset folder, also the manifest section name.
    #[arg(long = "type", value_enum, default_value_t = AssetKind::Enemies)]
    kind: AssetKind,

    /// Columns in the grid.
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..))]
    cols: u32,

    /// Cell edge in pixels.
    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..=4096))]
    size: u32,

    /// WebP quality 1-100.
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Sprite folder; defaults to `src/assets/art/<type>`.
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Game data whose ids must all have a sprite.
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Print the layout without writing.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    init_logging();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(PipelineError::MissingSources(ids)) = err.downcast_ref::<PipelineError>() {
                eprintln!("Missing sprite images for {} id(s): {}", ids.len(), ids.join(", "));
                eprintln!("Nothing was written.");
            }
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    if !args.dry_run {
        raster::ensure_available()?;
    }

    let dir = args
        .dir
        .unwrap_or_else(|| PathBuf::from("src/assets/art").join(args.kind.dir_name()));
    let options = SheetOptions {
        cols: args.cols,
        cell_size: args.size,
        quality: args.quality,
        section: args.kind.dir_name().to_string(),
    };
    let required = args
        .data
        .as_deref()
        .map(load_data_ids)
        .transpose()
        .context("reading game data")?;

    println!("{}", banner("SPIRE ASCENT - SPRITE SHEET GENERATOR"));
    println!(
        "Folder: {}  Grid: {} columns, {}x{}px cells  Quality: {}",
        dir.display(),
        options.cols,
        options.cell_size,
        options.cell_size,
        options.quality
    );

    let outcome = pack(&dir, &options, required.as_ref(), args.dry_run)?;
    let manifest = &outcome.manifest;
    let entries = manifest.entries(&options.section);
    let count = entries.map_or(0, |e| e.len());
    if count == 0 {
        println!("No images found.");
        return Ok(());
    }

    println!(
        "Sheet dimensions: {}x{}px ({} rows)",
        manifest.sheet_width, manifest.sheet_height, manifest.rows
    );
    if let Some(entries) = entries {
        let mut ordered: Vec<_> = entries.iter().collect();
        ordered.sort_by_key(|(_, e)| e.index);
        for (id, e) in ordered {
            println!("  [{}] {id} -> col={}, row={} ({},{})", e.index, e.col, e.row, e.x, e.y);
        }
    }

    match outcome.sheet_bytes {
        None => {
            println!("\n[DRY RUN] Would generate:");
            println!("  {SHEET_FILE} ({}x{})", manifest.sheet_width, manifest.sheet_height);
            println!("  {MANIFEST_FILE} ({count} entries)");
        }
        Some(bytes) => {
            println!("Sprite sheet: {}", kib(bytes as u64));
            println!("Individual files total: {}", kib(outcome.source_bytes));
            println!("Reduction: {count} requests -> 1 request");
            println!("\n{}", banner("DONE"));
        }
    }
    Ok(())
}
