// compress-images: resize source PNG/JPEG art and convert it to size-capped WebP.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use asset_pipeline::compress::{compress_kind, kib, CompressOptions, CompressReport, DEFAULT_QUALITY};
use asset_pipeline::{banner, init_logging, raster, AssetKind};
use clap::Parser;
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "compress-images", version, about = "Resize and convert game art to WebP")]
struct Args {
    /// Asset folder to process; all folders when omitted.
    #[arg(long = "type", value_enum)]
    kind: Option<AssetKind>,

    /// Starting WebP quality 1-100.
    #[arg(long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    #[arg(long, value_name = "DIR", default_value = "src/assets/art")]
    art_dir: PathBuf,

    /// Show what would be processed.
    #[arg(long)]
    dry_run: bool,

    /// Re-process even if the WebP already exists.
    #[arg(long)]
    force: bool,

    /// Keep the source files after conversion.
    #[arg(long)]
    keep_originals: bool,
}

fn main() -> ExitCode {
    init_logging();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    if !args.dry_run {
        raster::ensure_available()?;
    }

    let options = CompressOptions {
        quality: args.quality,
        dry_run: args.dry_run,
        force: args.force,
        keep_originals: args.keep_originals,
    };
    let kinds = match args.kind {
        Some(kind) => vec![kind],
        None => AssetKind::ALL.to_vec(),
    };

    println!("{}", banner("SPIRE ASCENT - IMAGE COMPRESSION PIPELINE"));
    println!(
        "Quality: {}  Force: {}  Keep originals: {}  Dry run: {}",
        options.quality, options.force, options.keep_originals, options.dry_run
    );

    let mut report = CompressReport::default();
    for kind in kinds {
        compress_kind(&args.art_dir, kind, &options, &mut report)?;
    }

    println!("\n{}", banner("COMPRESSION COMPLETE"));
    println!("Processed: {} images ({} skipped)", report.processed, report.skipped);
    if !options.dry_run {
        if let Some(reduction) = report.reduction_percent() {
            println!("Original total: {}", kib(report.original_bytes));
            println!("New total: {}", kib(report.new_bytes));
            println!("Space saved: {}", kib(report.saved_bytes));
            println!("Average reduction: {reduction:.0}%");
        }
    }
    if !report.failed.is_empty() {
        warn!("{} file(s) failed to convert", report.failed.len());
    }
    Ok(())
}
