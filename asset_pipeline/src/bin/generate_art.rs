// generate-art: render the template catalog (orbs, stances, enemy portraits) to WebP.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use asset_pipeline::svg::render_jobs;
use asset_pipeline::{art_catalog, banner, init_logging, raster, write_output, ArtSet};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "generate-art", version, about = "Render SVG template art to WebP")]
struct Args {
    /// Template group to render.
    #[arg(long = "type", value_enum, default_value_t = ArtSet::All)]
    kind: ArtSet,

    /// WebP quality 1-100.
    #[arg(long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Art root; images land in `<out>/<group>/<id>.webp`.
    #[arg(long, value_name = "DIR", default_value = "src/assets/art")]
    out: PathBuf,

    /// List what would be generated without writing.
    #[arg(long)]
    dry_run: bool,

    /// Overwrite existing images.
    #[arg(long)]
    force: bool,

    /// Also write the SVG source next to each image.
    #[arg(long)]
    svg: bool,
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

    let catalog = art_catalog()?;
    let jobs = render_jobs(catalog, args.kind);
    println!("{}", banner("SPIRE ASCENT - TEMPLATE ART GENERATOR"));
    println!("Images: {}  Quality: {}  Output: {}", jobs.len(), args.quality, args.out.display());

    let mut generated = 0;
    let mut skipped = 0;
    for job in &jobs {
        let target = args.out.join(job.group).join(format!("{}.webp", job.id));
        if target.exists() && !args.force {
            info!("{} exists, skipping (use --force to overwrite)", target.display());
            skipped += 1;
            continue;
        }
        if args.dry_run {
            println!("  [DRY] {}/{}.webp ({}x{})", job.group, job.id, job.size, job.size);
            continue;
        }

        let pixels = raster::render_svg(&job.svg, job.size)
            .with_context(|| format!("rendering {}/{}", job.group, job.id))?;
        let bytes = raster::encode_webp(&pixels, args.quality)?;
        write_output(&target, &bytes)?;
        if args.svg {
            write_output(&target.with_extension("svg"), job.svg.as_bytes())?;
        }
        println!(
            "  Generated: {}/{}.webp ({:.1}KB)",
            job.group,
            job.id,
            bytes.len() as f64 / 1024.0
        );
        generated += 1;
    }

    println!("\nDone! {generated} generated, {skipped} skipped.");
    if generated > 0 && args.kind.includes(ArtSet::Enemies) {
        println!("Next: run `generate-sprite-sheets --type=enemies` to rebuild the enemy sheet.");
    }
    Ok(())
}
