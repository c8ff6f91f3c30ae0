// art-prompts: list, export and audit the art prompt catalog.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use asset_pipeline::prompts::{prompt_catalog, PromptKind};
use asset_pipeline::{init_logging, write_output};
use clap::{Parser, Subcommand};
use tracing::error;

#[derive(Parser)]
#[command(name = "art-prompts", version, about = "Art prompt catalog utility")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all card art prompts.
    ListCards,
    /// List all enemy art prompts.
    ListEnemies,
    /// List all relic art prompts.
    ListRelics,
    /// Export every prompt to a markdown guide.
    ExportAll {
        #[arg(long, value_name = "PATH", default_value = "src/assets/art/PROMPTS.md")]
        out: PathBuf,
    },
    /// Export prompts in a plain batch format.
    ExportBatch {
        #[arg(long, value_name = "PATH", default_value = "src/assets/art/BATCH_PROMPTS.txt")]
        out: PathBuf,
    },
    /// Check which catalog ids have no image yet.
    CheckMissing {
        #[arg(long, value_name = "DIR", default_value = "src/assets/art")]
        art_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    init_logging();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let catalog = prompt_catalog()?;
    match cli.command {
        Command::ListCards => print!("{}", catalog.render_list(PromptKind::Card)),
        Command::ListEnemies => print!("{}", catalog.render_list(PromptKind::Enemy)),
        Command::ListRelics => print!("{}", catalog.render_list(PromptKind::Relic)),
        Command::ExportAll { out } => {
            write_output(&out, catalog.export_markdown().as_bytes())?;
            println!("Prompts exported to: {}", out.display());
        }
        Command::ExportBatch { out } => {
            write_output(&out, catalog.export_batch().as_bytes())?;
            println!("Batch prompts exported to: {}", out.display());
        }
        Command::CheckMissing { art_dir } => {
            for kind in PromptKind::ALL {
                let report = catalog.check_missing(kind, &art_dir);
                let dir = kind.dir_name();
                match report.missing {
                    None => {
                        println!("\nDirectory missing: {}", art_dir.join(dir).display());
                        println!("Missing all {} {dir} images", report.total);
                    }
                    Some(missing) => {
                        println!("\n=== {} ===", dir.to_uppercase());
                        println!("Total: {}", report.total);
                        println!("Existing: {}", report.total - missing.len());
                        println!("Missing: {}", missing.len());
                        if !missing.is_empty() && missing.len() <= 20 {
                            println!("Missing: {}", missing.join(", "));
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
