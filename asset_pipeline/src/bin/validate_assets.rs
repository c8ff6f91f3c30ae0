// validate-assets: fail the build when too many shipped images are placeholders.

use std::path::PathBuf;
use std::process::ExitCode;

use asset_pipeline::init_logging;
use asset_pipeline::validate::{validate, Verdict};
use clap::Parser;
use tracing::debug;

#[derive(Parser)]
#[command(name = "validate-assets", version, about = "Report the placeholder rate of game art")]
struct Args {
    /// Root holding `cards/`, `enemies/` and `relics/`.
    #[arg(long, value_name = "DIR", default_value = "public/images")]
    root: PathBuf,
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    debug!("scanning {}", args.root.display());

    let report = validate(&args.root);
    println!("{}", report.render());

    match report.verdict() {
        Verdict::Fail => ExitCode::FAILURE,
        Verdict::Warn | Verdict::Pass => ExitCode::SUCCESS,
    }
}
