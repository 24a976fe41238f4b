//! Render a gif of surface and bed profiles from a PISM spatial output file.
use clap::Parser;
use flowline::animate::{animate, AnimationOptions, NetcdfHistory};
use std::path::PathBuf;

/// Animate flow-line profiles over time.
#[derive(Parser)]
#[command(name = "animate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Spatial output file with usurf and topg shaped (time, y, x).
    file: PathBuf,

    /// Output gif.
    outfile: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let history = NetcdfHistory::open(&cli.file)?;
    animate(&history, &AnimationOptions::default(), &cli.outfile)
}
