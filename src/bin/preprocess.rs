//! Build the inputs of a flow-line experiment: geometries, plots and forcing files.
use clap::{Parser, ValueEnum};
use flowline::plot::Comparison;
use flowline::prelude::*;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// Prepare geometry, climate and ocean inputs for a flow-line run.
#[derive(Parser)]
#[command(name = "preprocess")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding bed.csv, thickness.csv and optionally precipitation.csv.
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory receiving the generated files.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Format of the generated data files.
    #[arg(short, long, default_value = "csv")]
    format: OutputFormat,

    /// Western end of the domain, m.
    #[arg(long, default_value = "-25000", allow_hyphen_values = true)]
    x_min: f64,

    /// Eastern end of the domain, m.
    #[arg(long, default_value = "175000")]
    x_max: f64,

    /// Grid spacing, m.
    #[arg(long, default_value = "500")]
    dx: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Comma-separated values.
    Csv,
    /// NetCDF, needs the netcdf feature.
    Nc,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => Format::Csv.extension(),
            OutputFormat::Nc => Format::Netcdf.extension(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let ext = cli.format.extension();
    let out = |name: &str| cli.output_dir.join(format!("{}.{}", name, ext));
    std::fs::create_dir_all(&cli.output_dir)?;

    let grid = Arc::new(grid(cli.x_min, cli.x_max, cli.dx)?);
    info!(
        "flow line grid: {} x {} points, dx = {} m, Lx = {} m, Ly = {} m, center ({}, {})",
        grid.mx(),
        grid.my(),
        grid.dx(),
        grid.lx(),
        grid.ly(),
        grid.x0(),
        grid.y0()
    );
    debug!("{:?} registration, {:?} periodic", grid.registration(), grid.periodicity());

    let real = real_geometry(
        &grid,
        cli.data_dir.join("bed.csv"),
        cli.data_dir.join("thickness.csv"),
    )?;
    let icy = (0..grid.mx())
        .filter_map(|i| real.cell(i, grid.center_row()))
        .filter(|c| *c == CellType::Grounded || *c == CellType::Floating)
        .count();
    info!("observed geometry: {} of {} columns covered by ice", icy, grid.mx());
    let synth = synthetic_geometry(&grid, &Bump::synthetic_bed(), &Bump::synthetic_surface())?;
    real.dump(out("real_geometry"))?;
    synth.dump(out("synth_geometry"))?;
    plot::geometry(&real, &synth, cli.output_dir.join("geometry.png"))?;

    let precip = ltop(&real, OrographicOptions::flowline_tuned())?;
    let comparison_path = cli.data_dir.join("precipitation.csv");
    let comparison = if comparison_path.exists() {
        Some(Comparison::read(&comparison_path, 35.0)?)
    } else {
        warn!("{} not found, plotting without comparison", comparison_path.display());
        None
    };
    plot::precipitation(
        grid.x(),
        &precip,
        real.ice_surface_elevation.center_row(),
        comparison.as_ref(),
        cli.output_dir.join("precipitation.png"),
    )?;

    let options = ForcingOptions::default();
    forcing::write_climate(&grid, &options, out("climate"))?;
    forcing::write_ocean(&grid, &options, out("ocean"))?;
    forcing::ice_extent_mask(&grid, &options).dump(out("ice_extent_mask"))?;
    forcing::precipitation_scaling(&grid, &options).dump(out("precipitation_scaling"))?;

    info!("done, outputs in {}", cli.output_dir.display());
    Ok(())
}
