//! ReliefFill CLI - seeded altitude and basin fills on DEMs

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use relieffill_algorithms::fill::{
    altitude_fill, basin_fill, fill_union, AltitudeFillParams, BasinFillParams, FillDirection,
    FillMode, FillSummary,
};
use relieffill_core::io::{read_geotiff, write_geotiff, GeoTiffOptions};
use relieffill_core::{Connectivity, Raster};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "relieffill")]
#[command(author, version, about = "Seeded altitude and basin fills on DEMs", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Print the cell (row, col) containing a map coordinate
    Locate {
        /// Input DEM file
        input: PathBuf,
        /// X coordinate in the DEM's reference system
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        /// Y coordinate in the DEM's reference system
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
    /// Seeded fill algorithms
    Fill {
        #[command(subcommand)]
        algorithm: FillCommands,
    },
}

/// Seed cell, given either as map coordinates or as a grid index
#[derive(Args)]
struct SeedArgs {
    /// Seed X coordinate in the DEM's reference system
    #[arg(long, allow_hyphen_values = true, requires = "y", conflicts_with_all = ["row", "col"])]
    x: Option<f64>,
    /// Seed Y coordinate in the DEM's reference system
    #[arg(long, allow_hyphen_values = true, requires = "x")]
    y: Option<f64>,
    /// Seed row index
    #[arg(long, requires = "col")]
    row: Option<usize>,
    /// Seed column index
    #[arg(long, requires = "row")]
    col: Option<usize>,
}

/// Options shared by every fill
#[derive(Args)]
struct FillOptions {
    /// downstream (cells at or below) or upstream (cells at or above)
    #[arg(short, long, default_value = "downstream")]
    direction: String,
    /// Neighbour connectivity: 4 or 8
    #[arg(short, long, default_value = "8")]
    connectivity: String,
}

#[derive(Subcommand)]
enum FillCommands {
    /// All connected cells above or below a threshold elevation
    Altitude {
        /// Input DEM file
        input: PathBuf,
        /// Output mask file
        output: PathBuf,
        #[command(flatten)]
        seed: SeedArgs,
        #[command(flatten)]
        options: FillOptions,
        /// Reference elevation (defaults to the seed's elevation)
        #[arg(short, long, allow_hyphen_values = true)]
        threshold: Option<f64>,
    },
    /// Cells linked to the seed by continuously descending or ascending paths
    Basin {
        /// Input DEM file
        input: PathBuf,
        /// Output mask file
        output: PathBuf,
        #[command(flatten)]
        seed: SeedArgs,
        #[command(flatten)]
        options: FillOptions,
    },
    /// Union of fills from several seed cells
    Batch {
        /// Input DEM file
        input: PathBuf,
        /// Output mask file
        output: PathBuf,
        /// Seed cells as "row,col;row,col;..."
        #[arg(long)]
        seeds: String,
        /// Run basin fills instead of altitude fills
        #[arg(long, conflicts_with = "threshold")]
        basin: bool,
        #[command(flatten)]
        options: FillOptions,
        /// Reference elevation for altitude fills (defaults to each seed's elevation)
        #[arg(short, long, allow_hyphen_values = true)]
        threshold: Option<f64>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn read_dem(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<f64> = read_geotiff(path, None)
        .with_context(|| format!("Failed to read raster {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn write_mask(mask: &Raster<u8>, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(mask, path, Some(GeoTiffOptions::default()))
        .with_context(|| format!("Failed to write output {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &Path, mask: &Raster<u8>, elapsed: Duration) {
    let summary = FillSummary::from_mask(mask);
    println!("{} saved to: {}", name, path.display());
    println!("  Selected cells: {} ({:.2} map units²)", summary.cells, summary.area);
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_options(options: &FillOptions) -> Result<(FillDirection, Connectivity)> {
    let direction = options.direction.parse::<FillDirection>()?;
    let connectivity = options.connectivity.parse::<Connectivity>()?;
    Ok((direction, connectivity))
}

fn resolve_seed(dem: &Raster<f64>, seed: &SeedArgs) -> Result<(usize, usize)> {
    match (seed.x, seed.y, seed.row, seed.col) {
        (Some(x), Some(y), _, _) => {
            let cell = dem
                .locate(x, y)
                .with_context(|| format!("Seed ({}, {}) is not on the DEM", x, y))?;
            debug!("Seed ({}, {}) -> cell {:?}", x, y, cell);
            Ok(cell)
        }
        (_, _, Some(row), Some(col)) => Ok((row, col)),
        _ => anyhow::bail!("A seed is required: use --x/--y or --row/--col"),
    }
}

fn parse_seeds(s: &str) -> Result<Vec<(usize, usize)>> {
    s.split(';')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(',').collect();
            if parts.len() != 2 {
                anyhow::bail!("Seed must be 'row,col', got: {}", pair);
            }
            let row: usize = parts[0].trim().parse().context("Invalid row")?;
            let col: usize = parts[1].trim().parse().context("Invalid col")?;
            Ok((row, col))
        })
        .collect()
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => {
            let raster = read_dem(&input)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            if let Some(code) = raster.crs().and_then(|crs| crs.epsg()) {
                println!("CRS: EPSG:{}", code);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            if !raster.is_empty() {
                println!(
                    "  Valid cells: {} ({:.1}%)",
                    stats.valid_count,
                    100.0 * stats.valid_count as f64 / raster.len() as f64
                );
            }
        }

        Commands::Locate { input, x, y } => {
            let dem = read_dem(&input)?;
            let (row, col) = dem
                .locate(x, y)
                .with_context(|| format!("({}, {}) is not on the DEM", x, y))?;
            let z = dem.get(row, col)?;
            println!("Cell: row {}, col {}", row, col);
            if dem.is_nodata(z) {
                println!("Elevation: nodata");
            } else {
                println!("Elevation: {:.4}", z);
            }
        }

        Commands::Fill { algorithm } => match algorithm {
            FillCommands::Altitude {
                input,
                output,
                seed,
                options,
                threshold,
            } => {
                let (direction, connectivity) = parse_options(&options)?;
                let dem = read_dem(&input)?;
                let seed = resolve_seed(&dem, &seed)?;
                let start = Instant::now();
                let mask = altitude_fill(
                    &dem,
                    seed,
                    AltitudeFillParams {
                        direction,
                        connectivity,
                        threshold,
                    },
                )
                .context("Failed to run altitude fill")?;
                let elapsed = start.elapsed();
                write_mask(&mask, &output)?;
                done("Altitude fill", &output, &mask, elapsed);
            }

            FillCommands::Basin {
                input,
                output,
                seed,
                options,
            } => {
                let (direction, connectivity) = parse_options(&options)?;
                let dem = read_dem(&input)?;
                let seed = resolve_seed(&dem, &seed)?;
                let start = Instant::now();
                let mask = basin_fill(
                    &dem,
                    seed,
                    BasinFillParams {
                        direction,
                        connectivity,
                    },
                )
                .context("Failed to run basin fill")?;
                let elapsed = start.elapsed();
                write_mask(&mask, &output)?;
                done("Basin fill", &output, &mask, elapsed);
            }

            FillCommands::Batch {
                input,
                output,
                seeds,
                basin,
                options,
                threshold,
            } => {
                let seeds = parse_seeds(&seeds)?;
                if seeds.is_empty() {
                    anyhow::bail!("At least one seed is required");
                }
                let (direction, connectivity) = parse_options(&options)?;
                let mode = if basin {
                    FillMode::Basin(BasinFillParams {
                        direction,
                        connectivity,
                    })
                } else {
                    FillMode::Altitude(AltitudeFillParams {
                        direction,
                        connectivity,
                        threshold,
                    })
                };
                let dem = read_dem(&input)?;
                let start = Instant::now();
                let mask = fill_union(&dem, &seeds, mode).context("Failed to run batch fill")?;
                let elapsed = start.elapsed();
                write_mask(&mask, &output)?;
                done("Batch fill", &output, &mask, elapsed);
            }
        },
    }

    Ok(())
}
