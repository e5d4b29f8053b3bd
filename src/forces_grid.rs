use clap::Parser;
use molec_bench::bench_implementation::density_grid::{load_or_measure, DEFAULT_CACHE_PATH};
use molec_bench::bench_implementation::heatmap::{plot_performance, HeatmapConfig, DEFAULT_OUTPUT_PATH};
use molec_bench::{Molec, Result, SweepConfig};
use std::path::PathBuf;
use std::process::ExitCode;

use mimalloc::MiMalloc;
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Measure force throughput over particle count and density and plot it as heatmap
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the molec executable [default: build/molec]
    #[arg(long)]
    molec: Option<PathBuf>,

    /// Measured grid, reused instead of running molec when it exists
    #[arg(long, default_value = DEFAULT_CACHE_PATH)]
    cache: PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
}

fn run(args: Args) -> Result<()> {
    let molec_path = args.molec;
    let grid = load_or_measure(&args.cache, &SweepConfig::density_grid(), || {
        let molec = Molec::locate(molec_path)?;
        println!("Running molec: {}", molec.path().display());
        Ok(molec)
    })?;

    plot_performance(&grid, &args.output, &HeatmapConfig::default())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            e.exit_code()
        }
    }
}
