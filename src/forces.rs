use clap::Parser;
use molec_bench::bench_implementation::forces_sweep::run_force_study;
use molec_bench::{Molec, Result, SweepConfig};
use std::path::PathBuf;
use std::process::ExitCode;

use mimalloc::MiMalloc;
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Compare the force routines of molec over 1e4 to 1e6 particles
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON file the force timings are written to
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Path to the molec executable [default: build/molec]
    #[arg(long)]
    molec: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let mut molec = Molec::locate(args.molec)?;
    println!("Running molec: {}", molec.path().display());

    let results = run_force_study(&SweepConfig::force_study(), &mut molec)?;

    println!("Saving performance data to {}", args.output.display());
    results.write_json(&args.output)
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
