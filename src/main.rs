use clap::Parser;
use molec_bench::{ForceVariant, RunParameters, Runner};
use std::path::PathBuf;
use std::process::ExitCode;

use mimalloc::MiMalloc;
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Run molec once per particle count and print the measured cycles
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the molec executable [default: build/molec]
    #[arg(long)]
    molec: Option<PathBuf>,

    /// Particle counts, one molec run each
    #[arg(short = 'N', long = "particles", value_delimiter = ',', default_value = "1000")]
    particle_counts: Vec<u64>,

    #[arg(long, default_value_t = 100)]
    steps: u64,

    #[arg(long, default_value = "N2")]
    force: ForceVariant,

    #[arg(long, default_value = "lf")]
    integrator: String,

    #[arg(long, default_value = "ref")]
    periodic: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let runner = Runner::new(RunParameters {
        particle_counts: args.particle_counts,
        steps: args.steps,
        force: args.force,
        integrator: args.integrator,
        periodic: args.periodic,
        ..RunParameters::default()
    });

    match runner.run(args.molec) {
        Ok(times) => {
            println!("{:>12}{:>16}{:>16}{:>16}{:>16}", "N", "force", "integrator", "periodic", "simulation");
            for (i, nb_particles) in runner.params().particle_counts.iter().enumerate() {
                let col = times.column(i);
                println!(
                    "{:>12}{:>16}{:>16}{:>16}{:>16}",
                    nb_particles, col[0], col[1], col[2], col[3]
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            e.exit_code()
        }
    }
}
