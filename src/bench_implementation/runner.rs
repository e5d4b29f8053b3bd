use super::error::{MolecError, Result};
use super::parameters::RunParameters;
use log::debug;
use ndarray::Array2;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Row indices of the timing array returned by [`Runner::run`]
pub const FORCE: usize = 0;
pub const INTEGRATOR: usize = 1;
pub const PERIODIC: usize = 2;
pub const SIMULATION: usize = 3;

/// Positions of the four timings in molec's tab separated output line.
pub const TIMING_FIELDS: [usize; 4] = [2, 4, 6, 8];

const VERBOSITY: u32 = 0;

/// Something that runs molec with a list of arguments and hands back its stdout.
pub trait Invoke {
    fn invoke(&mut self, args: &[String]) -> Result<String>;
}

/// Handle on a molec executable that is known to exist.
#[derive(Debug, Clone)]
pub struct Molec {
    path: PathBuf,
}

impl Molec {
    /// Resolve the executable, `build/molec` next to this crate when no path is given.
    pub fn locate(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(default_path);
        if !path.exists() {
            return Err(MolecError::ExecutableNotFound(path));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn default_path() -> PathBuf {
    let name = if cfg!(windows) { "molec.exe" } else { "molec" };
    Path::new(env!("CARGO_MANIFEST_DIR")).join("build").join(name)
}

impl Invoke for Molec {
    fn invoke(&mut self, args: &[String]) -> Result<String> {
        debug!("{} {}", self.path.display(), args.join(" "));

        // output() waits for the child on every path, including read errors
        let output = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| MolecError::Spawn {
                path: self.path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(MolecError::ProcessFailed {
                status: output.status.code(),
                args: args.to_vec(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extract force, integrator, periodic and simulation time from one line of molec output.
pub fn parse_timings(output: &str) -> Result<[u64; 4]> {
    let fields: Vec<&str> = output.split('\t').collect();
    let expected = TIMING_FIELDS[3] + 1;
    if fields.len() < expected {
        return Err(MolecError::MalformedOutput {
            expected,
            found: fields.len(),
            output: output.to_string(),
        });
    }

    let mut timings = [0u64; 4];
    for (timing, &field) in timings.iter_mut().zip(TIMING_FIELDS.iter()) {
        let value = fields[field].trim();
        *timing = value.parse().map_err(|source| MolecError::ParseTiming {
            field,
            value: value.to_string(),
            source,
        })?;
    }
    Ok(timings)
}

pub struct Runner {
    params: RunParameters,
}

impl Runner {
    pub fn new(params: RunParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RunParameters {
        &self.params
    }

    pub fn header(&self) -> String {
        format!(
            "force = {}, integrator = {}, periodic = {}",
            self.params.force, self.params.integrator, self.params.periodic
        )
    }

    pub fn args(&self, nb_particles: u64) -> Vec<String> {
        vec![
            format!("--N={}", nb_particles),
            format!("--step={}", self.params.steps),
            format!("--force={}", self.params.force),
            format!("--integrator={}", self.params.integrator),
            format!("--periodic={}", self.params.periodic),
            format!("--verbose={}", VERBOSITY),
        ]
    }

    /// Run molec found at `path` (or the default location) once per particle count.
    ///
    /// Fails before spawning anything if the executable does not exist.
    pub fn run(&self, path: Option<PathBuf>) -> Result<Array2<u64>> {
        let mut molec = Molec::locate(path)?;
        println!("Running molec: {}", molec.path().display());
        self.run_with(&mut molec)
    }

    /// Returns a (4, N) array, rows indexed by [`FORCE`], [`INTEGRATOR`], [`PERIODIC`]
    /// and [`SIMULATION`], one column per particle count.
    pub fn run_with<I: Invoke>(&self, molec: &mut I) -> Result<Array2<u64>> {
        let nb_points = self.params.particle_counts.len();
        let mut times = Array2::<u64>::zeros((4, nb_points));

        println!("{}", self.header());

        for (i, &nb_particles) in self.params.particle_counts.iter().enumerate() {
            let start = Instant::now();
            print!(" - N = {:>6} ...", nb_particles);
            // progress line is only complete after molec returns
            io::stdout().flush()?;

            let output = molec.invoke(&self.args(nb_particles))?;
            println!(" {:>20.6} s", start.elapsed().as_secs_f64());

            let timings = parse_timings(&output)?;
            for (row, &timing) in timings.iter().enumerate() {
                times[[row, i]] = timing;
            }
        }
        Ok(times)
    }
}
