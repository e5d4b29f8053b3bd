use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Force computation routines compiled into molec, selected with `--force=<name>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ForceVariant {
    /// Plain N^2 summation
    #[serde(rename = "N2")]
    N2,
    /// Reference cell list
    #[serde(rename = "cell_ref")]
    CellRef,
    #[serde(rename = "cell_v2")]
    CellV2,
    /// Cell list with quadrant interactions
    #[serde(rename = "q")]
    Quadrant,
    /// Quadrant with ghost cells
    #[serde(rename = "q_g")]
    QuadrantGhost,
    /// Quadrant with ghost cells, AVX vectorized
    #[serde(rename = "q_g_avx")]
    QuadrantGhostAvx,
}

impl ForceVariant {
    pub const ALL: [ForceVariant; 6] = [
        ForceVariant::N2,
        ForceVariant::CellRef,
        ForceVariant::CellV2,
        ForceVariant::Quadrant,
        ForceVariant::QuadrantGhost,
        ForceVariant::QuadrantGhostAvx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForceVariant::N2 => "N2",
            ForceVariant::CellRef => "cell_ref",
            ForceVariant::CellV2 => "cell_v2",
            ForceVariant::Quadrant => "q",
            ForceVariant::QuadrantGhost => "q_g",
            ForceVariant::QuadrantGhostAvx => "q_g_avx",
        }
    }
}

impl fmt::Display for ForceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForceVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForceVariant::ALL
            .iter()
            .find(|variant| variant.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown force variant: {s}"))
    }
}

/// Everything needed to invoke molec once per particle count.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub particle_counts: Vec<u64>,
    pub steps: u64,
    pub force: ForceVariant,
    pub integrator: String,
    pub periodic: String,
    /// Particle density. Only used to estimate flops, molec is not told about it.
    pub density: f64,
    pub cutoff: f64,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            particle_counts: vec![1000],
            steps: 100,
            force: ForceVariant::N2,
            integrator: "lf".to_string(),
            periodic: "ref".to_string(),
            density: 1.0,
            cutoff: 2.5,
        }
    }
}

/// Parameters shared by every point of a sweep.
///
/// `forces` and `densities` are the swept dimensions in addition to
/// `particle_counts`. The presets below carry the values used for the
/// published studies.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub particle_counts: Vec<u64>,
    pub steps: u64,
    pub forces: Vec<ForceVariant>,
    pub densities: Vec<f64>,
    pub cutoff: f64,
    pub integrator: String,
    pub periodic: String,
}

impl SweepConfig {
    /// Force variant comparison: 10 particle counts from 1e4 to 1e6, 20 steps,
    /// density 10.
    pub fn force_study() -> Self {
        Self {
            particle_counts: logspace_counts(4.0, 6.0, 10),
            steps: 20,
            forces: vec![
                ForceVariant::CellRef,
                ForceVariant::Quadrant,
                ForceVariant::QuadrantGhost,
                ForceVariant::QuadrantGhostAvx,
            ],
            densities: vec![10.0],
            cutoff: 2.5,
            integrator: "lf".to_string(),
            periodic: "ref".to_string(),
        }
    }

    /// Density/particle count grid for `cell_v2` with the c4 periodic routine.
    pub fn density_grid() -> Self {
        Self {
            particle_counts: vec![10000, 20000],
            steps: 20,
            forces: vec![ForceVariant::CellV2],
            densities: vec![0.5, 1.0, 1.5],
            cutoff: 2.5,
            integrator: "lf".to_string(),
            periodic: "c4".to_string(),
        }
    }

    pub fn run_parameters(&self, force: ForceVariant, density: f64) -> RunParameters {
        RunParameters {
            particle_counts: self.particle_counts.clone(),
            steps: self.steps,
            force,
            integrator: self.integrator.clone(),
            periodic: self.periodic.clone(),
            density,
            cutoff: self.cutoff,
        }
    }
}

/// `nb_points` values spaced evenly on a log10 scale from 10^start to 10^stop,
/// truncated to integers.
pub fn logspace_counts(start: f64, stop: f64, nb_points: usize) -> Vec<u64> {
    // powf may land just below an exact power of ten, e.g. 999999.9999999998
    Array1::logspace(10.0, start, stop, nb_points)
        .mapv(|n| (n * (1.0 + 1e-12)).floor() as u64)
        .to_vec()
}
