use super::error::Result;
use super::parameters::SweepConfig;
use super::runner::{Invoke, Runner, FORCE};
use itertools::iproduct;
use log::{info, warn};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const DEFAULT_CACHE_PATH: &str = "performances-grid-forces-density.bin";

/// flops of one pair interaction within the cutoff
const FLOPS_PER_INTERACTION: f64 = 18.0 * PI + 283.5;

/// Throughput of the force routine, rows are densities, columns particle counts.
///
/// Row `r` holds `densities[densities.len() - 1 - r]`, so for ascending densities
/// the densest configuration ends up in row 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceGrid {
    pub particle_counts: Vec<u64>,
    pub densities: Vec<f64>,
    pub performances: Array2<f64>,
}

impl PerformanceGrid {
    fn row_of_density(&self, density_idx: usize) -> usize {
        self.densities.len() - 1 - density_idx
    }

    /// Density belonging to each row, top to bottom.
    pub fn row_densities(&self) -> Vec<f64> {
        self.densities.iter().rev().copied().collect()
    }

    pub fn save<P: AsRef<Path>>(&self, file_path: P) -> Result<()> {
        let file = fs::File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file = fs::File::open(file_path)?;
        Ok(bincode::deserialize_from(BufReader::new(file))?)
    }
}

/// Estimated flops of one force evaluation for every particle count.
pub fn estimate_flops(particle_counts: &[u64], cutoff: f64, density: f64) -> Array1<f64> {
    Array1::from_iter(particle_counts.iter().map(|&n| {
        n as f64 * cutoff.powi(3) * density * FLOPS_PER_INTERACTION
    }))
}

/// Return the grid cached at `cache_path`, or measure it and write the cache.
///
/// `connect` is only called when there is no cache, so a cached grid can be
/// loaded without a molec executable around.
pub fn load_or_measure<I, F>(cache_path: &Path, config: &SweepConfig, connect: F) -> Result<PerformanceGrid>
where
    I: Invoke,
    F: FnOnce() -> Result<I>,
{
    if cache_path.is_file() {
        info!("Loading data from <{}>", cache_path.display());
        let grid = PerformanceGrid::load(cache_path)?;
        if grid.particle_counts != config.particle_counts || grid.densities != config.densities {
            warn!(
                "cached grid in {} was measured for different parameters, delete it to remeasure",
                cache_path.display()
            );
        }
        return Ok(grid);
    }

    let mut molec = connect()?;
    let grid = measure(config, &mut molec)?;

    info!("Saving performance data to <{}>", cache_path.display());
    grid.save(cache_path)?;
    Ok(grid)
}

pub fn measure<I: Invoke>(config: &SweepConfig, molec: &mut I) -> Result<PerformanceGrid> {
    let mut grid = PerformanceGrid {
        particle_counts: config.particle_counts.clone(),
        densities: config.densities.clone(),
        performances: Array2::zeros((config.densities.len(), config.particle_counts.len())),
    };

    // Later force variants overwrite earlier ones, the grid only holds one variant.
    for (&force, (density_idx, &density)) in iproduct!(config.forces.iter(), config.densities.iter().enumerate()) {
        let flops = estimate_flops(&config.particle_counts, config.cutoff, density);

        let runner = Runner::new(config.run_parameters(force, density));
        let times = runner.run_with(molec)?;

        let force_times = times.row(FORCE).mapv(|t| t as f64);
        if force_times.iter().any(|&t| t == 0.0) {
            warn!("molec reported a zero force time for {} at density {}", force, density);
        }

        let row = grid.row_of_density(density_idx);
        grid.performances.row_mut(row).assign(&(&flops / &force_times));
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench_implementation::error::MolecError;
    use googletest::{matchers::near, verify_that};

    /// Force time equal to the particle count, every call is counted.
    #[derive(Default)]
    struct CountingMolec {
        nb_calls: usize,
    }

    impl Invoke for CountingMolec {
        fn invoke(&mut self, args: &[String]) -> Result<String> {
            self.nb_calls += 1;
            let n = args[0].trim_start_matches("--N=");
            Ok(format!("-\t-\t{}\t-\t1\t-\t1\t-\t{}\n", n, n))
        }
    }

    fn small_config() -> SweepConfig {
        SweepConfig {
            particle_counts: vec![10, 20],
            ..SweepConfig::density_grid()
        }
    }

    #[test]
    fn test_estimate_flops() {
        let flops = estimate_flops(&[1000], 2.5, 0.5);
        let expected = 1000.0 * 15.625 * 0.5 * (18.0 * PI + 283.5);
        verify_that!(flops[0], near(expected, 1e-6)).unwrap_or_else(|e| panic!("{}", e));
    }

    #[test]
    fn test_rows_are_reversed_densities() {
        let mut molec = CountingMolec::default();
        let grid = measure(&small_config(), &mut molec).unwrap();

        assert_eq!(grid.performances.shape(), &[3, 2]);
        assert_eq!(molec.nb_calls, 6);
        assert_eq!(grid.row_densities(), vec![1.5, 1.0, 0.5]);

        // force time == N, so throughput only depends on density
        let per_density = |rho: f64| 2.5f64.powi(3) * rho * FLOPS_PER_INTERACTION;
        for col in 0..2 {
            verify_that!(grid.performances[[0, col]], near(per_density(1.5), 1e-9))
                .unwrap_or_else(|e| panic!("{}", e));
            verify_that!(grid.performances[[2, col]], near(per_density(0.5), 1e-9))
                .unwrap_or_else(|e| panic!("{}", e));
        }
    }

    #[test]
    fn test_measure_writes_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("grid.bin");

        let grid = load_or_measure(&cache_path, &small_config(), || Ok(CountingMolec::default())).unwrap();
        assert!(cache_path.is_file());
        assert_eq!(PerformanceGrid::load(&cache_path).unwrap(), grid);
    }

    #[test]
    fn test_cached_grid_skips_molec() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("grid.bin");
        let cached = PerformanceGrid {
            particle_counts: vec![10, 20],
            densities: vec![0.5, 1.0, 1.5],
            performances: Array2::from_shape_vec((3, 2), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap(),
        };
        cached.save(&cache_path).unwrap();

        let grid = load_or_measure(&cache_path, &small_config(), || -> Result<CountingMolec> {
            panic!("molec must not be started when a cache exists")
        })
        .unwrap();
        assert_eq!(grid, cached);
    }

    #[test]
    fn test_missing_molec_without_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("grid.bin");

        let result = load_or_measure(&cache_path, &small_config(), || -> Result<CountingMolec> {
            Err(MolecError::ExecutableNotFound("build/molec".into()))
        });
        assert!(matches!(result, Err(MolecError::ExecutableNotFound(_))));
        assert!(!cache_path.exists());
    }
}
