use super::error::Result;
use super::parameters::SweepConfig;
use super::runner::{Invoke, Runner, FORCE};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Force computation times of every variant, keyed by molec's variant name.
///
/// Serialized flat, i.e. `{"N": [...], "rho": [...], "cell_ref": [...], ...}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForceResults {
    #[serde(rename = "N")]
    pub particle_counts: Vec<u64>,
    pub rho: Vec<f64>,
    #[serde(flatten)]
    pub forces: BTreeMap<String, Vec<u64>>,
}

impl ForceResults {
    pub fn write_json<P: AsRef<Path>>(&self, file_path: P) -> Result<()> {
        let file = fs::File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_json<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file = fs::File::open(file_path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Run molec for every force variant of `config` over its particle counts.
///
/// Only the first density of `config` is used. No caching, every call reruns the full study.
pub fn run_force_study<I: Invoke>(config: &SweepConfig, molec: &mut I) -> Result<ForceResults> {
    let density = config.densities.first().copied().unwrap_or(1.0);
    let mut results = ForceResults {
        particle_counts: config.particle_counts.clone(),
        rho: vec![density],
        forces: BTreeMap::new(),
    };

    for &force in &config.forces {
        info!("measuring force variant {}", force);
        let runner = Runner::new(config.run_parameters(force, density));
        let times = runner.run_with(molec)?;
        results
            .forces
            .insert(force.to_string(), times.row(FORCE).to_vec());
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench_implementation::error::MolecError;
    use crate::bench_implementation::parameters::ForceVariant;

    /// Reports the particle count times the variant index as force time.
    struct ScaledByVariant;

    impl Invoke for ScaledByVariant {
        fn invoke(&mut self, args: &[String]) -> Result<String> {
            let n: u64 = args[0].trim_start_matches("--N=").parse().unwrap();
            let force: ForceVariant = args[2].trim_start_matches("--force=").parse().unwrap();
            let scale = ForceVariant::ALL.iter().position(|&f| f == force).unwrap() as u64;
            Ok(format!("0\t0\t{}\t0\t1\t0\t2\t0\t3\n", n * scale))
        }
    }

    fn small_config() -> SweepConfig {
        SweepConfig {
            particle_counts: vec![100, 200, 300],
            ..SweepConfig::force_study()
        }
    }

    #[test]
    fn test_force_study_collects_force_row_per_variant() {
        let results = run_force_study(&small_config(), &mut ScaledByVariant).unwrap();

        assert_eq!(results.particle_counts, vec![100, 200, 300]);
        assert_eq!(results.rho, vec![10.0]);
        assert_eq!(results.forces.len(), 4);
        // cell_ref is index 1 in ForceVariant::ALL, q_g_avx index 5
        assert_eq!(results.forces["cell_ref"], vec![100, 200, 300]);
        assert_eq!(results.forces["q_g_avx"], vec![500, 1000, 1500]);
    }

    #[test]
    fn test_force_study_stops_on_failure() {
        struct Failing;
        impl Invoke for Failing {
            fn invoke(&mut self, args: &[String]) -> Result<String> {
                Err(MolecError::ProcessFailed {
                    status: Some(1),
                    args: args.to_vec(),
                })
            }
        }
        let result = run_force_study(&small_config(), &mut Failing);
        assert!(matches!(result, Err(MolecError::ProcessFailed { .. })));
    }

    #[test]
    fn test_json_layout_is_flat() {
        let results = run_force_study(&small_config(), &mut ScaledByVariant).unwrap();
        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(value["N"], serde_json::json!([100, 200, 300]));
        assert_eq!(value["rho"], serde_json::json!([10.0]));
        assert_eq!(value["q"], serde_json::json!([300, 600, 900]));
    }

    #[test]
    fn test_write_read_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forces.json");

        let results = run_force_study(&small_config(), &mut ScaledByVariant).unwrap();
        results.write_json(&path).unwrap();
        let results_read = ForceResults::read_json(&path).unwrap();

        assert_eq!(results, results_read);
    }
}
