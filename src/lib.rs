//! Benchmark sweeps for the molec molecular dynamics executable.
//!
//! molec is driven through its command line, one process per particle count,
//! and reports its cycle counts as a tab separated line. The drivers in
//! [`bench_implementation`] aggregate those timings over force variants,
//! particle counts and densities.

pub mod bench_implementation;

pub use bench_implementation::error::{MolecError, Result};
pub use bench_implementation::parameters::{ForceVariant, RunParameters, SweepConfig};
pub use bench_implementation::runner::{Invoke, Molec, Runner};
