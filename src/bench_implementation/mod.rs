pub mod density_grid;
pub mod error;
pub mod forces_sweep;
pub mod heatmap;
pub mod parameters;
pub mod runner;
