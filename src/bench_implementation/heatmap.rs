//! Heatmap of a [`PerformanceGrid`] rendered with `plotters`.
//!
//! The color scale diverges from red over a light gray to green and is clipped
//! to `[vmin, vmax]`, values outside the range get the end colors.

use super::density_grid::PerformanceGrid;
use super::error::{MolecError, Result};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "forces-grid.svg";

const LOW: RGBColor = RGBColor(196, 78, 82);
const MID: RGBColor = RGBColor(242, 242, 242);
const HIGH: RGBColor = RGBColor(85, 168, 104);

#[derive(Clone, Debug)]
pub struct HeatmapConfig {
    /// Image width in pixels (default: 800)
    pub width: u32,

    /// Image height in pixels (default: 600)
    pub height: u32,

    pub xlabel: String,
    pub ylabel: String,

    /// Lower end of the color scale (default: 1.1)
    pub vmin: f64,

    /// Upper end of the color scale (default: 1.75)
    pub vmax: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            xlabel: "Number of particles".to_string(),
            ylabel: "Particle density".to_string(),
            vmin: 1.1,
            vmax: 1.75,
        }
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// Map `value` onto the diverging scale between `vmin` and `vmax`.
pub fn diverging_color(value: f64, vmin: f64, vmax: f64) -> RGBColor {
    let t = if vmax > vmin && value.is_finite() {
        ((value - vmin) / (vmax - vmin)).clamp(0.0, 1.0)
    } else if value == f64::INFINITY {
        1.0
    } else {
        0.0
    };

    let (from, to, t) = if t < 0.5 {
        (LOW, MID, 2.0 * t)
    } else {
        (MID, HIGH, 2.0 * t - 1.0)
    };
    RGBColor(
        lerp(from.0, to.0, t),
        lerp(from.1, to.1, t),
        lerp(from.2, to.2, t),
    )
}

/// Save the grid as heatmap, SVG for `.svg` paths and a bitmap otherwise.
pub fn plot_performance<P: AsRef<Path>>(grid: &PerformanceGrid, output_path: P, config: &HeatmapConfig) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("saving '{}'", output_path.display());

    let is_svg = output_path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(output_path, (config.width, config.height)).into_drawing_area();
        draw_on_area(&root, grid, config).map_err(|e| MolecError::Plot(e.to_string()))
    } else {
        let root = BitMapBackend::new(output_path, (config.width, config.height)).into_drawing_area();
        draw_on_area(&root, grid, config).map_err(|e| MolecError::Plot(e.to_string()))
    }
}

fn draw_on_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    grid: &PerformanceGrid,
    config: &HeatmapConfig,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let nb_rows = grid.performances.nrows() as i32;
    let nb_cols = grid.performances.ncols() as i32;
    let row_labels: Vec<String> = grid.row_densities().iter().map(|rho| format!("{:.2}", rho)).collect();
    let col_labels: Vec<String> = grid.particle_counts.iter().map(|n| n.to_string()).collect();

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((0..nb_cols).into_segmented(), (0..nb_rows).into_segmented())?;

    // grid row 0 is the top of the image, i.e. the largest y
    let to_y = |row: usize| nb_rows - 1 - row as i32;
    let cell = |row: usize, col: usize| {
        let (x, y) = (col as i32, to_y(row));
        [
            (SegmentValue::Exact(x), SegmentValue::Exact(y)),
            (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
        ]
    };

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(nb_cols as usize)
        .y_labels(nb_rows as usize)
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(col) => col_labels.get(*col as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|y| match y {
            SegmentValue::CenterOf(y) if (0..nb_rows).contains(y) => row_labels[to_y(*y as usize) as usize].clone(),
            _ => String::new(),
        })
        .x_desc(&config.xlabel)
        .y_desc(&config.ylabel)
        .draw()?;

    chart.draw_series(grid.performances.indexed_iter().map(|((row, col), &value)| {
        Rectangle::new(cell(row, col), diverging_color(value, config.vmin, config.vmax).filled())
    }))?;

    // cell borders
    chart.draw_series(
        grid.performances
            .indexed_iter()
            .map(|((row, col), _)| Rectangle::new(cell(row, col), WHITE.stroke_width(1))),
    )?;

    root.present()?;
    Ok(())
}
