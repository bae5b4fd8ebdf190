//! Heatmap/contour projections over two explored variables
//!
//! A completed sweep or contour run yields KPI samples over a rectangular
//! grid. This module pivots those samples into a renderable structure (axis
//! values, a z matrix with `None` for unsampled cells, the located optimum),
//! builds the color scale for the matrix, and maps the reported optimum back
//! to grid coordinates.

use serde::{Deserialize, Serialize};

use crate::model::{GridSearchResultItem, TargetKpi};

/// Absolute tolerance when matching the reported optimum against axis
/// values, absorbing float round-trip noise through the wire format.
pub const OPTIMUM_TOLERANCE: f64 = 1e-3;

/// Number of evenly spaced contour levels derived from observed values.
const CONTOUR_LEVELS: usize = 10;

/// The optimum cell as reported by the worker. Always an actual sample,
/// never an interpolated point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A 2-D projection of KPI outcomes over two variables.
///
/// Shape invariant: `z_matrix.len() == y_values.len()` and every row has
/// `x_values.len()` entries; both axes are strictly increasing. `None` cells
/// were not sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGrid {
    pub x_variable: String,
    pub y_variable: String,
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub z_matrix: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    pub optimal_point: Option<OptimalPoint>,
    #[serde(default)]
    pub contour_levels: Vec<f64>,
}

impl HeatmapGrid {
    /// Pivot a result list into a grid over `x_variable` and `y_variable`.
    ///
    /// Results missing either variable are skipped; returns `None` when
    /// nothing remains (the shape invariant requires at least one sample on
    /// each axis). Cells absent from `results` stay `None`, so sparse result
    /// sets project cleanly.
    pub fn from_results(
        results: &[GridSearchResultItem],
        x_variable: &str,
        y_variable: &str,
        kpi: TargetKpi,
    ) -> Option<Self> {
        let samples: Vec<(f64, f64, f64)> = results
            .iter()
            .filter_map(|item| {
                let x = *item.combination.get(x_variable)?;
                let y = *item.combination.get(y_variable)?;
                Some((x, y, kpi.value_of(item)))
            })
            .collect();
        if samples.is_empty() {
            return None;
        }

        let x_values = sorted_unique(samples.iter().map(|&(x, _, _)| x));
        let y_values = sorted_unique(samples.iter().map(|&(_, y, _)| y));

        let mut z_matrix = vec![vec![None; x_values.len()]; y_values.len()];
        let mut optimal: Option<OptimalPoint> = None;
        for &(x, y, z) in &samples {
            // both axes were seeded from these exact coordinates
            let col = x_values.iter().position(|&v| v == x).unwrap();
            let row = y_values.iter().position(|&v| v == y).unwrap();
            z_matrix[row][col] = Some(z);

            let improves = match &optimal {
                None => true,
                Some(best) => {
                    if kpi.is_minimized() {
                        z < best.z
                    } else {
                        z > best.z
                    }
                }
            };
            if improves {
                optimal = Some(OptimalPoint { x, y, z });
            }
        }

        let contour_levels = contour_levels(&z_matrix);

        Some(Self {
            x_variable: x_variable.to_string(),
            y_variable: y_variable.to_string(),
            x_values,
            y_values,
            z_matrix,
            optimal_point: optimal,
            contour_levels,
        })
    }
}

fn sorted_unique(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.collect();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out.dedup();
    out
}

/// Evenly spaced levels between the observed min and max; empty when the
/// matrix has no samples.
fn contour_levels(z_matrix: &[Vec<Option<f64>>]) -> Vec<f64> {
    let observed: Vec<f64> = z_matrix.iter().flatten().filter_map(|z| *z).collect();
    let (Some(min), Some(max)) = (
        observed.iter().copied().reduce(f64::min),
        observed.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    let step = (max - min) / (CONTOUR_LEVELS - 1) as f64;
    (0..CONTOUR_LEVELS).map(|i| min + step * i as f64).collect()
}

// ============================================================================
// Color scale
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Stops from worst (t = 0) to best (t = 1).
const SCALE_STOPS: [Rgb; 4] = [
    Rgb::new(0xd7, 0x30, 0x27), // red
    Rgb::new(0xfc, 0x8d, 0x59), // orange
    Rgb::new(0xd9, 0xef, 0x8b), // yellow-green
    Rgb::new(0x1a, 0x96, 0x41), // green
];

/// Unsampled cells get a flat neutral, never an interpolated color.
const NEUTRAL_COLOR: Rgb = Rgb::new(0x9e, 0x9e, 0x9e);

/// Maps sampled values to colors by normalizing against the matrix's own
/// observed min/max (not the catalog bounds) and interpolating across four
/// fixed stops. `reversed` flips the gradient for lower-is-better metrics
/// such as LCOH.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    min: f64,
    span: f64,
    reversed: bool,
}

impl ColorScale {
    pub fn new(z_matrix: &[Vec<Option<f64>>], reversed: bool) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in z_matrix.iter().flatten().filter_map(|z| *z) {
            min = min.min(value);
            max = max.max(value);
        }
        if !min.is_finite() {
            // no samples at all; any value maps to the low stop
            min = 0.0;
            max = 0.0;
        }

        // floor the denominator so a uniform matrix yields a uniform color
        // instead of NaN
        let span = if max - min > 0.0 { max - min } else { 1.0 };
        Self {
            min,
            span,
            reversed,
        }
    }

    pub fn color_for(&self, value: Option<f64>) -> Rgb {
        let Some(value) = value else {
            return NEUTRAL_COLOR;
        };
        let mut t = ((value - self.min) / self.span).clamp(0.0, 1.0);
        if self.reversed {
            t = 1.0 - t;
        }

        let scaled = t * (SCALE_STOPS.len() - 1) as f64;
        let segment = (scaled.floor() as usize).min(SCALE_STOPS.len() - 2);
        let fraction = scaled - segment as f64;
        lerp(SCALE_STOPS[segment], SCALE_STOPS[segment + 1], fraction)
    }
}

fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Rgb::new(
        channel(from.r, to.r),
        channel(from.g, to.g),
        channel(from.b, to.b),
    )
}

// ============================================================================
// Optimum location
// ============================================================================

/// The optimum resolved to grid indices and normalized [0, 1] plotting
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimumMarker {
    pub col: usize,
    pub row: usize,
    pub x_norm: f64,
    pub y_norm: f64,
    pub z: f64,
}

/// Match the reported optimum against the axis values within
/// [`OPTIMUM_TOLERANCE`]. When no axis entry matches, the marker is omitted
/// rather than guessed.
pub fn locate_optimum(grid: &HeatmapGrid) -> Option<OptimumMarker> {
    let point = grid.optimal_point?;
    let col = grid
        .x_values
        .iter()
        .position(|&x| (x - point.x).abs() <= OPTIMUM_TOLERANCE)?;
    let row = grid
        .y_values
        .iter()
        .position(|&y| (y - point.y).abs() <= OPTIMUM_TOLERANCE)?;

    Some(OptimumMarker {
        col,
        row,
        x_norm: axis_position(col, grid.x_values.len()),
        y_norm: axis_position(row, grid.y_values.len()),
        z: point.z,
    })
}

fn axis_position(index: usize, len: usize) -> f64 {
    if len > 1 {
        index as f64 / (len - 1) as f64
    } else {
        0.0
    }
}
