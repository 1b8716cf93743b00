//! Sampled region of the complex plane and its coordinate grids.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::grid::{CoordinateGrid, Grid};

/// `num` evenly spaced samples over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut samples: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            samples[num - 1] = stop;
            samples
        }
    }
}

/// Expand axis samples into real and imaginary grids of shape
/// `(ys.len(), xs.len())`: `real[i][j] = xs[j]`, `imag[i][j] = ys[i]`.
pub fn meshgrid(xs: &[f64], ys: &[f64]) -> (CoordinateGrid, CoordinateGrid) {
    let real: Vec<f64> = ys.iter().flat_map(|_| xs.iter().copied()).collect();
    let imag: Vec<f64> = ys
        .iter()
        .flat_map(|&y| std::iter::repeat(y).take(xs.len()))
        .collect();
    (
        Grid::from_parts(ys.len(), xs.len(), real),
        Grid::from_parts(ys.len(), xs.len(), imag),
    )
}

/// Rectangular window over the plane and the resolution it is sampled at.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Region {
    #[serde(default = "default_x_min")]
    pub x_min: f64,

    #[serde(default = "default_x_max")]
    pub x_max: f64,

    #[serde(default = "default_y_min")]
    pub y_min: f64,

    #[serde(default = "default_y_max")]
    pub y_max: f64,

    /// Samples along the real axis (image columns)
    #[serde(default = "default_resolution")]
    pub width: usize,

    /// Samples along the imaginary axis (image rows)
    #[serde(default = "default_resolution")]
    pub height: usize,
}

fn default_x_min() -> f64 {
    -2.1
}

fn default_x_max() -> f64 {
    0.6
}

fn default_y_min() -> f64 {
    -1.5
}

fn default_y_max() -> f64 {
    1.5
}

fn default_resolution() -> usize {
    1000
}

impl Default for Region {
    fn default() -> Self {
        Self {
            x_min: default_x_min(),
            x_max: default_x_max(),
            y_min: default_y_min(),
            y_max: default_y_max(),
            width: default_resolution(),
            height: default_resolution(),
        }
    }
}

impl Region {
    pub fn validate(&self) -> Result<()> {
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(Error::invalid("region bounds must be finite"));
        }
        if self.x_min >= self.x_max || self.y_min >= self.y_max {
            return Err(Error::invalid(format!(
                "empty region: x [{}, {}], y [{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid(format!(
                "resolution {}x{} has no samples",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Real and imaginary grids of shape `(height, width)`.
    pub fn coordinate_grids(&self) -> Result<(CoordinateGrid, CoordinateGrid)> {
        self.validate()?;
        let xs = linspace(self.x_min, self.x_max, self.width);
        let ys = linspace(self.y_min, self.y_max, self.height);
        Ok(meshgrid(&xs, &ys))
    }
}
