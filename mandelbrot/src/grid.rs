//! Row-major grids and the parallel grid evaluator.

use num::Complex;

use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::point;

/// Fixed-shape 2-D buffer stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

/// Real or imaginary parts of the sampled region.
pub type CoordinateGrid = Grid<f64>;

/// Per-cell escape counts, same shape as the coordinate grids.
pub type EscapeGrid = Grid<u32>;

impl<T> Grid<T> {
    /// Wrap `cells` as a `rows x cols` grid. Fails unless the length matches.
    pub fn from_vec(rows: usize, cols: usize, cells: Vec<T>) -> Result<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::invalid(format!("grid shape {}x{} overflows", rows, cols)))?;
        if cells.len() != expected {
            return Err(Error::invalid(format!(
                "{} cells do not fill a {}x{} grid",
                cells.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, cells: Vec<T>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    /// Build a grid from nested rows, which must all have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(Error::invalid(format!(
                "row {} has {} cells, expected {}",
                bad,
                rows[bad].len(),
                width
            )));
        }
        Self::from_vec(height, width, rows.into_iter().flatten().collect())
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Cells of row `row`. Panics if the row is out of bounds, like slice indexing.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics; a zero-width grid has no cells to yield anyway
        self.cells.chunks(self.cols.max(1))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }
}

/// Evaluate every cell of the region using all available cores.
///
/// `real` and `imag` must share one shape; the result has that shape too.
/// All inputs are validated before the first cell is computed.
pub fn evaluate_grid(real: &CoordinateGrid, imag: &CoordinateGrid, cap: u32) -> Result<EscapeGrid> {
    evaluate_grid_with(real, imag, cap, &Cancellation::new(), 0)
}

/// [`evaluate_grid`] with an explicit worker count (0 = one per CPU) and a
/// cancellation handle that is polled between rows.
pub fn evaluate_grid_with(
    real: &CoordinateGrid,
    imag: &CoordinateGrid,
    cap: u32,
    cancel: &Cancellation,
    threads: usize,
) -> Result<EscapeGrid> {
    validate(real, imag, cap)?;
    let (rows, cols) = real.shape();
    let mut cells = vec![0u32; rows * cols];

    if !cells.is_empty() {
        let threads = if threads == 0 { num_cpus::get() } else { threads };
        tracing::debug!(rows, cols, cap, threads, "evaluating grid");

        let rows_per_band = rows / threads + 1;
        let finished = crossbeam::scope(|spawner| {
            let handles: Vec<_> = cells
                .chunks_mut(rows_per_band * cols)
                .enumerate()
                .map(|(i, band)| {
                    let top = rows_per_band * i;
                    spawner.spawn(move |_| render_band(band, top, real, imag, cap, cancel))
                })
                .collect();

            let mut finished = true;
            for handle in handles {
                match handle.join() {
                    Ok(done) => finished &= done,
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            finished
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

        if !finished {
            tracing::debug!(rows, cols, cap, "grid evaluation cancelled");
            return Err(Error::Cancelled);
        }
    }

    Ok(Grid::from_parts(rows, cols, cells))
}

/// Fill `band`, whose first row is row `top` of the region.
/// Returns false if cancellation was observed before the band was complete.
fn render_band(
    band: &mut [u32],
    top: usize,
    real: &CoordinateGrid,
    imag: &CoordinateGrid,
    cap: u32,
    cancel: &Cancellation,
) -> bool {
    for (offset, out) in band.chunks_mut(real.cols()).enumerate() {
        if cancel.is_cancelled() {
            return false;
        }
        let row = top + offset;
        for ((cell, &re), &im) in out.iter_mut().zip(real.row(row)).zip(imag.row(row)) {
            *cell = point::evaluate_unchecked(Complex::new(re, im), cap);
        }
    }
    true
}

pub(crate) fn check_shapes(real: &CoordinateGrid, imag: &CoordinateGrid) -> Result<()> {
    if real.shape() != imag.shape() {
        return Err(Error::invalid(format!(
            "coordinate grids differ in shape: real {:?}, imaginary {:?}",
            real.shape(),
            imag.shape()
        )));
    }
    if let Some(bad) = real
        .as_slice()
        .iter()
        .chain(imag.as_slice())
        .find(|v| !v.is_finite())
    {
        return Err(Error::invalid(format!("non-finite coordinate {}", bad)));
    }
    Ok(())
}

fn validate(real: &CoordinateGrid, imag: &CoordinateGrid, cap: u32) -> Result<()> {
    point::check_cap(cap)?;
    check_shapes(real, imag)
}
