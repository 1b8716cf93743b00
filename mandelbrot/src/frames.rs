//! Threshold-sweep frame sequence for animations.
//!
//! Every frame samples the same region; only the iteration cap grows, as
//! `round(growth^(frame + 1))`, so detail unfolds frame by frame.

use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::grid::{self, CoordinateGrid, EscapeGrid};

pub const DEFAULT_GROWTH: f64 = 1.15;

/// Maps a frame index to its iteration cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapSchedule {
    growth: f64,
}

impl Default for CapSchedule {
    fn default() -> Self {
        Self {
            growth: DEFAULT_GROWTH,
        }
    }
}

impl CapSchedule {
    /// `growth` must be finite and at least 1 so caps never shrink below 1.
    pub fn new(growth: f64) -> Result<Self> {
        if !growth.is_finite() || growth < 1.0 {
            return Err(Error::invalid(format!(
                "cap growth must be a finite number >= 1, got {}",
                growth
            )));
        }
        Ok(Self { growth })
    }

    pub fn growth(&self) -> f64 {
        self.growth
    }

    /// Halves round to even: a growth of 2.5 gives 2 for frame 0.
    pub fn cap_for(&self, frame: u32) -> Result<u32> {
        let cap = self.growth.powf(f64::from(frame) + 1.0).round_ties_even();
        if cap > f64::from(u32::MAX) {
            return Err(Error::invalid(format!(
                "iteration cap for frame {} exceeds {}",
                frame,
                u32::MAX
            )));
        }
        Ok(cap as u32)
    }

    /// Caps of frames `0..frame_count`, without evaluating any grid.
    pub fn caps(&self, frame_count: u32) -> Result<Vec<u32>> {
        (0..frame_count).map(|frame| self.cap_for(frame)).collect()
    }
}

/// One rendered animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u32,
    pub cap: u32,
    pub grid: EscapeGrid,
}

/// Lazy sequence of escape grids, one per frame, in increasing frame order.
///
/// Only the grid being yielded is alive at any time. Cloning an unstarted
/// sequence (or building a new one) replays the exact same frames. After an
/// error the sequence is exhausted.
#[derive(Debug, Clone)]
pub struct FrameSequence<'a> {
    real: &'a CoordinateGrid,
    imag: &'a CoordinateGrid,
    schedule: CapSchedule,
    next: u32,
    frame_count: u32,
    cancel: Cancellation,
    threads: usize,
}

impl<'a> FrameSequence<'a> {
    /// Validates the grids and every cap up front; no grid is evaluated here.
    pub fn new(
        real: &'a CoordinateGrid,
        imag: &'a CoordinateGrid,
        frame_count: u32,
        schedule: CapSchedule,
    ) -> Result<Self> {
        grid::check_shapes(real, imag)?;
        // caps are non-decreasing, so the last one is the largest
        if let Some(last) = frame_count.checked_sub(1) {
            schedule.cap_for(last)?;
        }
        Ok(Self {
            real,
            imag,
            schedule,
            next: 0,
            frame_count,
            cancel: Cancellation::new(),
            threads: 0,
        })
    }

    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// Worker threads per frame; 0 uses one per CPU.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn schedule(&self) -> CapSchedule {
        self.schedule
    }

    fn render(&self, index: u32) -> Result<Frame> {
        let cap = self.schedule.cap_for(index)?;
        let grid = grid::evaluate_grid_with(self.real, self.imag, cap, &self.cancel, self.threads)?;
        tracing::info!(frame = index, cap, "frame rendered");
        Ok(Frame { index, cap, grid })
    }
}

impl Iterator for FrameSequence<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.frame_count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let frame = self.render(index);
        if frame.is_err() {
            self.next = self.frame_count;
        }
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.frame_count - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameSequence<'_> {}

/// `frame_count` frames over the given grids with the default 1.15 growth.
pub fn frames<'a>(
    real: &'a CoordinateGrid,
    imag: &'a CoordinateGrid,
    frame_count: u32,
) -> Result<FrameSequence<'a>> {
    FrameSequence::new(real, imag, frame_count, CapSchedule::default())
}
