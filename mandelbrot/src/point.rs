//! Point evaluation: escape time of a single complex sample.

use num::Complex;

use crate::error::{Error, Result};

/// Modulus the orbit has to exceed before a sample counts as escaped.
///
/// Note this is 4, not the textbook radius 2.
pub const ESCAPE_RADIUS: f64 = 4.0;

/// Determine if `c` is in the Mandelbrot set, using at most `limit` iterations to decide.
///
/// If `c` is not a member, return `Some(i)`, where `i` is the (0-indexed)
/// iteration on which the orbit left the circle of radius [`ESCAPE_RADIUS`].
/// If we reached the iteration limit without being able to prove that `c` is
/// not a member, return `None`.
pub fn escape_time(c: Complex<f64>, limit: u32) -> Option<u32> {
    let mut z = Complex::new(0.0, 0.0);
    for i in 0..limit {
        z = z * z + c;
        if z.norm() > ESCAPE_RADIUS {
            return Some(i);
        }
    }
    None
}

/// Escape count of `c` clamped into `[0, cap - 1]`.
///
/// A sample that never escapes reports `cap - 1`, the same value as one that
/// escapes on the last allowed iteration. Use [`escape_time`] when the two
/// cases need to be told apart.
pub fn evaluate(c: Complex<f64>, cap: u32) -> Result<u32> {
    check_cap(cap)?;
    if !c.re.is_finite() || !c.im.is_finite() {
        return Err(Error::invalid(format!("non-finite sample {}", c)));
    }
    Ok(evaluate_unchecked(c, cap))
}

/// Hot-loop form of [`evaluate`] for callers that validated their inputs.
pub(crate) fn evaluate_unchecked(c: Complex<f64>, cap: u32) -> u32 {
    escape_time(c, cap).unwrap_or(cap - 1)
}

pub(crate) fn check_cap(cap: u32) -> Result<()> {
    if cap == 0 {
        return Err(Error::invalid("iteration cap must be positive"));
    }
    Ok(())
}
