//! Numerical stability utilities.
//!
//! Provides safe implementations of the transforms the calibration models
//! lean on: clipping scores before logarithms, and shift-stabilized
//! softmax / log-sum-exp over the rows of a score matrix.
//!
//! # Provided items
//! - [`LOG_CLIP_FLOOR`] / [`LOG_CLIP_CEIL`]: bounds applied by
//!   [`clip_for_log`] so that `ln` never sees an exact 0 (or a value at or
//!   above 1 for probability-like inputs).
//! - [`EIGEN_EPS`]: eigenvalue cutoff shared by the curvature utilities.
//! - [`clipped_log`]: element-wise `ln(clip(x))` over a score matrix.
//! - [`row_logsumexp`] and [`stable_softmax`]: max-shifted row reductions.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Smallest value passed to `ln` by [`clip_for_log`].
pub const LOG_CLIP_FLOOR: f64 = f64::MIN_POSITIVE;

/// Largest value passed to `ln` by [`clip_for_log`].
pub const LOG_CLIP_CEIL: f64 = 1.0 - f64::EPSILON;

/// Eigenvalues with magnitude at most this value are treated as zero.
pub const EIGEN_EPS: f64 = 1e-10;

/// Clamp a pseudo-probability into `[LOG_CLIP_FLOOR, LOG_CLIP_CEIL]`.
///
/// NaN inputs are mapped to the floor so the result is always a valid
/// argument for `ln`.
pub fn clip_for_log(x: f64) -> f64 {
    if x.is_nan() { LOG_CLIP_FLOOR } else { x.clamp(LOG_CLIP_FLOOR, LOG_CLIP_CEIL) }
}

/// Element-wise `ln(clip_for_log(x))` for a score matrix.
pub fn clipped_log(scores: ArrayView2<f64>) -> Array2<f64> {
    scores.mapv(|x| clip_for_log(x).ln())
}

/// Numerically stable `ln Σ exp(z)` for a single row.
///
/// Returns `-∞` for an empty row, matching the limit of an empty sum.
pub fn logsumexp(row: ArrayView1<f64>) -> f64 {
    let max = row.fold(f64::NEG_INFINITY, |acc, &z| acc.max(z));
    if !max.is_finite() {
        return max;
    }
    max + row.iter().map(|&z| (z - max).exp()).sum::<f64>().ln()
}

/// Row-wise [`logsumexp`] of an `N×K` matrix.
pub fn row_logsumexp(z: ArrayView2<f64>) -> Array1<f64> {
    z.map_axis(Axis(1), logsumexp)
}

/// Shift-stabilized softmax applied to every row of `z`, in place.
///
/// Each row has its maximum subtracted before exponentiation, so the
/// largest entry of every row maps to `exp(0) = 1` before normalization
/// and no overflow can occur.
pub fn stable_softmax(mut z: Array2<f64>) -> Array2<f64> {
    for mut row in z.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let total = row.sum();
        row.mapv_inplace(|v| v / total);
    }
    z
}
