//! numerical_stability — guarded transforms shared by the calibration models.
//!
//! Purpose
//! -------
//! Collect the small numerically sensitive building blocks used by both
//! calibrators: clipping scores before logarithms, and max-shifted softmax
//! and log-sum-exp over score rows. Centralizing them keeps a single set of
//! clipping bounds and eigenvalue cutoffs across the crate.
//!
//! Key behaviors
//! -------------
//! - `clip_for_log` / `clipped_log` keep every `ln` argument inside
//!   `[LOG_CLIP_FLOOR, LOG_CLIP_CEIL]`.
//! - `stable_softmax` normalizes rows after subtracting the row maximum.
//! - `logsumexp` / `row_logsumexp` provide the log-normalizer used by the
//!   cross-entropy objectives, so objectives are computed through
//!   log-softmax and never through `ln(p)` of a rounded probability.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs to the softmax helpers are finite; callers validate scores
//!   before fitting.
//! - Every row returned by `stable_softmax` sums to 1 up to rounding.
//!
//! Conventions
//! -----------
//! - Rows are samples, columns are classes (`N×K`).
//! - Helpers never log or allocate beyond their return values.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, LOG_CLIP_CEIL, LOG_CLIP_FLOOR, clip_for_log, clipped_log, logsumexp,
    row_logsumexp, stable_softmax,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, clip_for_log, clipped_log, logsumexp, row_logsumexp, stable_softmax,
    };
}
