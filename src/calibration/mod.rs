//! calibration — parametric recalibration of multi-class classifier scores.
//!
//! Purpose
//! -------
//! Map a classifier's raw `N×K` scores to calibrated class probabilities
//! with one of two fitted transforms:
//! - a constrained multinomial logistic regression on the bias-augmented
//!   scores ([`MultinomialCalibrator`]), and
//! - a power transform `softmax(T · ln(clip(S)))` with one exponent
//!   ([`TemperatureCalibrator`]).
//!
//! Key behaviors
//! -------------
//! - Inputs are validated once into [`CalibData`] (K >= 2, finite scores,
//!   labels in `[0, K)`, N = 0 allowed).
//! - The multinomial model supplies analytic derivatives to the
//!   trust-region optimizer; the power-transform model uses a closed-form
//!   scalar derivative.
//! - Non-convergence is reported in the fit results and logged at `warn`
//!   level; it is never an error.
//!
//! Conventions
//! -----------
//! - Labels are 0-based; class `K−1` is the reference class of the
//!   multinomial model.
//! - Errors are [`CalibError`] / [`CalibResult`]; optimizer errors convert
//!   into them.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use ndarray::array;
//! use rust_calibration::calibration::prelude::*;
//!
//! let data = CalibData::new(array![[2.0, -1.0], [-0.5, 1.0], [0.3, 0.1]], array![0, 1, 1])?;
//! let mut model = MultinomialCalibrator::new(MultinomialOptions::default());
//! model.fit(&data)?;
//! let probs = model.predict_proba(data.scores.view())?;
//! # Ok::<(), rust_calibration::calibration::CalibError>(())
//! ```

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    AdamOptions, CalibData, Init, MultinomialOptions, Parameterization, PlateauRule,
    TemperatureOptions, WeightMatrix,
};
pub use self::errors::{CalibError, CalibResult};
pub use self::models::{MultinomialCalibrator, TemperatureCalibrator, TemperatureOutcome};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{
        AdamOptions, CalibData, CalibError, CalibResult, Init, MultinomialCalibrator,
        MultinomialOptions, Parameterization, PlateauRule, TemperatureCalibrator,
        TemperatureOptions, TemperatureOutcome, WeightMatrix,
    };
}
