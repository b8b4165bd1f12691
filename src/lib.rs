//! rust_calibration — parametric probability recalibration for multi-class
//! classifiers.
//!
//! Purpose
//! -------
//! Serve as the crate root for the calibration models and the optimization
//! and inference layers they are built on. Given a classifier's raw `N×K`
//! scores and the true labels, the crate fits a transformation that maps
//! scores to better-calibrated class probabilities.
//!
//! Key behaviors
//! -------------
//! - [`calibration`]: data validation, the weight codec, the probability
//!   model, the loss/gradient/Hessian engine, and the two fitted models
//!   (`MultinomialCalibrator`, `TemperatureCalibrator`).
//! - [`optimization`]: the Argmin-backed trust-region log-likelihood
//!   maximizer, numerically stable softmax/log helpers, and the optimizer
//!   error surface.
//! - [`inference`]: curvature diagnostics and standard errors from the
//!   observed information at a fitted solution.
//!
//! Invariants & assumptions
//! ------------------------
//! - All computation is single-threaded and synchronous; fit state is local
//!   to one call.
//! - Failures surface as typed errors (`CalibError`, `OptError`), never as
//!   panics on bad user data.
//!
//! Conventions
//! -----------
//! - Rows are samples and columns are classes; labels are 0-based.
//! - Diagnostics go through the `log` facade. Install any logger (e.g.
//!   `env_logger`) to see them; nothing is printed otherwise.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code in each module.
//! - `tests/` holds end-to-end calibration pipelines on synthetic data.

pub mod calibration;
pub mod inference;
pub mod optimization;
