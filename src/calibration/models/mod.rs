//! models — fitted calibration models.
//!
//! - [`MultinomialCalibrator`]: Full or Diagonal multinomial weights fitted
//!   by trust-region Newton through the `loglik_optimizer` layer.
//! - [`TemperatureCalibrator`]: a single power-transform exponent fitted by
//!   mini-batch adaptive updates with plateau stopping.
//!
//! Both expose `fit`, `predict_proba`, and `predict`, and report
//! `CalibError::ModelNotFitted` when queried before a fit.

pub mod multinomial;
pub mod temperature;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::multinomial::MultinomialCalibrator;
pub use self::temperature::{EpochObserver, TemperatureCalibrator, TemperatureOutcome};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::multinomial::MultinomialCalibrator;
    pub use super::temperature::{TemperatureCalibrator, TemperatureOutcome};
}
