//! Adaptive first-order update for a single scalar parameter.
//!
//! The update keeps exponentially decayed first and second moments of the
//! gradient and applies
//!
//! ```text
//! m ← β₁ m + (1 − β₁) g
//! v ← β₂ v + (1 − β₂) g²
//! T ← T − lr · m / (√v + ε)
//! ```
//!
//! There is no bias correction of `m` and `v`: early steps are damped by the
//! zero-initialized moments and kept finite by `ε` alone.
use crate::calibration::errors::{CalibError, CalibResult};

/// Hyperparameters of [`ScalarAdam`].
///
/// Defaults: `lr = 1e-3`, `beta_1 = 0.9`, `beta_2 = 0.999`, `eps = 1e-8`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamOptions {
    pub lr: f64,
    pub beta_1: f64,
    pub beta_2: f64,
    pub eps: f64,
}

impl AdamOptions {
    /// Validated constructor.
    ///
    /// Errors
    /// ------
    /// - `CalibError::InvalidLearningRate` unless `lr` is finite and > 0.
    /// - `CalibError::InvalidDecayRate` unless each beta lies in `[0, 1)`.
    /// - `CalibError::InvalidAdamEps` unless `eps` is finite and > 0.
    pub fn new(lr: f64, beta_1: f64, beta_2: f64, eps: f64) -> CalibResult<Self> {
        if !lr.is_finite() || lr <= 0.0 {
            return Err(CalibError::InvalidLearningRate { value: lr });
        }
        verify_decay("beta_1", beta_1)?;
        verify_decay("beta_2", beta_2)?;
        if !eps.is_finite() || eps <= 0.0 {
            return Err(CalibError::InvalidAdamEps { value: eps });
        }
        Ok(Self { lr, beta_1, beta_2, eps })
    }
}

impl Default for AdamOptions {
    fn default() -> Self {
        Self { lr: 1e-3, beta_1: 0.9, beta_2: 0.999, eps: 1e-8 }
    }
}

/// Moment accumulators for one scalar parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarAdam {
    opts: AdamOptions,
    m: f64,
    v: f64,
}

impl ScalarAdam {
    pub fn new(opts: AdamOptions) -> Self {
        Self { opts, m: 0.0, v: 0.0 }
    }

    /// Apply one update to `param` with gradient `grad` and return the new value.
    pub fn step(&mut self, param: f64, grad: f64) -> f64 {
        let AdamOptions { lr, beta_1, beta_2, eps } = self.opts;
        self.m = beta_1 * self.m + (1.0 - beta_1) * grad;
        self.v = beta_2 * self.v + (1.0 - beta_2) * grad * grad;
        param - lr * self.m / (self.v.sqrt() + eps)
    }

    /// Current `(m, v)`.
    pub fn moments(&self) -> (f64, f64) {
        (self.m, self.v)
    }
}

fn verify_decay(name: &'static str, value: f64) -> CalibResult<()> {
    if !(0.0..1.0).contains(&value) {
        return Err(CalibError::InvalidDecayRate { name, value });
    }
    Ok(())
}
