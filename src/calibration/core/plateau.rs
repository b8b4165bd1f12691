//! Epoch loss history, best-value tracking, and the relative plateau rule.
//!
//! Purpose
//! -------
//! Decide when a stochastic fit has stopped making progress and which epoch
//! produced the best loss.
//!
//! Key behaviors
//! -------------
//! - [`LossHistory::push`] records an epoch total and reports whether it is
//!   a new best. The first epoch always is, so a best value exists after a
//!   single epoch.
//! - [`PlateauRule::reached`] splits the history into `old = L[..len−W]`
//!   and `recent = L[len−W..]` once `len > W`, and fires when
//!   `min(old) − min(recent) <= |min(old)| · factor`.
//!
//! Invariants & assumptions
//! ------------------------
//! - "New best" means strictly below every earlier total; ties keep the
//!   earlier epoch.
//! - The rule never fires while `len <= W`.
use crate::calibration::errors::{CalibError, CalibResult};

/// Window length used by the stochastic calibrator.
pub const DEFAULT_PLATEAU_WINDOW: usize = 32;

/// Default relative improvement threshold.
pub const DEFAULT_PLATEAU_FACTOR: f64 = 1e-4;

/// Relative plateau stopping rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateauRule {
    pub window: usize,
    pub factor: f64,
}

impl PlateauRule {
    /// Validated constructor.
    ///
    /// Errors
    /// ------
    /// - `CalibError::InvalidPlateauWindow` for `window == 0`.
    /// - `CalibError::InvalidPlateauFactor` unless `factor` is finite and >= 0.
    pub fn new(window: usize, factor: f64) -> CalibResult<Self> {
        if window == 0 {
            return Err(CalibError::InvalidPlateauWindow { value: window });
        }
        if !factor.is_finite() || factor < 0.0 {
            return Err(CalibError::InvalidPlateauFactor { value: factor });
        }
        Ok(Self { window, factor })
    }

    /// Whether the loss trace has plateaued.
    pub fn reached(&self, losses: &[f64]) -> bool {
        if losses.len() <= self.window {
            return false;
        }
        let split = losses.len() - self.window;
        let previous = min_of(&losses[..split]);
        let current = min_of(&losses[split..]);
        previous - current <= previous.abs() * self.factor
    }
}

impl Default for PlateauRule {
    fn default() -> Self {
        Self { window: DEFAULT_PLATEAU_WINDOW, factor: DEFAULT_PLATEAU_FACTOR }
    }
}

/// Per-epoch loss totals with the running best.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LossHistory {
    losses: Vec<f64>,
    best_epoch: Option<usize>,
}

impl LossHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one epoch total; returns `true` if it is a new best.
    pub fn push(&mut self, loss: f64) -> bool {
        let improved = match self.best_epoch {
            None => true,
            Some(epoch) => loss < self.losses[epoch],
        };
        if improved {
            self.best_epoch = Some(self.losses.len());
        }
        self.losses.push(loss);
        improved
    }

    pub fn losses(&self) -> &[f64] {
        &self.losses
    }

    /// 0-based index of the best epoch, `None` before the first push.
    pub fn best_epoch(&self) -> Option<usize> {
        self.best_epoch
    }

    pub fn into_losses(self) -> Vec<f64> {
        self.losses
    }
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}
