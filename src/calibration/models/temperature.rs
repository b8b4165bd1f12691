//! Temperature calibrator — stochastic fit of the power-transform model
//! `p ∝ exp(T · ln(clip(S)))`.
//!
//! Purpose
//! -------
//! Fit the single exponent `T` by mini-batch first-order updates with
//! plateau-based early stopping, returning the best epoch's value rather
//! than the last one.
//!
//! Key behaviors
//! -------------
//! - Scores are clipped and logged once per fit.
//! - Each epoch draws one permutation from the fit's `StdRng` and applies it
//!   to log-scores and labels together, then walks contiguous batches of
//!   `batch_size` rows (the last may be shorter).
//! - Each batch contributes its summed loss to the epoch total and one
//!   [`ScalarAdam`] step on `T`.
//! - After every epoch the total is pushed to a [`LossHistory`]; on a new
//!   best the current `T` is snapshotted as `t_hat`. The first epoch always
//!   seeds `t_hat`.
//! - The fit stops when [`PlateauRule::reached`] fires or after
//!   `max_epochs`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `t_hat` is the value recorded at the epoch with the minimum total loss
//!   (earliest such epoch on ties).
//! - All fit state is local to one call; the calibrator only keeps the
//!   resulting [`TemperatureOutcome`].
//!
//! Downstream usage
//! ----------------
//! - Use [`TemperatureCalibrator::fit_observed`] to receive `(epoch, loss, T)`
//!   after every epoch, e.g. for progress reporting or loss traces.
use crate::{
    calibration::{
        core::{
            adam::ScalarAdam,
            data::{CalibData, validate_scores},
            engine::power_loss_grad,
            options::TemperatureOptions,
            outputs::{power_transform_outputs, predict_labels},
            plateau::LossHistory,
        },
        errors::{CalibError, CalibResult},
    },
    optimization::numerical_stability::transformations::clipped_log,
};
use ndarray::{Array1, Array2, ArrayView2, Axis, s};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Callback invoked once per epoch with `(epoch, epoch_loss, T)`.
///
/// Epochs are 0-based; `T` is the value after the epoch's updates.
pub trait EpochObserver {
    fn on_epoch(&mut self, epoch: usize, loss: f64, t: f64);
}

impl<F: FnMut(usize, f64, f64)> EpochObserver for F {
    fn on_epoch(&mut self, epoch: usize, loss: f64, t: f64) {
        self(epoch, loss, t)
    }
}

/// Result of a temperature fit.
///
/// - `t_hat`: exponent recorded at the best epoch.
/// - `best_epoch`: 0-based index of that epoch.
/// - `epochs_run`: number of completed epochs.
/// - `stopped_on_plateau`: `true` if the plateau rule ended the fit.
/// - `losses`: per-epoch summed losses.
/// - `final_t`: exponent after the last epoch.
/// - `n_classes`: class count seen at fit time.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureOutcome {
    pub t_hat: f64,
    pub best_epoch: usize,
    pub epochs_run: usize,
    pub stopped_on_plateau: bool,
    pub losses: Vec<f64>,
    pub final_t: f64,
    pub n_classes: usize,
}

/// Power-transform calibrator with a single trainable exponent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemperatureCalibrator {
    pub options: TemperatureOptions,
    /// Populated by `fit`.
    pub results: Option<TemperatureOutcome>,
}

impl TemperatureCalibrator {
    pub fn new(options: TemperatureOptions) -> Self {
        Self { options, results: None }
    }

    /// Fit `T` to `data`. See [`TemperatureCalibrator::fit_observed`].
    pub fn fit(&mut self, data: &CalibData) -> CalibResult<()> {
        self.fit_observed(data, |_: usize, _: f64, _: f64| {})
    }

    /// Fit `T` to `data`, reporting every epoch to `observer`.
    ///
    /// ## Steps
    /// 1. `L = ln(clip(S))`; seed the RNG from `options.seed` or the OS.
    /// 2. For each epoch: shuffle, batch, update `T`, sum batch losses.
    /// 3. Track the best epoch and stop on plateau or epoch budget.
    ///
    /// ## Errors
    /// Never fails for validated [`CalibData`]; the `Result` keeps the
    /// signature aligned with the multinomial fit.
    ///
    /// ## Notes
    /// - `batch_size = None` or `batch_size >= N` uses one batch per epoch.
    /// - With N = 0 every epoch total is 0, so the plateau rule fires after
    ///   `window + 1` epochs and `t_hat` stays at 1.
    pub fn fit_observed<O: EpochObserver>(
        &mut self, data: &CalibData, mut observer: O,
    ) -> CalibResult<()> {
        let n = data.n_samples();
        let opts = self.options;
        let log_scores = clipped_log(data.scores.view());
        let batch_size = opts.batch_size.unwrap_or(n).min(n).max(1);
        let mut rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut order: Vec<usize> = (0..n).collect();

        let mut t = 1.0;
        let mut t_hat = t;
        let mut adam = ScalarAdam::new(opts.adam);
        let mut history = LossHistory::new();
        let mut stopped_on_plateau = false;

        for epoch in 0..opts.max_epochs {
            order.shuffle(&mut rng);
            let epoch_scores = log_scores.select(Axis(0), &order);
            let epoch_labels = data.labels.select(Axis(0), &order);

            let mut total = 0.0;
            for start in (0..n).step_by(batch_size) {
                let end = (start + batch_size).min(n);
                let (loss, grad) = power_loss_grad(
                    t,
                    epoch_scores.slice(s![start..end, ..]),
                    epoch_labels.slice(s![start..end]),
                );
                t = adam.step(t, grad);
                total += loss;
            }

            if history.push(total) {
                t_hat = t;
            }
            log::debug!("epoch {epoch}: loss = {total:.6}, T = {t:.6}");
            observer.on_epoch(epoch, total, t);

            if opts.plateau.reached(history.losses()) {
                stopped_on_plateau = true;
                break;
            }
        }

        let best_epoch = history.best_epoch().unwrap_or(0);
        let epochs_run = history.losses().len();
        log::info!(
            "temperature calibration: T = {t_hat:.6} (epoch {best_epoch} of {epochs_run}), plateau = {stopped_on_plateau}"
        );
        self.results = Some(TemperatureOutcome {
            t_hat,
            best_epoch,
            epochs_run,
            stopped_on_plateau,
            losses: history.into_losses(),
            final_t: t,
            n_classes: data.n_classes(),
        });
        Ok(())
    }

    /// Fitted exponent.
    pub fn temperature(&self) -> CalibResult<f64> {
        Ok(self.outcome()?.t_hat)
    }

    /// Calibrated probabilities `softmax(T̂ · ln(clip(S)))`.
    ///
    /// ## Errors
    /// - `CalibError::ModelNotFitted` before a fit.
    /// - Score validation errors, and `CalibError::ClassCountMismatch` when
    ///   the width differs from the fit.
    pub fn predict_proba(&self, scores: ArrayView2<f64>) -> CalibResult<Array2<f64>> {
        let outcome = self.outcome()?;
        validate_scores(scores)?;
        if scores.ncols() != outcome.n_classes {
            return Err(CalibError::ClassCountMismatch {
                expected: outcome.n_classes,
                found: scores.ncols(),
            });
        }
        Ok(power_transform_outputs(outcome.t_hat, clipped_log(scores).view()))
    }

    /// Most probable class per row.
    pub fn predict(&self, scores: ArrayView2<f64>) -> CalibResult<Array1<usize>> {
        Ok(predict_labels(self.predict_proba(scores)?.view()))
    }

    fn outcome(&self) -> CalibResult<&TemperatureOutcome> {
        self.results.as_ref().ok_or(CalibError::ModelNotFitted)
    }
}
