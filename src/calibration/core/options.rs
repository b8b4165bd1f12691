//! Calibration options — configuration for the two fitting workflows.
//!
//! Purpose
//! -------
//! Collect the knobs of both calibrators in one place so fits are explicit
//! and reproducible: the initial-weight policy, parameterization, and
//! trust-region settings of the multinomial fit, and the batching, adaptive
//! step, plateau rule, epoch budget, and RNG seed of the power-transform
//! fit.
//!
//! Key behaviors
//! -------------
//! - [`MultinomialOptions`] bundles [`Init`], [`Parameterization`], and
//!   [`TrustRegionOptions`].
//! - [`TemperatureOptions`] bundles the batch size, [`AdamOptions`],
//!   [`PlateauRule`], the epoch budget, and an optional seed, and validates
//!   the fields it owns directly.
//!
//! Invariants & assumptions
//! ------------------------
//! - Component types (`TrustRegionOptions`, `AdamOptions`, `PlateauRule`)
//!   are validated by their own constructors; this module only checks
//!   `batch_size` and `max_epochs`.
//! - `batch_size = None` means a single full batch per epoch. A batch size
//!   at or above N has the same effect.
//!
//! Downstream usage
//! ----------------
//! - Pass a [`MultinomialOptions`] to `MultinomialCalibrator::new` and a
//!   [`TemperatureOptions`] to `TemperatureCalibrator::new`, or start from
//!   `Default`.
use crate::{
    calibration::{
        core::{adam::AdamOptions, codec::Parameterization, init::Init, plateau::PlateauRule},
        errors::{CalibError, CalibResult},
    },
    optimization::loglik_optimizer::TrustRegionOptions,
};

/// Default mini-batch size of the power-transform fit.
pub const DEFAULT_BATCH_SIZE: usize = 128;

/// Default epoch budget of the power-transform fit.
pub const DEFAULT_MAX_EPOCHS: usize = 1024;

/// MultinomialOptions — configuration of a trust-region calibration fit.
///
/// Fields
/// ------
/// - `init`: [`Init`]
///   Starting weights (random with a sign pattern, identity, or fixed).
/// - `parameterization`: [`Parameterization`]
///   Full (`K² − 1` free parameters) or Diagonal (`K` parameters).
/// - `tr_opts`: [`TrustRegionOptions`]
///   Tolerances, subproblem, radii, acceptance threshold, verbosity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultinomialOptions {
    pub init: Init,
    pub parameterization: Parameterization,
    pub tr_opts: TrustRegionOptions,
}

impl MultinomialOptions {
    /// Package already-validated components. Never fails.
    pub fn new(
        init: Init, parameterization: Parameterization, tr_opts: TrustRegionOptions,
    ) -> Self {
        Self { init, parameterization, tr_opts }
    }
}

/// TemperatureOptions — configuration of a power-transform calibration fit.
///
/// Fields
/// ------
/// - `batch_size`: `Option<usize>`
///   Rows per mini-batch; `None` uses a single batch. Default `Some(128)`.
/// - `adam`: [`AdamOptions`]
///   Step size, decay rates, and stability constant.
/// - `plateau`: [`PlateauRule`]
///   Window and relative factor of the early-stopping rule.
/// - `max_epochs`: `usize`
///   Hard epoch budget. Default 1024.
/// - `seed`: `Option<u64>`
///   Seed of the per-fit shuffling RNG; `None` draws one from the OS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureOptions {
    pub batch_size: Option<usize>,
    pub adam: AdamOptions,
    pub plateau: PlateauRule,
    pub max_epochs: usize,
    pub seed: Option<u64>,
}

impl TemperatureOptions {
    /// Construct validated options.
    ///
    /// Errors
    /// ------
    /// - `CalibError::InvalidBatchSize` for `batch_size == Some(0)`.
    /// - `CalibError::InvalidMaxEpochs` for `max_epochs == 0`.
    pub fn new(
        batch_size: Option<usize>, adam: AdamOptions, plateau: PlateauRule, max_epochs: usize,
        seed: Option<u64>,
    ) -> CalibResult<Self> {
        if batch_size == Some(0) {
            return Err(CalibError::InvalidBatchSize { value: 0 });
        }
        if max_epochs == 0 {
            return Err(CalibError::InvalidMaxEpochs { value: max_epochs });
        }
        Ok(Self { batch_size, adam, plateau, max_epochs, seed })
    }
}

impl Default for TemperatureOptions {
    fn default() -> Self {
        Self {
            batch_size: Some(DEFAULT_BATCH_SIZE),
            adam: AdamOptions::default(),
            plateau: PlateauRule::default(),
            max_epochs: DEFAULT_MAX_EPOCHS,
            seed: None,
        }
    }
}
