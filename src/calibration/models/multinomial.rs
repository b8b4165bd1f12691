//! Multinomial calibrator — trust-region Newton fit of the constrained
//! multinomial logistic recalibration map.
//!
//! The model exposes `ℓ(θ) = −CE(θ)` (summed cross-entropy) through
//! [`LogLikelihood`], with analytic gradient and Hessian from the engine
//! pulled back onto the chosen [`Parameterization`]. After a fit it stores
//! the optimizer outcome, the decoded weights, the observed information at
//! the solution, and its curvature summary.
use crate::{
    calibration::{
        core::{
            codec::{Parameterization, WeightMatrix},
            data::{CalibData, DesignData, augment_with_bias, validate_scores},
            engine::{gradient, hessian, objective, pullback_gradient, pullback_hessian},
            options::MultinomialOptions,
            outputs::{calculate_outputs, predict_labels},
        },
        errors::{CalibError, CalibResult},
    },
    inference::hessian::{CurvatureSummary, curvature_summary, standard_errors},
    optimization::{
        errors::OptResult,
        loglik_optimizer::{Grad, Hessian, LogLikelihood, OptimOutcome, Theta, maximize},
    },
};
use ndarray::{Array1, Array2, ArrayView2};

/// Multinomial calibration model fitted by a trust-region Newton method.
///
/// # Notes
/// - `results`, `fitted_weights`, `observed_information`, and `curvature`
///   are populated by [`MultinomialCalibrator::fit`].
/// - With zero samples the optimizer is skipped: the initial weights are
///   kept and `results` stays `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultinomialCalibrator {
    /// Init policy, parameterization, and trust-region settings.
    pub options: MultinomialOptions,
    /// Optimizer outcome of the last fit.
    pub results: Option<OptimOutcome>,
    /// Decoded `(K+1)×(K−1)` weights of the last fit.
    pub fitted_weights: Option<WeightMatrix>,
    /// Cost Hessian at the solution, in the parameterization's θ-space.
    pub observed_information: Option<Hessian>,
    /// Eigenvalue summary of `observed_information`.
    pub curvature: Option<CurvatureSummary>,
}

impl MultinomialCalibrator {
    pub fn new(options: MultinomialOptions) -> Self {
        Self {
            options,
            results: None,
            fitted_weights: None,
            observed_information: None,
            curvature: None,
        }
    }

    /// Fit the calibration weights to `data`.
    ///
    /// ## Steps
    /// 1. Build the augmented features and one-hot targets.
    /// 2. Draw the initial weights from `options.init` and encode them with
    ///    `options.parameterization`.
    /// 3. Maximize ℓ with the configured trust-region solver.
    /// 4. Decode θ̂, then evaluate the analytic Hessian at θ̂ and summarize
    ///    its curvature. An indefinite Hessian is logged at `warn` level and
    ///    otherwise left alone.
    ///
    /// ## Errors
    /// - Initialization errors (`InitShapeMismatch`, `TooFewClasses`).
    /// - Optimizer failures, converted from `OptError`.
    ///
    /// Non-convergence is not an error; check `results.converged`.
    pub fn fit(&mut self, data: &CalibData) -> CalibResult<()> {
        let k = data.n_classes();
        let parameterization = self.options.parameterization;
        let design = DesignData::from_calib(data);
        let w0 = self.options.init.initial_weights(k)?;
        let theta0 = parameterization.encode(&w0);

        if design.n_samples() == 0 {
            log::info!("no calibration samples; keeping the initial weights");
            self.results = None;
            self.fitted_weights = Some(parameterization.decode(&theta0, k)?);
            self.observed_information = None;
            self.curvature = None;
            return Ok(());
        }

        let outcome = maximize(&*self, theta0, &design, &self.options.tr_opts)?;
        let weights = parameterization.decode(&outcome.theta_hat, k)?;
        let info = pullback_hessian(&parameterization.jacobian(k), &hessian(&design, &weights));
        let curvature = curvature_summary(&info)?;
        if !curvature.positive_semidefinite {
            log::warn!(
                "Hessian at the solution is indefinite (min eigenvalue {:.3e})",
                curvature.min_eigenvalue
            );
        }
        log::info!(
            "multinomial calibration: ell = {:.6}, converged = {}, iterations = {}",
            outcome.value,
            outcome.converged,
            outcome.iterations
        );

        self.results = Some(outcome);
        self.fitted_weights = Some(weights);
        self.observed_information = Some(info);
        self.curvature = Some(curvature);
        Ok(())
    }

    /// Fitted weights.
    pub fn weights(&self) -> CalibResult<&WeightMatrix> {
        self.fitted_weights.as_ref().ok_or(CalibError::ModelNotFitted)
    }

    /// Score coefficients, `(K−1)×K`.
    pub fn coef(&self) -> CalibResult<Array2<f64>> {
        Ok(self.weights()?.coef())
    }

    /// Intercepts, length `K−1`.
    pub fn intercept(&self) -> CalibResult<Array1<f64>> {
        Ok(self.weights()?.intercept())
    }

    /// Calibrated probabilities for new raw scores (`M×K`).
    ///
    /// ## Errors
    /// - `CalibError::ModelNotFitted` before a fit.
    /// - `CalibError::NonFiniteScore` / `CalibError::TooFewClasses` for
    ///   invalid scores.
    /// - `CalibError::ClassCountMismatch` when the width differs from the fit.
    pub fn predict_proba(&self, scores: ArrayView2<f64>) -> CalibResult<Array2<f64>> {
        let weights = self.weights()?;
        validate_scores(scores)?;
        if scores.ncols() != weights.n_classes() {
            return Err(CalibError::ClassCountMismatch {
                expected: weights.n_classes(),
                found: scores.ncols(),
            });
        }
        Ok(calculate_outputs(augment_with_bias(scores).view(), weights))
    }

    /// Most probable class per row.
    pub fn predict(&self, scores: ArrayView2<f64>) -> CalibResult<Array1<usize>> {
        Ok(predict_labels(self.predict_proba(scores)?.view()))
    }

    /// Standard errors of θ̂ from the observed information at the solution.
    pub fn standard_errors(&self) -> CalibResult<Array1<f64>> {
        let info = self.observed_information.as_ref().ok_or(CalibError::ModelNotFitted)?;
        Ok(standard_errors(info)?)
    }

    /// Optimizer outcome of the last fit, if the optimizer ran.
    pub fn results(&self) -> Option<&OptimOutcome> {
        self.results.as_ref()
    }

    fn parameterization(&self) -> Parameterization {
        self.options.parameterization
    }
}

impl LogLikelihood for MultinomialCalibrator {
    type Data = DesignData;

    /// `ℓ(θ) = −Σ_n ln p_{n, y_n}`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let weights = self.parameterization().decode(theta, data.k)?;
        Ok(-objective(data, &weights))
    }

    /// θ must have the parameterization's length and finite entries.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        self.parameterization().decode(theta, data.k)?;
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let parameterization = self.parameterization();
        let weights = parameterization.decode(theta, data.k)?;
        let full = gradient(data, &weights);
        let grad = match parameterization {
            Parameterization::Full => full,
            Parameterization::Diagonal => {
                pullback_gradient(&parameterization.jacobian(data.k), &full)
            }
        };
        Ok(-grad)
    }

    fn hessian(&self, theta: &Theta, data: &Self::Data) -> OptResult<Hessian> {
        let parameterization = self.parameterization();
        let weights = parameterization.decode(theta, data.k)?;
        let full = hessian(data, &weights);
        let hess = match parameterization {
            Parameterization::Full => full,
            Parameterization::Diagonal => {
                pullback_hessian(&parameterization.jacobian(data.k), &full)
            }
        };
        Ok(-hess)
    }
}
