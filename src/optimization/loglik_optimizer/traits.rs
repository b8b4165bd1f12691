//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait users implement for their model.
//! - [`TrustRegionOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`Subproblem`]: choice of trust-region subproblem solver.
//! - [`OptimOutcome`]: normalized result returned by the high-level `maximize` API.
//!
//! Convention: we *maximize* a user log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. Analytic derivatives, when provided, are derivatives of the
//! log-likelihood (`∇ℓ(θ)`, `∇²ℓ(θ)`); the adapter flips the signs.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        types::{Cost, FnEvalMap, Grad, Hessian, Theta},
        validation::{
            validate_theta_hat, validate_value, verify_eta, verify_max_iter, verify_radii,
            verify_tol_grad,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented log-likelihood interface.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook called once
///   before optimization.
///
/// Optional:
/// - `grad`: analytic gradient `∇ℓ(θ)`. Falls back to finite differences of
///   the cost.
/// - `hessian`: analytic Hessian `∇²ℓ(θ)`. Falls back to finite differences
///   of the gradient.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
    fn hessian(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Hessian> {
        Err(OptError::HessianNotImplemented)
    }
}

/// Trust-region subproblem solver.
///
/// - `Steihaug`: truncated conjugate gradient; follows negative curvature to
///   the region boundary, so it is the default for Newton-type fits.
/// - `CauchyPoint`: steepest-descent step clipped to the region.
///
/// Parses case-insensitively from `"steihaug"` / `"cauchy"` / `"cauchypoint"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subproblem {
    Steihaug,
    CauchyPoint,
}

impl FromStr for Subproblem {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "steihaug" => Ok(Subproblem::Steihaug),
            "cauchy" | "cauchypoint" => Ok(Subproblem::CauchyPoint),
            _ => Err(OptError::InvalidSubproblem {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'Steihaug' or 'CauchyPoint'.",
            }),
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the cost-gradient norm falls below this value.
/// - `max_iter`: hard cap on the number of outer iterations.
///
/// Either field can be `None` but **at least one** must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if both are `None`.
    /// - [`OptError::InvalidTolGrad`] for a non-finite or non-positive tolerance.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(tol_grad: Option<f64>, max_iter: Option<usize>) -> OptResult<Self> {
        if tol_grad.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_max_iter(max_iter)?;
        Ok(Self { tol_grad, max_iter })
    }
}

/// Optimizer-level configuration for the trust-region Newton solver.
///
/// Fields:
/// - `tols`: gradient tolerance and iteration cap.
/// - `subproblem`: how each trust-region step is computed.
/// - `initial_radius` / `max_radius`: starting and largest trust radius.
/// - `eta`: minimum ratio of actual to predicted decrease for a step to be
///   accepted.
/// - `verbose`: attach a per-iteration `log` observer.
///
/// Default: `tol_grad = 1e-8`, `max_iter = 10_000`, `Steihaug`, radius `1.0`,
/// max radius `1e32`, `eta = 0.0`, not verbose.
#[derive(Debug, Clone, PartialEq)]
pub struct TrustRegionOptions {
    pub tols: Tolerances,
    pub subproblem: Subproblem,
    pub initial_radius: f64,
    pub max_radius: f64,
    pub eta: f64,
    pub verbose: bool,
}

impl TrustRegionOptions {
    /// Create validated trust-region options.
    ///
    /// # Errors
    /// - [`OptError::InvalidTrustRadius`] for non-finite, non-positive or
    ///   inverted radii.
    /// - [`OptError::InvalidEta`] when `eta ∉ [0, 0.25)`.
    pub fn new(
        tols: Tolerances, subproblem: Subproblem, initial_radius: f64, max_radius: f64, eta: f64,
        verbose: bool,
    ) -> OptResult<Self> {
        verify_radii(initial_radius, max_radius)?;
        verify_eta(eta)?;
        Ok(Self { tols, subproblem, initial_radius, max_radius, eta, verbose })
    }
}

impl Default for TrustRegionOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-8), max_iter: Some(10_000) },
            subproblem: Subproblem::Steihaug,
            initial_radius: 1.0,
            max_radius: 1e32,
            eta: 0.0,
            verbose: false,
        }
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** value `ℓ(θ)` (not the cost).
/// - `converged`: `true` only when the gradient tolerance was met (or a
///   target cost was reached); hitting the iteration cap is not convergence.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match &termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => {
                let converged = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                (converged, format!("{termination:?}"))
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parsing of `Subproblem` names.
    // - Validation rules of `Tolerances` and `TrustRegionOptions`.
    // - Mapping of Argmin termination statuses into `converged`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure subproblem names parse case-insensitively and unknown names fail.
    //
    // Given
    // -----
    // - "STEIHAUG", "cauchy", and "dogleg".
    //
    // Expect
    // ------
    // - The first two parse; "dogleg" yields `InvalidSubproblem`.
    fn subproblem_parses_case_insensitively() {
        // Arrange / Act
        let s = "STEIHAUG".parse::<Subproblem>();
        let c = "cauchy".parse::<Subproblem>();
        let bad = "dogleg".parse::<Subproblem>();

        // Assert
        assert_eq!(s, Ok(Subproblem::Steihaug));
        assert_eq!(c, Ok(Subproblem::CauchyPoint));
        assert!(matches!(bad, Err(OptError::InvalidSubproblem { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Verify that `Tolerances::new` rejects empty and invalid configurations
    // and that the default options pass their own validation.
    //
    // Given
    // -----
    // - `(None, None)`, `(Some(-1.0), None)`, `(None, Some(0))`.
    // - `TrustRegionOptions::default()` fields fed back into `new`.
    //
    // Expect
    // ------
    // - The three invalid sets fail with the matching variants; defaults pass.
    fn tolerances_and_options_validation() {
        // Arrange
        let d = TrustRegionOptions::default();

        // Act
        let rebuilt = TrustRegionOptions::new(
            Tolerances::new(d.tols.tol_grad, d.tols.max_iter).unwrap(),
            d.subproblem,
            d.initial_radius,
            d.max_radius,
            d.eta,
            d.verbose,
        );

        // Assert
        assert_eq!(Tolerances::new(None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(Tolerances::new(Some(-1.0), None), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(Tolerances::new(None, Some(0)), Err(OptError::InvalidMaxIter { .. })));
        assert_eq!(rebuilt, Ok(d));
    }

    #[test]
    // Purpose
    // -------
    // Check that only a genuine convergence status counts as converged.
    //
    // Given
    // -----
    // - `SolverConverged` and `MaxItersReached` terminations.
    //
    // Expect
    // ------
    // - `converged` is true for the first and false for the second.
    fn only_solver_convergence_counts_as_converged() {
        // Arrange
        let theta = array![0.5, -0.5];
        let conv = TerminationStatus::Terminated(TerminationReason::SolverConverged);
        let capped = TerminationStatus::Terminated(TerminationReason::MaxItersReached);

        // Act
        let a = OptimOutcome::new(Some(theta.clone()), -1.0, conv, 4, FnEvalMap::new(), None)
            .unwrap();
        let b = OptimOutcome::new(Some(theta), -1.0, capped, 10, FnEvalMap::new(), None).unwrap();

        // Assert
        assert!(a.converged);
        assert!(!b.converged);
        assert_eq!(b.iterations, 10);
    }
}
