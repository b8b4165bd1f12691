//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! This selects a trust-region solver with either the Steihaug or the
//! Cauchy-point subproblem, wraps the model in an `ArgMinAdapter` (which
//! *minimizes* `-ℓ(θ)`), and delegates the run to `run_trust_region`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_trust_region_cauchy, build_trust_region_steihaug},
        run::run_trust_region,
        traits::{LogLikelihood, OptimOutcome, Subproblem, TrustRegionOptions},
        types::Theta,
    },
};

/// Maximize a log-likelihood `ℓ(θ)` with a trust-region Newton method.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an `ArgMinAdapter` exposing `c(θ) = -ℓ(θ)` with
///   its gradient and Hessian.
/// - Builds the solver for `opts.subproblem` and runs it.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors and runtime errors from `run_trust_region`.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_calibration::optimization::errors::OptResult;
/// use rust_calibration::optimization::loglik_optimizer::{
///     LogLikelihood, Theta, TrustRegionOptions, maximize,
/// };
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.1, -0.2, 0.3], &(), &TrustRegionOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_calibration::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &TrustRegionOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.subproblem {
        Subproblem::Steihaug => {
            let solver = build_trust_region_steihaug(opts)?;
            run_trust_region(theta0, opts, problem, solver)
        }
        Subproblem::CauchyPoint => {
            let solver = build_trust_region_cauchy(opts)?;
            run_trust_region(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{
            traits::Tolerances,
            types::{Grad, Hessian},
        },
    };
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Convergence of the Steihaug path on a strictly concave quadratic.
    // - The `check` hook short-circuiting the run.
    // - Iteration-cap termination reported as not converged.
    // -------------------------------------------------------------------------

    /// ℓ(θ) = -½ (θ - m)ᵀ A (θ - m) with A = [[2, 1], [1, 3]], m = (1, -2).
    struct Quadratic;

    impl Quadratic {
        fn a() -> Array2<f64> {
            array![[2.0, 1.0], [1.0, 3.0]]
        }
    }

    impl LogLikelihood for Quadratic {
        type Data = ();
        fn value(&self, t: &Theta, _: &()) -> OptResult<f64> {
            let d = t - &array![1.0, -2.0];
            Ok(-0.5 * d.dot(&Self::a().dot(&d)))
        }
        fn check(&self, t: &Theta, _: &()) -> OptResult<()> {
            if t.len() != 2 {
                return Err(OptError::ThetaLengthMismatch { expected: 2, actual: t.len() });
            }
            Ok(())
        }
        fn grad(&self, t: &Theta, _: &()) -> OptResult<Grad> {
            let d = t - &array![1.0, -2.0];
            Ok(-Self::a().dot(&d))
        }
        fn hessian(&self, _: &Theta, _: &()) -> OptResult<Hessian> {
            Ok(-Self::a())
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `maximize` finds the exact maximizer of a concave quadratic.
    //
    // Given
    // -----
    // - `Quadratic` started at the origin with default options.
    //
    // Expect
    // ------
    // - θ̂ ≈ (1, -2), ℓ(θ̂) ≈ 0, and `converged == true`.
    fn steihaug_finds_quadratic_maximizer() {
        // Arrange
        let opts = TrustRegionOptions::default();

        // Act
        let out = maximize(&Quadratic, array![0.0, 0.0], &(), &opts).unwrap();

        // Assert
        assert!(out.converged, "status: {}", out.status);
        assert_relative_eq!(out.theta_hat[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(out.theta_hat[1], -2.0, epsilon = 1e-6);
        assert_relative_eq!(out.value, 0.0, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Ensure `check` failures are returned before any solver work.
    //
    // Given
    // -----
    // - A length-3 starting vector.
    //
    // Expect
    // ------
    // - `Err(ThetaLengthMismatch { expected: 2, actual: 3 })`.
    fn check_failure_short_circuits() {
        // Arrange
        let opts = TrustRegionOptions::default();

        // Act
        let err = maximize(&Quadratic, array![0.0, 0.0, 0.0], &(), &opts).unwrap_err();

        // Assert
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 2, actual: 3 });
    }

    #[test]
    // Purpose
    // -------
    // Check that reaching the iteration cap is reported as not converged
    // while still returning the best point found.
    //
    // Given
    // -----
    // - Cauchy-point subproblem, a tiny radius, and `max_iter = 1`.
    //
    // Expect
    // ------
    // - `converged == false` and `iterations == 1`.
    fn iteration_cap_is_not_convergence() {
        // Arrange
        let opts = TrustRegionOptions::new(
            Tolerances::new(Some(1e-12), Some(1)).unwrap(),
            Subproblem::CauchyPoint,
            1e-3,
            1e-2,
            0.0,
            false,
        )
        .unwrap();

        // Act
        let out = maximize(&Quadratic, array![0.0, 0.0], &(), &opts).unwrap();

        // Assert
        assert!(!out.converged);
        assert_eq!(out.iterations, 1);
    }
}
