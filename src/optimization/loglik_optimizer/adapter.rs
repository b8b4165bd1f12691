//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic derivatives (if
//! provided by the user) are negated accordingly. Finite-difference fallbacks
//! differentiate the **cost** (for the gradient) or the **cost gradient**
//! (for the Hessian), so no sign flip is needed in those branches.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::{compute_hessian, fd_gradient},
        traits::LogLikelihood,
        types::{Cost, Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::{CostFunction, Error, Gradient, Hessian as ArgminHessian};

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction`, `Gradient`,
/// and `Hessian` traits.
///
/// - `cost` returns `-ℓ(θ)`.
/// - `gradient` returns `-∇ℓ(θ)` or a finite-difference gradient of the cost.
/// - `hessian` returns `-∇²ℓ(θ)` or a finite-difference Jacobian of the cost
///   gradient.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user's `value`.
    /// - `NonFiniteCost` if the value is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// If the user implements `grad`, it is validated and negated. On
    /// `GradientNotImplemented` the cost is finite-differenced (central,
    /// then forward). Errors raised by the cost inside the FD closure are
    /// captured in a `RefCell` and re-raised afterwards.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                Ok(fd_gradient(theta, &cost_func, &closure_err)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgminHessian for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Hessian = Hessian;

    /// Evaluate the Hessian of the cost at `θ`.
    ///
    /// If the user implements `hessian`, it is validated and negated. On
    /// `HessianNotImplemented` the cost gradient (analytic or FD) is
    /// differentiated numerically and symmetrized. A gradient failure inside
    /// the FD closure is captured and takes precedence over the validation
    /// error it causes.
    fn hessian(&self, theta: &Self::Param) -> Result<Self::Hessian, Error> {
        match self.f.hessian(theta, self.data) {
            Ok(h) => {
                validate_hessian(&h, theta.len())?;
                Ok(-h)
            }
            Err(OptError::HessianNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let grad_func = |theta: &Theta| -> Grad {
                    match self.gradient(theta) {
                        Ok(g) => g,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            Grad::from_elem(theta.len(), f64::NAN)
                        }
                    }
                };
                let hess = compute_hessian(&grad_func, theta);
                if let Some(err) = closure_err.take() {
                    return Err(err);
                }
                Ok(hess?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sign flips between log-likelihood and cost for all three derivatives.
    // - Finite-difference fallbacks when derivatives are not implemented.
    // - Rejection of non-finite log-likelihood values.
    // -------------------------------------------------------------------------

    /// ℓ(θ) = -(θ₀² + 2θ₁²) with analytic derivatives.
    struct AnalyticBowl;

    impl LogLikelihood for AnalyticBowl {
        type Data = ();
        fn value(&self, t: &Theta, _: &()) -> OptResult<f64> {
            Ok(-(t[0] * t[0] + 2.0 * t[1] * t[1]))
        }
        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
        fn grad(&self, t: &Theta, _: &()) -> OptResult<Grad> {
            Ok(array![-2.0 * t[0], -4.0 * t[1]])
        }
        fn hessian(&self, _: &Theta, _: &()) -> OptResult<Hessian> {
            Ok(array![[-2.0, 0.0], [0.0, -4.0]])
        }
    }

    /// Same bowl, value only.
    struct NumericBowl;

    impl LogLikelihood for NumericBowl {
        type Data = ();
        fn value(&self, t: &Theta, _: &()) -> OptResult<f64> {
            Ok(-(t[0] * t[0] + 2.0 * t[1] * t[1]))
        }
        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    /// Same bowl, analytic gradient only.
    struct GradOnlyBowl;

    impl LogLikelihood for GradOnlyBowl {
        type Data = ();
        fn value(&self, t: &Theta, _: &()) -> OptResult<f64> {
            Ok(-(t[0] * t[0] + 2.0 * t[1] * t[1]))
        }
        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
        fn grad(&self, t: &Theta, _: &()) -> OptResult<Grad> {
            Ok(array![-2.0 * t[0], -4.0 * t[1]])
        }
    }

    struct Broken;

    impl LogLikelihood for Broken {
        type Data = ();
        fn value(&self, _: &Theta, _: &()) -> OptResult<f64> {
            Ok(f64::NAN)
        }
        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that analytic derivatives are negated into cost space.
    //
    // Given
    // -----
    // - `AnalyticBowl` at θ = (1, -1).
    //
    // Expect
    // ------
    // - cost = 3, gradient = (2, -4), Hessian = diag(2, 4).
    fn analytic_derivatives_are_sign_flipped() {
        // Arrange
        let theta = array![1.0, -1.0];
        let adapter = ArgMinAdapter::new(&AnalyticBowl, &());

        // Act
        let c = adapter.cost(&theta).unwrap();
        let g = adapter.gradient(&theta).unwrap();
        let h = adapter.hessian(&theta).unwrap();

        // Assert
        assert_eq!(c, 3.0);
        assert_eq!(g, array![2.0, -4.0]);
        assert_eq!(h, array![[2.0, 0.0], [0.0, 4.0]]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure finite-difference fallbacks agree with the analytic cost
    // derivatives.
    //
    // Given
    // -----
    // - `NumericBowl` (value only) for the gradient and `GradOnlyBowl` for
    //   the Hessian, both at θ = (1, -1).
    //
    // Expect
    // ------
    // - Gradient ≈ (2, -4) and Hessian ≈ diag(2, 4).
    fn finite_difference_fallbacks_match_analytic() {
        // Arrange
        let theta = array![1.0, -1.0];
        let value_only = ArgMinAdapter::new(&NumericBowl, &());
        let grad_only = ArgMinAdapter::new(&GradOnlyBowl, &());

        // Act
        let g = value_only.gradient(&theta).unwrap();
        let h: Array2<f64> = grad_only.hessian(&theta).unwrap();

        // Assert
        assert_relative_eq!(g[0], 2.0, epsilon = 1e-5);
        assert_relative_eq!(g[1], -4.0, epsilon = 1e-5);
        assert_relative_eq!(h[[0, 0]], 2.0, epsilon = 1e-3);
        assert_relative_eq!(h[[1, 1]], 4.0, epsilon = 1e-3);
        assert_relative_eq!(h[[0, 1]], 0.0, epsilon = 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // Check that a NaN log-likelihood is rejected as a non-finite cost.
    //
    // Given
    // -----
    // - `Broken`, whose value is always NaN.
    //
    // Expect
    // ------
    // - `cost` errors and converts back to `OptError::NonFiniteCost`.
    fn non_finite_value_is_rejected() {
        // Arrange
        let adapter = ArgMinAdapter::new(&Broken, &());

        // Act
        let err = adapter.cost(&array![0.0]).unwrap_err();

        // Assert
        assert!(matches!(OptError::from(err), OptError::NonFiniteCost { .. }));
    }
}
