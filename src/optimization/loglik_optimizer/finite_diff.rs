//! loglik_optimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient and Hessian approximations around a
//! parameter vector, together with validation and symmetry cleanup, so that
//! the adapter can supply derivatives to the trust-region solver when a
//! model does not implement them analytically.
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`]: central differences first, forward differences when
//!   the closure failed or the central result does not validate.
//! - [`run_fd_diff`]: forward-difference gradient with error capture.
//! - [`compute_hessian`]: central-difference Hessian of a gradient map,
//!   falling back to forward differences, then symmetrized.
//!
//! Invariants & assumptions
//! ------------------------
//! - Closures cannot return `Result`; they store the first error in a
//!   shared `RefCell<Option<Error>>` and return `NaN`. Any captured error is
//!   a hard failure for the path that produced it.
//! - Gradients and Hessians returned from this module satisfy
//!   [`validate_grad`] and [`validate_hessian`].
//!
//! Conventions
//! -----------
//! - Differences are taken with respect to the unconstrained optimizer
//!   vector `Theta`; any reparameterization lives in the model layer.
//!
//! Testing notes
//! -------------
//! - Unit tests cover successful and failing paths for both derivative
//!   kinds, including the central→forward fallback.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::{Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// fd_gradient — gradient of a scalar closure with central→forward fallback.
///
/// Parameters
/// ----------
/// - `theta`: point of evaluation.
/// - `func`: scalar objective that routes errors into `closure_err` and
///   returns `NaN` in that case.
/// - `closure_err`: shared error slot, cleared on entry.
///
/// Returns
/// -------
/// A validated gradient. The central estimate is used when no error was
/// captured and it validates; otherwise the result of [`run_fd_diff`].
///
/// Errors
/// ------
/// - Any error captured by the forward pass, or a validation error.
pub fn fd_gradient<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let central = theta.central_diff(func);
    if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_fd_diff(theta, func, closure_err)
}

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, runs `forward_diff`, returns the captured error if
/// one was written, and otherwise validates the gradient.
///
/// Errors
/// ------
/// - `OptError` (via `From<Error>`) for a captured closure error.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// compute_hessian — finite-difference Hessian with validation and symmetry.
///
/// Purpose
/// -------
/// Approximate the Hessian by differencing a gradient map `f` at `theta`,
/// preferring central differences and falling back to forward differences
/// when the central result fails validation.
///
/// Returns
/// -------
/// A `dim × dim` finite matrix, symmetrized by averaging off-diagonal pairs.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   forward-difference fallback also fails validation. The central error
///   is discarded.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

/// Replace each off-diagonal pair with its average; diagonal untouched.
pub(crate) fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
