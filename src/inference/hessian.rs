//! inference::hessian — curvature diagnostics and standard errors.
//!
//! Purpose
//! -------
//! Turn a Hessian of the cost (the observed information `J(θ̂)` of a fitted
//! model) into two post-fit summaries: the spread of its eigenvalues, which
//! tells whether the solution sits in a convex neighborhood, and classical
//! standard errors from the Moore–Penrose pseudoinverse `J⁺`.
//!
//! Key behaviors
//! -------------
//! - Copy the `ndarray` matrix into a `nalgebra::DMatrix` ([`fill_dmatrix`])
//!   for symmetric eigendecomposition.
//! - [`curvature_summary`]: smallest/largest eigenvalue and a PSD flag with
//!   a scale-aware tolerance.
//! - [`standard_errors`]: `sqrt(diag(J⁺))` with eigenvalues at or below
//!   [`EIGEN_EPS`] dropped.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input matrices are square, finite, and symmetric up to rounding; the
//!   multinomial engine mirrors its blocks exactly, and finite-difference
//!   Hessians are symmetrized upstream.
//! - The matrix is on the **summed** cost scale, so standard errors are
//!   those of the maximum-likelihood estimate for the full sample.
//!
//! Conventions
//! -----------
//! - No explicit inverse is formed; all computations use the symmetric
//!   eigendecomposition `J = Q Λ Qᵀ`.
//! - Errors are reported via [`OptResult<T>`].
//!
//! Downstream usage
//! ----------------
//! - The multinomial calibrator records a [`CurvatureSummary`] after each
//!   trust-region fit and exposes [`standard_errors`] on request.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{types::Hessian, validation::validate_hessian},
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::Array1;

/// Eigenvalue extremes of a symmetric Hessian at a fitted solution.
///
/// - `min_eigenvalue` / `max_eigenvalue`: extremes of the spectrum.
/// - `positive_semidefinite`: `min_eigenvalue >= -EIGEN_EPS · max(1, |max_eigenvalue|)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvatureSummary {
    pub min_eigenvalue: f64,
    pub max_eigenvalue: f64,
    pub positive_semidefinite: bool,
}

/// curvature_summary — eigenvalue range and PSD flag of a cost Hessian.
///
/// Parameters
/// ----------
/// - `hessian`: `&Hessian`
///   Square symmetric matrix, typically the Hessian of the cost at θ̂.
///
/// Returns
/// -------
/// `OptResult<CurvatureSummary>`. An empty (0×0) matrix yields zeros and
/// `positive_semidefinite = true`.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch` for a non-square matrix.
/// - `OptError::InvalidHessian` for non-finite entries.
pub fn curvature_summary(hessian: &Hessian) -> OptResult<CurvatureSummary> {
    let n = hessian.nrows();
    validate_hessian(hessian, n)?;
    if n == 0 {
        return Ok(CurvatureSummary {
            min_eigenvalue: 0.0,
            max_eigenvalue: 0.0,
            positive_semidefinite: true,
        });
    }
    let eigenvalues = to_dmatrix(hessian).symmetric_eigenvalues();
    let min_eigenvalue = eigenvalues.min();
    let max_eigenvalue = eigenvalues.max();
    let scale = max_eigenvalue.abs().max(1.0);
    Ok(CurvatureSummary {
        min_eigenvalue,
        max_eigenvalue,
        positive_semidefinite: min_eigenvalue >= -EIGEN_EPS * scale,
    })
}

/// standard_errors — classical standard errors from observed information.
///
/// Purpose
/// -------
/// Compute `SE(θ̂_i) = sqrt([J⁺]_{ii})` from the observed information
/// `J(θ̂)` (the cost Hessian at the optimum).
///
/// Returns
/// -------
/// `OptResult<Array1<f64>>` of length `n`. Directions with eigenvalues at or
/// below [`EIGEN_EPS`] contribute nothing, so parameters that lie entirely
/// in such directions get a standard error of 0.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` from
///   validation.
/// - `OptError::ModelError` if the decomposition produced non-finite values.
pub fn standard_errors(hessian: &Hessian) -> OptResult<Array1<f64>> {
    let n = hessian.nrows();
    validate_hessian(hessian, n)?;
    let se = solve_for_se(to_dmatrix(hessian), n);
    if se.iter().any(|v| !v.is_finite()) {
        return Err(OptError::ModelError {
            text: "eigendecomposition of the observed information is not finite".to_string(),
        });
    }
    Ok(se)
}

// ---- Helper methods ----

fn to_dmatrix(hessian: &Hessian) -> DMatrix<f64> {
    let mut out = DMatrix::<f64>::zeros(hessian.nrows(), hessian.ncols());
    fill_dmatrix(hessian, &mut out);
    out
}

/// Copy a square `ndarray` matrix into a preallocated `DMatrix`, column by
/// column to match `nalgebra`'s storage order.
fn fill_dmatrix(obs_info: &Hessian, obs_info_nalg: &mut DMatrix<f64>) {
    let n = obs_info.ncols();
    for j in 0..n {
        for i in 0..obs_info.nrows() {
            obs_info_nalg[(i, j)] = obs_info[[i, j]];
        }
    }
}

/// `Var(θ̂_i) = Σ_{k: λ_k > EIGEN_EPS} Q[i,k]² / λ_k`, returned as its root.
fn solve_for_se(obs_info_nalg: DMatrix<f64>, n: usize) -> Array1<f64> {
    let eigen_decomp = obs_info_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    let mut se = Array1::<f64>::zeros(n);
    for i in 0..n {
        se[i] = eigenvals
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum::<f64>()
            .sqrt();
    }
    se
}
