//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the
//! second-order log-likelihood optimizer, so the rest of the optimization
//! code stays agnostic to `ndarray` and Argmin generics.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients, Hessians,
//!   and scalar costs (`Theta`, `Grad`, `Hessian`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose pre-wired trust-region solver aliases for the two supported
//!   subproblem solvers, plus the Argmin state type they iterate over.
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors and matrices are `ndarray` containers over `f64`.
//! - `Cost` is always a scalar `f64`; higher layers handle the sign flip
//!   between cost and log-likelihood.
//! - The Steihaug subproblem requires `Grad == Theta`, which holds because
//!   both are `Array1<f64>`.
//!
//! Conventions
//! -----------
//! - `Hessian` is a dense square matrix of dimension `theta.len()`.
//! - [`DEFAULT_STEIHAUG_MAX_ITER`] bounds the inner conjugate-gradient loop
//!   of the Steihaug subproblem.
use argmin::{
    core::IterState,
    solver::trustregion::{CauchyPoint, Steihaug, TrustRegion},
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ` for log-likelihood optimization.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Dense Hessian matrix; `n × n` for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value used by the optimizer: the cost `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`, `"hessian_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Upper bound on inner CG iterations for the Steihaug subproblem.
pub const DEFAULT_STEIHAUG_MAX_ITER: u64 = 1_000;

/// Argmin state carried by the trust-region solvers.
pub type NewtonState = IterState<Theta, Grad, (), Hessian, (), Cost>;

/// Steihaug truncated-CG subproblem specialized to this crate's types.
pub type SteihaugSub = Steihaug<Theta, Cost>;

/// Cauchy-point subproblem specialized to this crate's types.
pub type CauchySub = CauchyPoint<Cost>;

/// Trust-region Newton solver driven by the Steihaug subproblem.
pub type TrustRegionSteihaug = TrustRegion<SteihaugSub, Cost>;

/// Trust-region Newton solver driven by the Cauchy-point subproblem.
pub type TrustRegionCauchy = TrustRegion<CauchySub, Cost>;
