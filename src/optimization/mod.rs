//! optimization — trust-region MLE stack, numerical helpers, and error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer the calibration models are fitted with:
//! an Argmin-backed trust-region log-likelihood maximizer, numerically
//! stable softmax/log helpers, and a single error/result surface. Callers
//! implement a log-likelihood, choose tolerances and trust-region settings,
//! and obtain fitted parameters and diagnostics without touching backend
//! solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`), including the choice of trust-region subproblem,
//!   radii, acceptance threshold, and stopping criteria.
//! - Supply shared numerical primitives (`numerical_stability`): clipping
//!   before logarithms and max-shifted softmax / log-sum-exp.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ` and assume
//!   that inputs are finite once validation has passed; invalid states are
//!   reported as `OptError`, not panics.
//! - Model-layer failures raised inside an objective (wrong parameter
//!   length, non-finite entries) travel through Argmin and come back as
//!   `OptError` values.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize a log-likelihood `ℓ(θ)` by minimizing
//!   an internal cost `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are
//!   expressed in terms of `ℓ`.
//! - Parameters, gradients, and Hessians are `ndarray`-based aliases
//!   (`Theta`, `Grad`, `Hessian`); structured parameterizations are mapped
//!   in the model layer.
//! - Progress is reported through the `log` facade: per-iteration `debug`
//!   records when `verbose` is set, and a `warn` record when a run stops
//!   without converging.
//!
//! Downstream usage
//! ----------------
//! - Model code implements `LogLikelihood` for its types and calls
//!   `maximize` with a parameter guess, data payload, and
//!   `TrustRegionOptions` to obtain an `OptimOutcome`.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - `loglik_optimizer`: solver wiring, tolerance handling, the gradient
//!   stopping rule, and end-to-end runs on quadratics.
//! - `numerical_stability`: clipping bounds and agreement of the stable
//!   reductions with naive formulas on safe inputs.
//! - `errors`: conversions from backend/model errors into `OptError`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_calibration::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
