//! loglik_optimizer — argmin-powered trust-region log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], and invoke [`maximize`] to run a trust-region Newton
//! method with configurable radii, acceptance threshold, tolerances, and
//! finite-difference fallbacks for missing derivatives.
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied log-likelihoods `ℓ(θ)` into Argmin-compatible
//!   costs `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`], including the
//!   Hessian required by second-order solvers.
//! - Expose a single entrypoint [`maximize`] that:
//!   - validates the initial guess with [`LogLikelihood::check`],
//!   - selects a solver via [`builders`] based on [`Subproblem`],
//!   - executes it via [`run::run_trust_region`] with the
//!     [`termination::GradientTolerance`] stopping rule, and
//!   - normalizes results into an [`OptimOutcome`].
//! - Provide finite-difference helpers in [`finite_diff`] for gradients and
//!   Hessians when analytic derivatives are missing.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`;
//!   user code implements `ℓ`, `∇ℓ`, and `∇²ℓ`, never the cost directly.
//! - [`LogLikelihood`] methods report invalid inputs as [`OptError`]
//!   values, not panics.
//! - [`OptimOutcome::converged`] is `true` only when the gradient tolerance
//!   was met; an exhausted iteration budget is logged at `warn` level and
//!   reported as not converged.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained optimizer space as [`Theta`];
//!   constrained or structured parameterizations are mapped in the model
//!   layer.
//! - Errors bubble up as [`OptResult<T>`] / [`OptError`].
//!
//! Downstream usage
//! ----------------
//! - Model code implements [`LogLikelihood`] for its types, then calls
//!   [`maximize`] with a model instance, an initial [`Theta`], a data
//!   payload, and [`TrustRegionOptions`].
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions in [`adapter`], solver
//!   construction in [`builders`], derivative fallbacks in [`finite_diff`],
//!   the stopping rule in [`termination`], and end-to-end runs on
//!   quadratics in [`api`].
//! - Integration tests fit the calibration models through [`maximize`].
//!
//! [`OptError`]: crate::optimization::errors::OptError
//! [`OptResult<T>`]: crate::optimization::errors::OptResult

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod observer;
pub mod run;
pub mod termination;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LogLikelihood, OptimOutcome, Subproblem, Tolerances, TrustRegionOptions};
pub use self::types::{Cost, FnEvalMap, Grad, Hessian, Theta};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{
        LogLikelihood, OptimOutcome, Subproblem, Tolerances, TrustRegionOptions,
    };
    pub use super::types::{Cost, Grad, Hessian, Theta};
}
