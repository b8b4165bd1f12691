//! loglik_optimizer::builders — trust-region solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the trust-region Newton solvers used
//! by the log-likelihood optimizer. These helpers hide Argmin's generic
//! wiring and apply crate-level options (radii, acceptance threshold) so
//! that higher-level code can request a configured solver without touching
//! Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct trust-region solvers with either the Steihaug or the
//!   Cauchy-point subproblem.
//! - Apply the initial radius, maximum radius, and `eta` from
//!   [`TrustRegionOptions`] via a shared configuration helper.
//! - Leave the initial parameter vector, iteration cap, and gradient
//!   tolerance to the runner, keeping these builders side-effect free.
//!
//! Invariants & assumptions
//! ------------------------
//! - Options were validated by `TrustRegionOptions::new`; Argmin repeats
//!   the radius/eta checks and any rejection surfaces as an [`OptError`]
//!   through the crate's `From<Error>` implementation.
//! - Argmin's radius update ratios (shrink below 0.25, expand above 0.75
//!   at the boundary) are fixed by the backend.
//!
//! Testing notes
//! -------------
//! - Unit tests check that valid defaults build for both subproblems and
//!   that an invalid radius passed directly to the helper is rejected.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::trustregion::TrustRegion;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::TrustRegionOptions,
        types::{
            CauchySub, Cost, DEFAULT_STEIHAUG_MAX_ITER, SteihaugSub, TrustRegionCauchy,
            TrustRegionSteihaug,
        },
    },
};

/// build_trust_region_steihaug — trust-region Newton with truncated CG steps.
///
/// Parameters
/// ----------
/// - `opts`: `&TrustRegionOptions`
///   Source of `initial_radius`, `max_radius`, and `eta`.
///
/// Returns
/// -------
/// `OptResult<TrustRegionSteihaug>` with the inner CG loop capped at
/// [`DEFAULT_STEIHAUG_MAX_ITER`].
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
///   radius or threshold.
pub fn build_trust_region_steihaug(opts: &TrustRegionOptions) -> OptResult<TrustRegionSteihaug> {
    let steihaug = SteihaugSub::new().with_max_iters(DEFAULT_STEIHAUG_MAX_ITER);
    configure_trust_region(TrustRegion::new(steihaug), opts)
}

/// build_trust_region_cauchy — trust-region method with Cauchy-point steps.
///
/// Same configuration and errors as [`build_trust_region_steihaug`].
pub fn build_trust_region_cauchy(opts: &TrustRegionOptions) -> OptResult<TrustRegionCauchy> {
    configure_trust_region(TrustRegion::new(CauchySub::new()), opts)
}

/// configure_trust_region — apply radii and acceptance threshold.
///
/// Generic over the subproblem type `R` so both builders share one wiring
/// path.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) from `with_radius`,
///   `with_max_radius`, or `with_eta`.
pub fn configure_trust_region<R>(
    solver: TrustRegion<R, Cost>, opts: &TrustRegionOptions,
) -> OptResult<TrustRegion<R, Cost>> {
    let solver = solver
        .with_radius(opts.initial_radius)?
        .with_max_radius(opts.max_radius)?
        .with_eta(opts.eta)?;
    Ok(solver)
}
