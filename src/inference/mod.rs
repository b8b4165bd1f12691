//! inference — curvature diagnostics and standard errors for fitted models.
//!
//! Purpose
//! -------
//! Provide post-estimation summaries on top of a fitted calibration model.
//! Everything here works from the cost Hessian (observed information) in the
//! optimizer parameter space `θ`.
//!
//! Key behaviors
//! -------------
//! - [`curvature_summary`] reports the eigenvalue range of the Hessian at the
//!   solution and whether it is positive semidefinite, so callers can tell
//!   a genuine minimum from a saddle or flat region.
//! - [`standard_errors`] converts observed information into classical
//!   standard errors through an eigen pseudoinverse.
//!
//! Conventions
//! -----------
//! - Parameters `θ` are the flat optimizer vector of the chosen
//!   parameterization; the model layer pulls Hessians back onto it before
//!   calling in here.
//! - Failures are reported as `OptResult` values; nothing here logs.

pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::{CurvatureSummary, curvature_summary, standard_errors};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::hessian::{CurvatureSummary, curvature_summary, standard_errors};
}
