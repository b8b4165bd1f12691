//! core — building blocks of the calibration models.
//!
//! Purpose
//! -------
//! Hold everything the two calibrators share or compose: validated data
//! containers, the weight codec, the probability model, the
//! loss/gradient/Hessian engine, initial-weight policies, the scalar
//! adaptive update, the plateau rule, and the option structs.
//!
//! Key behaviors
//! -------------
//! - [`data`]: [`CalibData`] validation and the derived [`DesignData`]
//!   (bias-augmented features and one-hot targets).
//! - [`codec`]: [`Parameterization`] decode/encode/Jacobian between flat
//!   vectors and [`WeightMatrix`].
//! - [`outputs`]: softmax probabilities for both model families.
//! - [`engine`]: summed cross-entropy, its gradient and Hessian in the flat
//!   layout, and the power-transform loss with its derivative.
//! - [`init`], [`adam`], [`plateau`], [`options`]: fit configuration and the
//!   stochastic-optimizer pieces.
//!
//! Invariants & assumptions
//! ------------------------
//! - The flat ordering `θ[i·(K+1) + r] = W[r, i]` is shared by the codec,
//!   the gradient, and the Hessian.
//! - Engine quantities are costs (to be minimized); models negate them when
//!   implementing `LogLikelihood`.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests next to the code; derivative checks
//!   against `finitediff` live in [`engine`].

pub mod adam;
pub mod codec;
pub mod data;
pub mod engine;
pub mod init;
pub mod options;
pub mod outputs;
pub mod plateau;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::adam::{AdamOptions, ScalarAdam};
pub use self::codec::{Parameterization, WeightMatrix, WeightParams};
pub use self::data::{CalibData, DesignData, augment_with_bias, one_hot, validate_scores};
pub use self::engine::{
    gradient, hessian, objective, power_loss_grad, pullback_gradient, pullback_hessian,
};
pub use self::init::Init;
pub use self::options::{MultinomialOptions, TemperatureOptions};
pub use self::outputs::{calculate_outputs, power_transform_outputs, predict_labels};
pub use self::plateau::{LossHistory, PlateauRule};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::adam::AdamOptions;
    pub use super::codec::{Parameterization, WeightMatrix};
    pub use super::data::CalibData;
    pub use super::init::Init;
    pub use super::options::{MultinomialOptions, TemperatureOptions};
    pub use super::plateau::PlateauRule;
}
