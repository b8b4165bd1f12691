//! Weight codec — conversions between flat optimizer vectors and the
//! `(K+1)×(K−1)` calibration weight matrix.
//!
//! Purpose
//! -------
//! The trust-region optimizer works on a flat vector `θ`; the probability
//! model works on a weight matrix whose first `K` rows multiply the class
//! scores and whose last row holds intercepts. This module owns both
//! directions of that mapping for the two supported parameterizations.
//!
//! Key behaviors
//! -------------
//! - [`Parameterization::Full`]: every entry is free (`K² − 1` parameters),
//!   stored in transpose-then-flatten order `θ[i·(K+1) + r] = W[r, i]`.
//! - [`Parameterization::Diagonal`]: one shared scalar `s` and `K − 1`
//!   intercepts, flat layout `[b_0, …, b_{K−2}, s]`, decoded as
//!   `W[i, i] = s`, `W[K−1, i] = −s`, `W[K, i] = b_i`, zeros elsewhere.
//! - [`Parameterization::jacobian`] returns the constant linear map from a
//!   parameterization into the Full flat vector, used to pull gradients and
//!   Hessians back onto the Diagonal parameters.
//!
//! Invariants & assumptions
//! ------------------------
//! - Decoding checks the flat length against [`Parameterization::n_params`]
//!   and never reinterprets a vector by its length.
//! - `decode(encode(W)) == W` exactly for Full, and for Diagonal whenever
//!   `W` lies in the constrained family.
//!
//! Conventions
//! -----------
//! - The `K`-th (reference) class has no column in [`WeightMatrix`]; its
//!   linear score is fixed at 0 and appended by [`WeightMatrix::with_reference`].
use crate::{
    calibration::errors::{CalibError, CalibResult},
    optimization::loglik_optimizer::types::Theta,
};
use ndarray::{Array1, Array2, s};
use std::str::FromStr;

/// Free calibration weights of shape `(K+1)×(K−1)`.
///
/// Rows `0..K` multiply the class scores, row `K` holds the intercepts.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    coefs: Array2<f64>,
}

impl WeightMatrix {
    /// Wrap a coefficient matrix after checking its shape and entries.
    ///
    /// Errors
    /// ------
    /// - `CalibError::InvalidWeightShape` unless the shape is `(K+1, K−1)`
    ///   for some `K >= 2`.
    /// - `CalibError::NonFiniteParam` for a NaN/±inf entry (row-major index).
    pub fn new(coefs: Array2<f64>) -> CalibResult<Self> {
        let (rows, cols) = coefs.dim();
        if cols == 0 || rows != cols + 2 {
            return Err(CalibError::InvalidWeightShape { rows, cols });
        }
        for (index, &value) in coefs.iter().enumerate() {
            if !value.is_finite() {
                return Err(CalibError::NonFiniteParam { index, value });
            }
        }
        Ok(Self { coefs })
    }

    /// All-zero weights for `k` classes (uniform probabilities).
    pub fn zeros(k: usize) -> CalibResult<Self> {
        check_classes(k)?;
        Ok(Self { coefs: Array2::zeros((k + 1, k - 1)) })
    }

    /// Diagonal-family weights with `s = 1` and zero intercepts.
    pub fn identity(k: usize) -> CalibResult<Self> {
        check_classes(k)?;
        let mut theta = Array1::<f64>::zeros(k);
        theta[k - 1] = 1.0;
        decode_diagonal(&theta, k)
    }

    /// Number of classes `K`.
    pub fn n_classes(&self) -> usize {
        self.coefs.ncols() + 1
    }

    /// Borrow the raw `(K+1)×(K−1)` coefficients.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.coefs
    }

    /// `(K+1)×K` matrix with the explicit all-zero reference column appended.
    pub fn with_reference(&self) -> Array2<f64> {
        let (rows, cols) = self.coefs.dim();
        let mut full = Array2::<f64>::zeros((rows, cols + 1));
        full.slice_mut(s![.., ..cols]).assign(&self.coefs);
        full
    }

    /// Score coefficients as a `(K−1)×K` matrix (one row per free class).
    pub fn coef(&self) -> Array2<f64> {
        let k = self.n_classes();
        self.coefs.slice(s![..k, ..]).t().to_owned()
    }

    /// Intercepts, one per free class.
    pub fn intercept(&self) -> Array1<f64> {
        self.coefs.row(self.n_classes()).to_owned()
    }
}

/// How a flat `θ` maps onto a [`WeightMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parameterization {
    #[default]
    Full,
    Diagonal,
}

impl FromStr for Parameterization {
    type Err = CalibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Parameterization::Full),
            "diagonal" | "diag" => Ok(Parameterization::Diagonal),
            _ => Err(CalibError::InvalidParameterization { name: s.to_string() }),
        }
    }
}

impl Parameterization {
    /// Number of free parameters for `k` classes: `K² − 1` or `K`.
    pub fn n_params(&self, k: usize) -> usize {
        match self {
            Parameterization::Full => (k + 1) * (k - 1),
            Parameterization::Diagonal => k,
        }
    }

    /// Decode a flat vector into a weight matrix.
    ///
    /// Errors
    /// ------
    /// - `CalibError::TooFewClasses` for `k < 2`.
    /// - `CalibError::ParamLengthMismatch` when `theta.len() != n_params(k)`.
    /// - `CalibError::NonFiniteParam` for a NaN/±inf entry.
    pub fn decode(&self, theta: &Theta, k: usize) -> CalibResult<WeightMatrix> {
        Ok(WeightParams::from_theta(*self, theta, k)?.into_weights())
    }

    /// Encode a weight matrix into this parameterization's flat vector.
    ///
    /// Diagonal reads the shared scalar from `W[0, 0]` and the intercepts
    /// from row `K`; other entries are ignored.
    pub fn encode(&self, weights: &WeightMatrix) -> Theta {
        match self {
            Parameterization::Full => encode_full(weights),
            Parameterization::Diagonal => encode_diagonal(weights),
        }
    }

    /// Linear map `J` (`(K²−1) × n_params`) with `θ_full = J · θ`.
    ///
    /// Full gives the identity. Pullbacks are `Jᵀ g` for gradients and
    /// `Jᵀ H J` for Hessians.
    pub fn jacobian(&self, k: usize) -> Array2<f64> {
        let n_full = Parameterization::Full.n_params(k);
        match self {
            Parameterization::Full => Array2::eye(n_full),
            Parameterization::Diagonal => {
                let mut jac = Array2::<f64>::zeros((n_full, k));
                for i in 0..k - 1 {
                    let base = i * (k + 1);
                    jac[[base + i, k - 1]] = 1.0;
                    jac[[base + k - 1, k - 1]] = -1.0;
                    jac[[base + k, i]] = 1.0;
                }
                jac
            }
        }
    }
}

/// Typed view of a decoded parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightParams {
    Full { matrix: WeightMatrix },
    Diagonal { scalar: f64, intercepts: Array1<f64> },
}

impl WeightParams {
    /// Split a flat vector according to `parameterization`.
    ///
    /// Errors
    /// ------
    /// Same as [`Parameterization::decode`].
    pub fn from_theta(
        parameterization: Parameterization, theta: &Theta, k: usize,
    ) -> CalibResult<Self> {
        check_classes(k)?;
        check_theta(theta, parameterization.n_params(k))?;
        match parameterization {
            Parameterization::Full => Ok(WeightParams::Full { matrix: decode_full(theta, k)? }),
            Parameterization::Diagonal => Ok(WeightParams::Diagonal {
                scalar: theta[k - 1],
                intercepts: theta.slice(s![..k - 1]).to_owned(),
            }),
        }
    }

    /// Build the `(K+1)×(K−1)` matrix these parameters describe.
    pub fn into_weights(self) -> WeightMatrix {
        match self {
            WeightParams::Full { matrix } => matrix,
            WeightParams::Diagonal { scalar, intercepts } => {
                let k = intercepts.len() + 1;
                let mut coefs = Array2::<f64>::zeros((k + 1, k - 1));
                for i in 0..k - 1 {
                    coefs[[i, i]] = scalar;
                    coefs[[k - 1, i]] = -scalar;
                    coefs[[k, i]] = intercepts[i];
                }
                WeightMatrix { coefs }
            }
        }
    }
}

/// Full decode: `W[r, i] = θ[i·(K+1) + r]`.
pub fn decode_full(theta: &Theta, k: usize) -> CalibResult<WeightMatrix> {
    check_classes(k)?;
    check_theta(theta, Parameterization::Full.n_params(k))?;
    let coefs = Array2::from_shape_fn((k + 1, k - 1), |(r, i)| theta[i * (k + 1) + r]);
    Ok(WeightMatrix { coefs })
}

/// Full encode: transpose, then flatten row-major.
pub fn encode_full(weights: &WeightMatrix) -> Theta {
    weights.coefs.t().iter().copied().collect()
}

/// Diagonal decode from `[b_0, …, b_{K−2}, s]`.
pub fn decode_diagonal(theta: &Theta, k: usize) -> CalibResult<WeightMatrix> {
    Ok(WeightParams::from_theta(Parameterization::Diagonal, theta, k)?.into_weights())
}

/// Diagonal encode: `[W[K, 0], …, W[K, K−2], W[0, 0]]`.
pub fn encode_diagonal(weights: &WeightMatrix) -> Theta {
    let k = weights.n_classes();
    let mut theta = Array1::<f64>::zeros(k);
    theta.slice_mut(s![..k - 1]).assign(&weights.coefs.row(k));
    theta[k - 1] = weights.coefs[[0, 0]];
    theta
}

// ---- Helper methods ----

fn check_classes(k: usize) -> CalibResult<()> {
    if k < 2 {
        return Err(CalibError::TooFewClasses { k });
    }
    Ok(())
}

fn check_theta(theta: &Theta, expected: usize) -> CalibResult<()> {
    if theta.len() != expected {
        return Err(CalibError::ParamLengthMismatch { expected, actual: theta.len() });
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(CalibError::NonFiniteParam { index, value });
        }
    }
    Ok(())
}
