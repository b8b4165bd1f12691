//! Errors for calibration models (score/label validation, parameterization
//! checks, stochastic-optimizer options, and fitting failures).
//!
//! This module defines the model error type, [`CalibError`], used by the
//! calibration core and the two fitted models. It implements
//! `Display`/`Error` and converts to and from the optimizer surface
//! ([`OptError`]).
//!
//! ## Conventions
//! - **Indices are 0-based**; labels live in `[0, K)`.
//! - Scores must be finite; positivity is *not* required because the
//!   power-transform path clips scores before taking logarithms.
//! - Optimizer/backend errors are normalized to
//!   [`CalibError::OptimizationFailed`] with a human-readable status.
use crate::optimization::errors::OptError;

/// Result alias for calibration operations that may produce [`CalibError`].
pub type CalibResult<T> = Result<T, CalibError>;

/// Unified error type for calibration modeling.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibError {
    // ---- Input/data validation ----
    /// Calibration needs at least two classes.
    TooFewClasses { k: usize },

    /// Score rows and labels disagree on the number of samples.
    LabelLengthMismatch { scores: usize, labels: usize },

    /// A label is outside `[0, K)`.
    LabelOutOfRange { index: usize, label: usize, k: usize },

    /// A score is NaN/±inf.
    NonFiniteScore { row: usize, col: usize, value: f64 },

    /// Scores passed at predict time have a different class count than the fit.
    ClassCountMismatch { expected: usize, found: usize },

    // ---- Parameterization ----
    /// Flat parameter vector length does not match the parameterization.
    ParamLengthMismatch { expected: usize, actual: usize },

    /// Flat parameter entries must be finite.
    NonFiniteParam { index: usize, value: f64 },

    /// Weight matrix must have shape (K+1)×(K−1).
    InvalidWeightShape { rows: usize, cols: usize },

    /// Fixed initial weights were built for a different class count.
    InitShapeMismatch { expected: usize, found: usize },

    /// Unknown parameterization name.
    InvalidParameterization { name: String },

    // ---- Stochastic optimizer options ----
    /// Learning rate must be finite and > 0.
    InvalidLearningRate { value: f64 },

    /// Moment decay rates must lie in [0, 1).
    InvalidDecayRate { name: &'static str, value: f64 },

    /// Stability constant must be finite and > 0.
    InvalidAdamEps { value: f64 },

    /// Batch size must be > 0 when provided.
    InvalidBatchSize { value: usize },

    /// Epoch budget must be > 0.
    InvalidMaxEpochs { value: usize },

    /// Plateau factor must be finite and >= 0.
    InvalidPlateauFactor { value: f64 },

    /// Plateau window must be > 0.
    InvalidPlateauWindow { value: usize },

    // ---- Estimation ----
    /// Optimizer failed; include a human-readable status/reason.
    OptimizationFailed { status: String },

    /// Model hasn't been fitted yet.
    ModelNotFitted,
}

impl std::error::Error for CalibError {}

impl std::fmt::Display for CalibError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            CalibError::TooFewClasses { k } => {
                write!(f, "Calibration needs at least 2 classes, found {k}")
            }
            CalibError::LabelLengthMismatch { scores, labels } => {
                write!(f, "Scores have {scores} rows but {labels} labels were given")
            }
            CalibError::LabelOutOfRange { index, label, k } => {
                write!(f, "Label {label} at index {index} is outside [0, {k})")
            }
            CalibError::NonFiniteScore { row, col, value } => {
                write!(f, "Non-finite score at ({row}, {col}): {value}")
            }
            CalibError::ClassCountMismatch { expected, found } => {
                write!(f, "Class count mismatch: fitted with {expected}, found {found}")
            }

            // ---- Parameterization ----
            CalibError::ParamLengthMismatch { expected, actual } => {
                write!(f, "Parameter length mismatch: expected {expected}, actual {actual}")
            }
            CalibError::NonFiniteParam { index, value } => {
                write!(f, "Invalid parameter at index {index}: {value}, must be finite")
            }
            CalibError::InvalidWeightShape { rows, cols } => {
                write!(f, "Invalid weight matrix shape ({rows}, {cols}): expected (K+1, K-1)")
            }
            CalibError::InitShapeMismatch { expected, found } => {
                write!(f, "Initial weights built for {found} classes, data has {expected}")
            }
            CalibError::InvalidParameterization { name } => {
                write!(f, "Invalid parameterization '{name}': expected 'full' or 'diagonal'")
            }

            // ---- Stochastic optimizer options ----
            CalibError::InvalidLearningRate { value } => {
                write!(f, "Invalid learning rate {value}: must be finite and > 0")
            }
            CalibError::InvalidDecayRate { name, value } => {
                write!(f, "Invalid decay rate {name} = {value}: must lie in [0, 1)")
            }
            CalibError::InvalidAdamEps { value } => {
                write!(f, "Invalid stability constant {value}: must be finite and > 0")
            }
            CalibError::InvalidBatchSize { value } => {
                write!(f, "Invalid batch size {value}: must be > 0")
            }
            CalibError::InvalidMaxEpochs { value } => {
                write!(f, "Invalid epoch budget {value}: must be > 0")
            }
            CalibError::InvalidPlateauFactor { value } => {
                write!(f, "Invalid plateau factor {value}: must be finite and >= 0")
            }
            CalibError::InvalidPlateauWindow { value } => {
                write!(f, "Invalid plateau window {value}: must be > 0")
            }

            // ---- Estimation ----
            CalibError::OptimizationFailed { status } => {
                write!(f, "Optimization failed: {status}")
            }
            CalibError::ModelNotFitted => {
                write!(f, "Model has not been fitted")
            }
        }
    }
}

impl From<OptError> for CalibError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::ThetaLengthMismatch { expected, actual } => {
                CalibError::ParamLengthMismatch { expected, actual }
            }
            other => CalibError::OptimizationFailed { status: other.to_string() },
        }
    }
}
