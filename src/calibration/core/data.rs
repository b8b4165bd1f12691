//! Calibration data containers: scores, labels, and the design matrices
//! built from them.
//!
//! Purpose
//! -------
//! Provide a validated container for a classifier's raw scores and the true
//! labels ([`CalibData`]), plus the derived matrices consumed by the
//! multinomial engine ([`DesignData`]): the bias-augmented feature matrix and
//! the one-hot target matrix.
//!
//! Key behaviors
//! -------------
//! - [`CalibData::new`] rejects K < 2, mismatched lengths, labels outside
//!   `[0, K)`, and non-finite scores. N = 0 is accepted.
//! - [`augment_with_bias`] appends a trailing column of ones.
//! - [`one_hot`] builds an `N×K` indicator matrix; K = 2 uses the natural
//!   two-column encoding (column `j` ↔ label `j`).
//!
//! Invariants & assumptions
//! ------------------------
//! - `scores.nrows() == labels.len()`; `scores.ncols() == K >= 2`.
//! - The last column of an augmented matrix is exactly 1.
//! - Every row of a one-hot matrix has exactly one entry equal to 1.
//!
//! Conventions
//! -----------
//! - Rows are samples, columns are classes; labels are 0-based.
//! - Scores need not be probabilities. The temperature path clips them
//!   before taking logarithms.
use crate::calibration::errors::{CalibError, CalibResult};
use ndarray::{Array1, Array2, ArrayView2, s};

/// Validated scores and labels for one calibration fit.
///
/// Fields
/// ------
/// - `scores`: `Array2<f64>` of shape `N×K`, all finite.
/// - `labels`: `Array1<usize>` of length `N`, values in `[0, K)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibData {
    pub scores: Array2<f64>,
    pub labels: Array1<usize>,
}

impl CalibData {
    /// Construct a validated [`CalibData`].
    ///
    /// Errors
    /// ------
    /// - `CalibError::TooFewClasses` when `scores.ncols() < 2`.
    /// - `CalibError::LabelLengthMismatch` when row and label counts differ.
    /// - `CalibError::NonFiniteScore` at the first NaN/±inf score.
    /// - `CalibError::LabelOutOfRange` at the first label `>= K`.
    pub fn new(scores: Array2<f64>, labels: Array1<usize>) -> CalibResult<Self> {
        validate_scores(scores.view())?;
        if scores.nrows() != labels.len() {
            return Err(CalibError::LabelLengthMismatch {
                scores: scores.nrows(),
                labels: labels.len(),
            });
        }
        let k = scores.ncols();
        for (index, &label) in labels.iter().enumerate() {
            if label >= k {
                return Err(CalibError::LabelOutOfRange { index, label, k });
            }
        }
        Ok(Self { scores, labels })
    }

    /// Number of samples `N`.
    pub fn n_samples(&self) -> usize {
        self.scores.nrows()
    }

    /// Number of classes `K`.
    pub fn n_classes(&self) -> usize {
        self.scores.ncols()
    }
}

/// Check the class count and finiteness of a score matrix.
///
/// Used both at fit time and for new scores passed to `predict_proba`.
pub fn validate_scores(scores: ArrayView2<f64>) -> CalibResult<()> {
    if scores.ncols() < 2 {
        return Err(CalibError::TooFewClasses { k: scores.ncols() });
    }
    for ((row, col), &value) in scores.indexed_iter() {
        if !value.is_finite() {
            return Err(CalibError::NonFiniteScore { row, col, value });
        }
    }
    Ok(())
}

/// Append a trailing column of ones: `N×K → N×(K+1)`.
pub fn augment_with_bias(scores: ArrayView2<f64>) -> Array2<f64> {
    let (n, k) = scores.dim();
    let mut features = Array2::<f64>::ones((n, k + 1));
    features.slice_mut(s![.., ..k]).assign(&scores);
    features
}

/// One-hot encode labels into an `N×K` matrix.
///
/// Labels are assumed to lie in `[0, k)` (enforced by [`CalibData::new`]).
pub fn one_hot(labels: &Array1<usize>, k: usize) -> Array2<f64> {
    let mut targets = Array2::<f64>::zeros((labels.len(), k));
    for (n, &label) in labels.iter().enumerate() {
        targets[[n, label]] = 1.0;
    }
    targets
}

/// Design matrices for the multinomial engine.
///
/// - `features`: `N×(K+1)` bias-augmented scores.
/// - `targets`: `N×K` one-hot labels.
/// - `k`: class count.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignData {
    pub features: Array2<f64>,
    pub targets: Array2<f64>,
    pub k: usize,
}

impl DesignData {
    /// Build the design matrices from validated data.
    pub fn from_calib(data: &CalibData) -> Self {
        let k = data.n_classes();
        Self {
            features: augment_with_bias(data.scores.view()),
            targets: one_hot(&data.labels, k),
            k,
        }
    }

    /// Number of samples `N`.
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }
}
