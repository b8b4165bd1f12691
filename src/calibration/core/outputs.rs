//! Probability model: linear class scores followed by a stable softmax.
//!
//! Two families share the same normalization:
//! - multinomial: `softmax([X·W, 0])` on the bias-augmented features, with
//!   the reference class's zero column appended by
//!   [`WeightMatrix::with_reference`];
//! - power transform: `softmax(T · ln(clip(S)))` on raw scores.
//!
//! Rows of every returned matrix sum to 1 up to rounding.
use crate::{
    calibration::core::codec::WeightMatrix,
    optimization::numerical_stability::transformations::stable_softmax,
};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// `N×K` linear scores `X · [W | 0]`.
pub fn linear_scores(features: ArrayView2<f64>, weights: &WeightMatrix) -> Array2<f64> {
    features.dot(&weights.with_reference())
}

/// Calibrated probabilities for the multinomial model.
///
/// `features` must be the `N×(K+1)` bias-augmented matrix.
pub fn calculate_outputs(features: ArrayView2<f64>, weights: &WeightMatrix) -> Array2<f64> {
    stable_softmax(linear_scores(features, weights))
}

/// Calibrated probabilities for the power-transform model.
///
/// `log_scores` are `ln(clip(S))`, computed once per fit or prediction.
pub fn power_transform_outputs(t: f64, log_scores: ArrayView2<f64>) -> Array2<f64> {
    stable_softmax(log_scores.mapv(|l| t * l))
}

/// Row-wise argmax. Ties resolve to the lowest class index.
pub fn predict_labels(probs: ArrayView2<f64>) -> Array1<usize> {
    probs.map_axis(Axis(1), |row| {
        let mut best = 0;
        for (j, &p) in row.iter().enumerate() {
            if p > row[best] {
                best = j;
            }
        }
        best
    })
}
