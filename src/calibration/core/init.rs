//! Initial weight policies for the multinomial calibrator.
//!
//! - [`Init::Random`] draws standard-normal weights, then forces the
//!   diagonal of the top `(K−1)×(K−1)` block positive and row `K−1`
//!   negative so every free class starts out favoring its own score over
//!   the reference class's.
//! - [`Init::Identity`] starts from the Diagonal family with `s = 1` and
//!   zero intercepts.
//! - [`Init::Fixed`] uses caller-supplied weights as-is.
use crate::calibration::{
    core::codec::WeightMatrix,
    errors::{CalibError, CalibResult},
};
use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

/// Starting point for a trust-region fit.
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    Random { seed: Option<u64> },
    Identity,
    Fixed(WeightMatrix),
}

impl Default for Init {
    fn default() -> Self {
        Init::Random { seed: None }
    }
}

impl Init {
    /// Materialize the initial `(K+1)×(K−1)` weights for `k` classes.
    ///
    /// Errors
    /// ------
    /// - `CalibError::TooFewClasses` for `k < 2`.
    /// - `CalibError::InitShapeMismatch` when fixed weights were built for a
    ///   different class count.
    pub fn initial_weights(&self, k: usize) -> CalibResult<WeightMatrix> {
        if k < 2 {
            return Err(CalibError::TooFewClasses { k });
        }
        match self {
            Init::Random { seed } => {
                let mut rng = match seed {
                    Some(value) => StdRng::seed_from_u64(*value),
                    None => StdRng::from_os_rng(),
                };
                WeightMatrix::new(random_weights(k, &mut rng))
            }
            Init::Identity => WeightMatrix::identity(k),
            Init::Fixed(weights) => {
                if weights.n_classes() != k {
                    return Err(CalibError::InitShapeMismatch {
                        expected: k,
                        found: weights.n_classes(),
                    });
                }
                Ok(weights.clone())
            }
        }
    }
}

// ---- Helper methods ----

fn random_weights<R: Rng>(k: usize, rng: &mut R) -> Array2<f64> {
    let mut coefs =
        Array2::from_shape_simple_fn((k + 1, k - 1), || rng.sample::<f64, _>(StandardNormal));
    for i in 0..k - 1 {
        coefs[[i, i]] = coefs[[i, i]].abs();
        coefs[[k - 1, i]] = -coefs[[k - 1, i]].abs();
    }
    coefs
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sign pattern and seeding of random initial weights.
    // - Shape checks for fixed weights.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the forced sign pattern and reproducibility under a seed.
    //
    // Given
    // -----
    // - `Init::Random { seed: Some(7) }` with K = 4, drawn twice.
    //
    // Expect
    // ------
    // - Identical draws, positive diagonal, negative row K−1.
    fn random_init_is_seeded_and_sign_constrained() {
        // Arrange
        let init = Init::Random { seed: Some(7) };

        // Act
        let a = init.initial_weights(4).unwrap();
        let b = init.initial_weights(4).unwrap();

        // Assert
        assert_eq!(a, b);
        let w = a.as_array();
        assert_eq!(w.dim(), (5, 3));
        for i in 0..3 {
            assert!(w[[i, i]] >= 0.0);
            assert!(w[[3, i]] <= 0.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure fixed weights must match the data's class count.
    //
    // Given
    // -----
    // - Zero weights for K = 3 requested for K = 4.
    //
    // Expect
    // ------
    // - `InitShapeMismatch { expected: 4, found: 3 }`; K = 1 is rejected first.
    fn fixed_init_checks_class_count() {
        // Arrange
        let init = Init::Fixed(WeightMatrix::zeros(3).unwrap());

        // Act
        let err = init.initial_weights(4).unwrap_err();

        // Assert
        assert_eq!(err, CalibError::InitShapeMismatch { expected: 4, found: 3 });
        assert_eq!(Init::Identity.initial_weights(1), Err(CalibError::TooFewClasses { k: 1 }));
    }
}
