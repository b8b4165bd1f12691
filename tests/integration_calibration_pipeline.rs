//! Integration tests for the calibration models.
//!
//! Purpose
//! -------
//! - Validate the end-to-end calibration pipeline: from validated scores and
//!   labels, through trust-region and stochastic fits, to calibrated
//!   probabilities on held-out scores.
//! - Exercise realistic synthetic regimes (separable binary data,
//!   overconfident three-class scores) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `calibration::models::MultinomialCalibrator`:
//!   - Full and Diagonal fits, accessors, curvature and standard errors.
//!   - Analytic derivatives against finite differences through the public
//!     `LogLikelihood` surface.
//! - `calibration::models::TemperatureCalibrator`:
//!   - Best-epoch tracking and held-out predictions.
//! - `calibration::core::plateau`:
//!   - The default-window plateau rule on a constructed trace.
//! - Degenerate inputs: K < 2, N = 0, and a batch larger than N.
//! - Reference setups: label-as-score binary data with exact 0/1 scores, and
//!   large uniform-score three-class data where the trust-region run must
//!   stop within a small number of iterations.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of codec layouts, option structs, and
//!   numerical helpers; these are covered by unit tests.
use approx::assert_relative_eq;
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2, Axis, array};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;
use rust_calibration::{
    calibration::{
        core::{
            data::DesignData,
            plateau::{DEFAULT_PLATEAU_WINDOW, PlateauRule},
        },
        prelude::*,
    },
    optimization::loglik_optimizer::{LogLikelihood, Tolerances, TrustRegionOptions},
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Purpose
/// -------
/// Draw an overconfident `K`-class sample.
///
/// Returns
/// -------
/// `(probs, labels)` where labels are sampled from `softmax(z)` and the
/// reported probabilities are `softmax(2·z)` for standard-normal logits `z`
/// scaled by 1.5.
fn overconfident_sample(n: usize, k: usize, seed: u64) -> (Array2<f64>, Array1<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut probs = Array2::<f64>::zeros((n, k));
    let mut labels = Array1::<usize>::zeros(n);
    for i in 0..n {
        let z: Vec<f64> = (0..k).map(|_| 1.5 * rng.sample::<f64, _>(StandardNormal)).collect();
        let true_p = softmax(&z, 1.0);
        let reported = softmax(&z, 2.0);
        let u: f64 = rng.random();
        let mut acc = 0.0;
        let mut label = k - 1;
        for (j, &p) in true_p.iter().enumerate() {
            acc += p;
            if u < acc {
                label = j;
                break;
            }
        }
        labels[i] = label;
        for j in 0..k {
            probs[[i, j]] = reported[j];
        }
    }
    (probs, labels)
}

fn softmax(z: &[f64], scale: f64) -> Vec<f64> {
    let max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let e: Vec<f64> = z.iter().map(|&v| (scale * (v - max)).exp()).collect();
    let total: f64 = e.iter().sum();
    e.into_iter().map(|v| v / total).collect()
}

fn cross_entropy(probs: &Array2<f64>, labels: &Array1<usize>) -> f64 {
    labels.iter().enumerate().map(|(i, &y)| -probs[[i, y]].ln()).sum()
}

/// Binary sample whose first score column is the label itself.
fn label_as_score(n: usize) -> CalibData {
    let labels: Array1<usize> = (0..n).map(|i| i % 2).collect();
    let scores = Array2::from_shape_fn((n, 2), |(i, j)| {
        let y = labels[i] as f64;
        if j == 0 { y } else { 1.0 - y }
    });
    CalibData::new(scores, labels).unwrap()
}

/// Uniform scores in `[0, 1)` with uniformly drawn labels.
fn uniform_sample(n: usize, k: usize, seed: u64) -> CalibData {
    let mut rng = StdRng::seed_from_u64(seed);
    let scores = Array2::from_shape_simple_fn((n, k), || rng.random::<f64>());
    let labels: Array1<usize> = (0..n).map(|_| rng.random_range(0..k)).collect();
    CalibData::new(scores, labels).unwrap()
}

fn separable_binary() -> CalibData {
    let scores = array![
        [0.9, 0.1],
        [0.8, 0.2],
        [0.85, 0.15],
        [0.7, 0.3],
        [0.1, 0.9],
        [0.2, 0.8],
        [0.15, 0.85],
        [0.3, 0.7]
    ];
    CalibData::new(scores, array![0, 0, 0, 0, 1, 1, 1, 1]).unwrap()
}

#[test]
// Purpose
// -------
// Both calibrators should become confident on cleanly separable binary
// data.
//
// Given
// -----
// - Eight training rows split by the first score, and two held-out rows
//   further from the boundary.
//
// Expect
// ------
// - Each model assigns > 0.99 to the true class of both held-out rows.
fn separable_binary_data_yields_confident_predictions() {
    // Arrange
    init_logging();
    let data = separable_binary();
    let held_out = array![[0.95, 0.05], [0.05, 0.95]];
    let tols = Tolerances::new(Some(1e-8), Some(200)).unwrap();
    let tr_opts = TrustRegionOptions { tols, ..TrustRegionOptions::default() };
    let mut multinomial = MultinomialCalibrator::new(MultinomialOptions::new(
        Init::Random { seed: Some(5) },
        Parameterization::Full,
        tr_opts,
    ));
    let temp_opts = TemperatureOptions::new(
        None,
        AdamOptions::new(0.1, 0.9, 0.999, 1e-8).unwrap(),
        PlateauRule::default(),
        500,
        Some(5),
    )
    .unwrap();
    let mut temperature = TemperatureCalibrator::new(temp_opts);

    // Act
    multinomial.fit(&data).unwrap();
    temperature.fit(&data).unwrap();
    let p_multi = multinomial.predict_proba(held_out.view()).unwrap();
    let p_temp = temperature.predict_proba(held_out.view()).unwrap();

    // Assert
    assert!(p_multi[[0, 0]] > 0.99 && p_multi[[1, 1]] > 0.99);
    assert!(p_temp[[0, 0]] > 0.99 && p_temp[[1, 1]] > 0.99);
    assert_eq!(multinomial.predict(held_out.view()).unwrap(), array![0, 1]);
    assert!(temperature.temperature().unwrap() > 1.0);
}

#[test]
// Purpose
// -------
// Calibration must not make the training cross-entropy worse than the
// uncalibrated scores on overconfident three-class data.
//
// Given
// -----
// - 300 samples whose reported probabilities are sharpened twice over the
//   label-generating ones.
// - Multinomial fits on `ln p` started from the identity map (which
//   reproduces the input probabilities), and a full-batch temperature fit
//   on `p`.
//
// Expect
// ------
// - Training CE of each calibrated model <= uncalibrated CE.
// - The Full fit is at least as good as the Diagonal fit it nests.
// - The temperature fit shrinks T below 1.
fn calibration_reduces_cross_entropy_on_overconfident_data() {
    // Arrange
    init_logging();
    let (probs, labels) = overconfident_sample(300, 3, 42);
    let uncalibrated = cross_entropy(&probs, &labels);
    let log_data = CalibData::new(probs.mapv(f64::ln), labels.clone()).unwrap();
    let prob_data = CalibData::new(probs, labels.clone()).unwrap();
    let mut full = MultinomialCalibrator::new(MultinomialOptions::new(
        Init::Identity,
        Parameterization::Full,
        TrustRegionOptions::default(),
    ));
    let mut diagonal = MultinomialCalibrator::new(MultinomialOptions::new(
        Init::Identity,
        Parameterization::Diagonal,
        TrustRegionOptions::default(),
    ));
    let temp_opts = TemperatureOptions::new(
        None,
        AdamOptions::new(0.01, 0.9, 0.999, 1e-8).unwrap(),
        PlateauRule::default(),
        300,
        Some(1),
    )
    .unwrap();
    let mut temperature = TemperatureCalibrator::new(temp_opts);

    // Act
    full.fit(&log_data).unwrap();
    diagonal.fit(&log_data).unwrap();
    temperature.fit(&prob_data).unwrap();
    let ce_full = cross_entropy(&full.predict_proba(log_data.scores.view()).unwrap(), &labels);
    let ce_diag = cross_entropy(&diagonal.predict_proba(log_data.scores.view()).unwrap(), &labels);
    let ce_temp =
        cross_entropy(&temperature.predict_proba(prob_data.scores.view()).unwrap(), &labels);

    // Assert
    assert!(ce_full <= uncalibrated + 1e-9);
    assert!(ce_diag <= uncalibrated + 1e-9);
    assert!(ce_temp <= uncalibrated + 1e-9);
    assert!(ce_full <= ce_diag + 1e-6);
    assert!(full.results().unwrap().converged);
    assert_relative_eq!(-full.results().unwrap().value, ce_full, epsilon = 1e-6);
    assert!(temperature.temperature().unwrap() < 1.0);
    assert!(full.curvature.as_ref().unwrap().positive_semidefinite);
    assert!(full.standard_errors().unwrap().iter().all(|se| se.is_finite()));
}

#[test]
// Purpose
// -------
// The reported exponent must come from the minimum-loss epoch.
//
// Given
// -----
// - Overconfident three-class data, mini-batches of 16, and an observer
//   recording `T` after each epoch.
//
// Expect
// ------
// - `best_epoch` indexes the minimum of `losses` (earliest on ties) and
//   `t_hat` equals the observed `T` at that epoch.
fn t_hat_matches_minimum_loss_epoch() {
    // Arrange
    init_logging();
    let (probs, labels) = overconfident_sample(120, 3, 7);
    let data = CalibData::new(probs, labels).unwrap();
    let opts = TemperatureOptions::new(
        Some(16),
        AdamOptions::new(0.02, 0.9, 0.999, 1e-8).unwrap(),
        PlateauRule::default(),
        200,
        Some(3),
    )
    .unwrap();
    let mut model = TemperatureCalibrator::new(opts);
    let mut temps = Vec::new();

    // Act
    model.fit_observed(&data, |_: usize, _: f64, t: f64| temps.push(t)).unwrap();

    // Assert
    let out = model.results.as_ref().unwrap();
    let min_loss = out.losses.iter().copied().fold(f64::INFINITY, f64::min);
    let first_min = out.losses.iter().position(|&l| l == min_loss).unwrap();
    assert_eq!(out.best_epoch, first_min);
    assert_eq!(out.t_hat, temps[first_min]);
    assert_eq!(out.losses.len(), out.epochs_run);
}

#[test]
// Purpose
// -------
// The default plateau rule fires exactly when the trace stops improving
// relative to the pre-window minimum.
//
// Given
// -----
// - Losses 100, 99, …, 91 followed by a flat 91, window 32, factor 1e-4.
//
// Expect
// ------
// - No trigger for any prefix shorter than 42; trigger at length 42, the
//   first length whose pre-window minimum is already 91.
fn default_plateau_rule_fires_at_exact_epoch() {
    // Arrange
    let rule = PlateauRule::default();
    let mut losses: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
    losses.extend(std::iter::repeat(91.0).take(40));

    // Act
    let first_fire = (1..=losses.len()).find(|&n| rule.reached(&losses[..n]));

    // Assert
    assert_eq!(DEFAULT_PLATEAU_WINDOW, 32);
    assert_eq!(first_fire, Some(42));
}

#[test]
// Purpose
// -------
// Check analytic derivatives of the fitted model's log-likelihood against
// finite differences for a four-class problem.
//
// Given
// -----
// - 40 random samples with K = 4 and a random Full θ (15 entries).
//
// Expect
// ------
// - Gradient within 1e-5 of central differences of ℓ.
// - Hessian symmetric and within 1e-4 of central differences of ∇ℓ.
fn loglik_derivatives_match_finite_differences() {
    // Arrange
    let (probs, labels) = overconfident_sample(40, 4, 9);
    let design = DesignData::from_calib(&CalibData::new(probs.mapv(f64::ln), labels).unwrap());
    let model = MultinomialCalibrator::default();
    let mut rng = StdRng::seed_from_u64(10);
    let theta: Array1<f64> = (0..15).map(|_| 0.3 * rng.sample::<f64, _>(StandardNormal)).collect();

    // Act
    let grad = model.grad(&theta, &design).unwrap();
    let hess = model.hessian(&theta, &design).unwrap();
    let fd_grad = theta.central_diff(&|t: &Array1<f64>| model.value(t, &design).unwrap());
    let fd_hess = theta.central_hessian(&|t: &Array1<f64>| model.grad(t, &design).unwrap());

    // Assert
    for (a, n) in grad.iter().zip(fd_grad.iter()) {
        assert_relative_eq!(a, n, epsilon = 1e-5);
    }
    for i in 0..15 {
        for j in 0..15 {
            assert_relative_eq!(hess[[i, j]], hess[[j, i]], epsilon = 1e-10);
            assert_relative_eq!(hess[[i, j]], fd_hess[[i, j]], epsilon = 1e-4);
        }
    }
}

#[test]
// Purpose
// -------
// Degenerate shapes must be handled without panics.
//
// Given
// -----
// - Single-column scores, an empty three-class sample, and a batch size
//   larger than the sample.
//
// Expect
// ------
// - `TooFewClasses` for K = 1.
// - N = 0: the multinomial fit keeps its initial weights and the
//   temperature fit stays at T = 1.
// - Oversized batch: a normal fit with one batch per epoch.
fn degenerate_shapes_are_handled() {
    // Arrange
    init_logging();
    let one_class = CalibData::new(Array2::zeros((4, 1)), Array1::zeros(4));
    let empty = CalibData::new(Array2::zeros((0, 3)), Array1::zeros(0)).unwrap();
    let mut multinomial = MultinomialCalibrator::new(MultinomialOptions::new(
        Init::Identity,
        Parameterization::Full,
        TrustRegionOptions::default(),
    ));
    let mut temperature = TemperatureCalibrator::new(TemperatureOptions {
        seed: Some(0),
        ..TemperatureOptions::default()
    });
    let small = separable_binary();
    let mut big_batch = TemperatureCalibrator::new(TemperatureOptions {
        batch_size: Some(1_000),
        max_epochs: 5,
        seed: Some(0),
        ..TemperatureOptions::default()
    });

    // Act
    multinomial.fit(&empty).unwrap();
    temperature.fit(&empty).unwrap();
    big_batch.fit(&small).unwrap();

    // Assert
    assert_eq!(one_class, Err(CalibError::TooFewClasses { k: 1 }));
    assert_eq!(multinomial.weights().unwrap(), &WeightMatrix::identity(3).unwrap());
    assert!(multinomial.results().is_none());
    assert_eq!(temperature.temperature().unwrap(), 1.0);
    let out = big_batch.results.as_ref().unwrap();
    assert_eq!(out.epochs_run, 5);
    assert!(out.losses.iter().all(|l| l.is_finite()));
}

#[test]
// Purpose
// -------
// Fit all three calibrators on binary data whose first score equals the
// label, so half of the raw scores are exact zeros that must pass through
// log clipping.
//
// Given
// -----
// - N = 100, scores `[y, 1 − y]`; held-out rows `[1, 0]` (label 1) and
//   `[0, 1]` (label 0).
//
// Expect
// ------
// - Full, Diagonal, and temperature models each give > 0.99 to the correct
//   class of both held-out rows.
// - The temperature fit ends at a negative exponent.
fn label_as_score_data_is_calibrated_by_every_model() {
    // Arrange
    init_logging();
    let data = label_as_score(100);
    let held_out = array![[1.0, 0.0], [0.0, 1.0]];
    let truth = [1usize, 0];
    let mut full = MultinomialCalibrator::new(MultinomialOptions::new(
        Init::Random { seed: Some(3) },
        Parameterization::Full,
        TrustRegionOptions::default(),
    ));
    let mut diagonal = MultinomialCalibrator::new(MultinomialOptions::new(
        Init::Random { seed: Some(3) },
        Parameterization::Diagonal,
        TrustRegionOptions::default(),
    ));
    let temp_opts = TemperatureOptions::new(
        None,
        AdamOptions::new(0.01, 0.9, 0.999, 1e-8).unwrap(),
        PlateauRule::default(),
        1024,
        Some(3),
    )
    .unwrap();
    let mut temperature = TemperatureCalibrator::new(temp_opts);

    // Act
    full.fit(&data).unwrap();
    diagonal.fit(&data).unwrap();
    temperature.fit(&data).unwrap();
    let probs = [
        full.predict_proba(held_out.view()).unwrap(),
        diagonal.predict_proba(held_out.view()).unwrap(),
        temperature.predict_proba(held_out.view()).unwrap(),
    ];

    // Assert
    for p in &probs {
        for (row, &y) in truth.iter().enumerate() {
            assert!(p[[row, y]] > 0.99, "p = {p:?}");
        }
    }
    assert!(temperature.temperature().unwrap() < 0.0);
}

#[test]
// Purpose
// -------
// On a large sample with uninformative scores, calibration must not raise
// the average training cross-entropy, and the trust-region runs must stop
// promptly once they reach the optimum instead of running to the
// iteration cap.
//
// Given
// -----
// - N = 5000, K = 3, uniform scores and labels, default options for every
//   model. The uncalibrated probabilities are the row-normalized scores.
//
// Expect
// ------
// - Average CE of Full, Diagonal, and temperature fits <= uncalibrated.
// - Each trust-region run finishes in fewer than 200 iterations with a
//   small final gradient.
fn uniform_scores_fit_quickly_without_hurting_cross_entropy() {
    // Arrange
    init_logging();
    let data = uniform_sample(5_000, 3, 17);
    let n = data.n_samples() as f64;
    let row_sums = data.scores.sum_axis(Axis(1)).insert_axis(Axis(1));
    let normalized = &data.scores / &row_sums;
    let uncalibrated = cross_entropy(&normalized, &data.labels) / n;
    let mut full = MultinomialCalibrator::new(MultinomialOptions::new(
        Init::Random { seed: Some(8) },
        Parameterization::Full,
        TrustRegionOptions::default(),
    ));
    let mut diagonal = MultinomialCalibrator::new(MultinomialOptions::new(
        Init::Random { seed: Some(8) },
        Parameterization::Diagonal,
        TrustRegionOptions::default(),
    ));
    let mut temperature = TemperatureCalibrator::new(TemperatureOptions {
        seed: Some(8),
        ..TemperatureOptions::default()
    });

    // Act
    full.fit(&data).unwrap();
    diagonal.fit(&data).unwrap();
    temperature.fit(&data).unwrap();
    let ce = |p: Array2<f64>| cross_entropy(&p, &data.labels) / n;
    let ce_full = ce(full.predict_proba(data.scores.view()).unwrap());
    let ce_diag = ce(diagonal.predict_proba(data.scores.view()).unwrap());
    let ce_temp = ce(temperature.predict_proba(data.scores.view()).unwrap());

    // Assert
    assert!(ce_full <= uncalibrated, "{ce_full} > {uncalibrated}");
    assert!(ce_diag <= uncalibrated, "{ce_diag} > {uncalibrated}");
    assert!(ce_temp <= uncalibrated, "{ce_temp} > {uncalibrated}");
    for model in [&full, &diagonal] {
        let out = model.results().unwrap();
        assert!(out.iterations < 200, "iterations = {}", out.iterations);
        assert!(out.grad_norm.unwrap() < 1e-3);
    }
}
