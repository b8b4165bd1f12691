//! Loss, gradient, and Hessian engine for the calibration objectives.
//!
//! Purpose
//! -------
//! Evaluate the summed cross-entropy of the multinomial calibration model
//! together with its analytic gradient and block-structured Hessian in the
//! flat parameter layout, and the scalar objective/derivative pair of the
//! power-transform model.
//!
//! Key behaviors
//! -------------
//! - [`objective`]: `Σ_n (logsumexp(z_n) − Σ_k t_nk z_nk)` with
//!   `z = X·[W | 0]`, so `ln` is never applied to a rounded probability.
//! - [`gradient`]: column `i` of `Xᵀ(P − T)` for every free class `i`,
//!   flattened as `g[i·(K+1) + r]` to match the codec.
//! - [`hessian`]: block `(i, j)` is `Σ_n p_ni(δ_ij − p_nj) x_n x_nᵀ`,
//!   assembled for `i <= j` and mirrored for `i > j`.
//! - [`pullback_gradient`] / [`pullback_hessian`]: `Jᵀg` and `JᵀHJ` for a
//!   constant parameterization Jacobian.
//! - [`power_loss_grad`]: `−Σ_n ln softmax(T·L_n)_{y_n}` and its closed-form
//!   derivative `−Σ_n (L_{n,y_n} − Σ_k p_nk L_nk)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All quantities are on the **cost** scale (to be minimized). The
//!   multinomial model negates them when exposing a log-likelihood.
//! - The Hessian is symmetric up to rounding and is never clamped or
//!   regularized; indefiniteness is left to the trust-region solver.
//! - Inputs are pure; nothing here mutates its arguments.
//!
//! Testing notes
//! -------------
//! - Gradients are checked against `finitediff` central differences and the
//!   Hessian against a finite-difference Jacobian of the analytic gradient.
use crate::{
    calibration::core::{
        codec::WeightMatrix,
        data::DesignData,
        outputs::{calculate_outputs, linear_scores},
    },
    optimization::{
        loglik_optimizer::types::{Grad, Hessian},
        numerical_stability::transformations::{logsumexp, row_logsumexp},
    },
};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis, Zip, s};

/// Summed multinomial cross-entropy at `weights`.
pub fn objective(design: &DesignData, weights: &WeightMatrix) -> f64 {
    let z = linear_scores(design.features.view(), weights);
    let lse = row_logsumexp(z.view());
    let picked = (&z * &design.targets).sum_axis(Axis(1));
    (lse - picked).sum()
}

/// Gradient of [`objective`] in the Full flat layout (`K² − 1` entries).
pub fn gradient(design: &DesignData, weights: &WeightMatrix) -> Grad {
    let k = design.k;
    let residual = calculate_outputs(design.features.view(), weights) - &design.targets;
    let g = design.features.t().dot(&residual);
    flatten_free_columns(g.slice(s![.., ..k - 1]))
}

/// Hessian of [`objective`] in the Full flat layout.
///
/// Returns a `(K²−1)×(K²−1)` symmetric matrix made of `(K+1)×(K+1)` blocks.
pub fn hessian(design: &DesignData, weights: &WeightMatrix) -> Hessian {
    let k = design.k;
    let d = k + 1;
    let free = k - 1;
    let x = &design.features;
    let p = calculate_outputs(x.view(), weights);
    let mut hess = Array2::<f64>::zeros((free * d, free * d));

    for i in 0..free {
        for j in i..free {
            let delta = if i == j { 1.0 } else { 0.0 };
            let w = Zip::from(p.column(i))
                .and(p.column(j))
                .map_collect(|&pi, &pj| pi * (delta - pj));
            let weighted = x * &w.insert_axis(Axis(1));
            let block = weighted.t().dot(x);
            hess.slice_mut(s![i * d..(i + 1) * d, j * d..(j + 1) * d]).assign(&block);
            if i != j {
                hess.slice_mut(s![j * d..(j + 1) * d, i * d..(i + 1) * d]).assign(&block.t());
            }
        }
    }
    hess
}

/// `Jᵀ g`: gradient in the parameterization whose Jacobian is `jac`.
pub fn pullback_gradient(jac: &Array2<f64>, grad: &Grad) -> Grad {
    jac.t().dot(grad)
}

/// `Jᵀ H J`: Hessian in the parameterization whose Jacobian is `jac`.
///
/// Exact for linear parameterizations, where the second-derivative term of
/// the chain rule vanishes.
pub fn pullback_hessian(jac: &Array2<f64>, hess: &Hessian) -> Hessian {
    jac.t().dot(hess).dot(jac)
}

/// Power-transform loss and its derivative with respect to `t`.
///
/// Parameters
/// ----------
/// - `t`: exponent applied to the scores (temperature-like scalar).
/// - `log_scores`: `N×K` matrix `ln(clip(S))`.
/// - `labels`: `N` labels in `[0, K)`.
///
/// Returns
/// -------
/// `(loss, dloss/dt)`, both summed over rows. An empty batch gives `(0, 0)`.
pub fn power_loss_grad(
    t: f64, log_scores: ArrayView2<f64>, labels: ArrayView1<usize>,
) -> (f64, f64) {
    let mut loss = 0.0;
    let mut grad = 0.0;
    for (row, &y) in log_scores.rows().into_iter().zip(labels.iter()) {
        let z = row.mapv(|l| t * l);
        let lse = logsumexp(z.view());
        loss += lse - z[y];
        let expected: f64 = z.iter().zip(row.iter()).map(|(&zk, &lk)| (zk - lse).exp() * lk).sum();
        grad -= row[y] - expected;
    }
    (loss, grad)
}

// ---- Helper methods ----

/// Transpose then flatten row-major: `out[i·rows + r] = m[r, i]`.
fn flatten_free_columns(m: ArrayView2<f64>) -> Grad {
    m.t().iter().copied().collect()
}
