//! Per-iteration progress reporting through the `log` facade.
//!
//! Attached by the runner when `TrustRegionOptions::verbose` is set. Values
//! are reported in log-likelihood space (`ℓ = -cost`).
use argmin::core::{Error, KV, State, observers::Observe};
use argmin_math::ArgminL2Norm;

use crate::optimization::loglik_optimizer::types::NewtonState;

/// Observer emitting one `debug` record per trust-region iteration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observe<NewtonState> for LogObserver {
    fn observe_iter(&mut self, state: &NewtonState, _kv: &KV) -> Result<(), Error> {
        let grad_norm = state.get_gradient().map(|g| g.l2_norm());
        log::debug!(
            "iter {}: ell = {:.6}, best ell = {:.6}, ||grad|| = {:?}",
            state.get_iter(),
            -state.get_cost(),
            -state.get_best_cost(),
            grad_norm
        );
        Ok(())
    }
}
