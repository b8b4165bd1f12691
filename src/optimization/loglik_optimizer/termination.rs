//! loglik_optimizer::termination — gradient-norm stopping rule for Argmin solvers.
//!
//! Argmin's trust-region solver has no gradient tolerance of its own. The
//! [`GradientTolerance`] wrapper delegates every iteration to the wrapped
//! solver and adds one check in `terminate`: once the cost-gradient norm
//! stored in the state drops below `tol_grad`, the run ends with
//! `TerminationReason::SolverConverged`. A terminal status reported by the
//! inner solver always wins.
//!
//! The gradient of a loss summed over many samples carries rounding noise
//! that can stay above an absolute tolerance at the optimum. There the
//! trust-region model predicts no decrease, every step is rejected and the
//! radius collapses. The wrapper therefore also counts iterations whose cost
//! fails to drop below the best seen by more than a relative `STALL_RTOL`,
//! and ends the run with `TerminationReason::SolverExit` once
//! `stall_iters` such iterations occur in a row. That exit is reported as
//! not converged.
use argmin::core::{Error, IterState, KV, Problem, Solver, TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;

/// Consecutive non-improving iterations tolerated before the run stops.
pub const DEFAULT_STALL_ITERS: usize = 20;

/// Relative cost decrease below which an iteration counts as stalled.
pub const STALL_RTOL: f64 = 1e-12;

/// Solver wrapper adding a gradient-norm convergence test and a stall exit.
#[derive(Debug, Clone)]
pub struct GradientTolerance<S> {
    inner: S,
    tol_grad: Option<f64>,
    stall_iters: usize,
    best_cost: f64,
    stalled: usize,
}

impl<S> GradientTolerance<S> {
    /// Wrap `inner`; `None` disables the gradient test.
    pub fn new(inner: S, tol_grad: Option<f64>) -> Self {
        Self {
            inner,
            tol_grad,
            stall_iters: DEFAULT_STALL_ITERS,
            best_cost: f64::INFINITY,
            stalled: 0,
        }
    }

    /// Replace the stall limit (at least one iteration).
    pub fn with_stall_iters(mut self, stall_iters: usize) -> Self {
        self.stall_iters = stall_iters.max(1);
        self
    }

    fn record_cost(&mut self, cost: f64) -> bool {
        let threshold = STALL_RTOL * self.best_cost.abs().max(1.0);
        if !self.best_cost.is_finite() || cost < self.best_cost - threshold {
            self.best_cost = self.best_cost.min(cost);
            self.stalled = 0;
        } else {
            self.stalled += 1;
        }
        self.stalled >= self.stall_iters
    }

    /// Borrow the wrapped solver.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<O, S, P, G, H> Solver<O, IterState<P, G, (), H, (), f64>> for GradientTolerance<S>
where
    S: Solver<O, IterState<P, G, (), H, (), f64>>,
    P: Clone,
    G: ArgminL2Norm<f64>,
{
    const NAME: &'static str = "GradientTolerance";

    fn init(
        &mut self, problem: &mut Problem<O>, state: IterState<P, G, (), H, (), f64>,
    ) -> Result<(IterState<P, G, (), H, (), f64>, Option<KV>), Error> {
        self.best_cost = f64::INFINITY;
        self.stalled = 0;
        self.inner.init(problem, state)
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: IterState<P, G, (), H, (), f64>,
    ) -> Result<(IterState<P, G, (), H, (), f64>, Option<KV>), Error> {
        self.inner.next_iter(problem, state)
    }

    fn terminate(&mut self, state: &IterState<P, G, (), H, (), f64>) -> TerminationStatus {
        let inner = self.inner.terminate(state);
        if inner.terminated() {
            return inner;
        }
        if let (Some(tol), Some(grad)) = (self.tol_grad, state.get_gradient()) {
            if grad.l2_norm() < tol {
                return TerminationStatus::Terminated(TerminationReason::SolverConverged);
            }
        }
        if self.record_cost(state.get_cost()) {
            return TerminationStatus::Terminated(TerminationReason::SolverExit(format!(
                "no cost decrease in {} iterations",
                self.stall_iters
            )));
        }
        TerminationStatus::NotTerminated
    }
}
