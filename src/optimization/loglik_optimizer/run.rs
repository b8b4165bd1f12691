//! Execution helper that runs an `argmin` trust-region solver on a
//! log-likelihood problem and returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        observer::LogObserver,
        termination::GradientTolerance,
        traits::{LogLikelihood, OptimOutcome, TrustRegionOptions},
        types::{NewtonState, Theta},
    },
};
use argmin::core::{
    CostFunction, Executor, Gradient, Solver, State, TerminationReason, TerminationStatus,
    observers::ObserverMode,
};
use argmin_math::ArgminL2Norm;

/// Run a trust-region solver for a log-likelihood problem.
///
/// Wires up:
/// - the user model via [`ArgMinAdapter`],
/// - the solver, wrapped in [`GradientTolerance`] so `tols.tol_grad`
///   becomes a convergence test and a run whose cost has stopped
///   decreasing exits early,
/// - the initial parameter `theta0` and `tols.max_iter`,
/// - a [`LogObserver`] when `opts.verbose` is set,
///
/// then executes and converts the final state into [`OptimOutcome`].
///
/// # Logging
/// - `info`: ℓ(θ₀) and ‖∇c(θ₀)‖ before the first iteration (verbose only).
/// - `warn`: the run ended without meeting the gradient tolerance, e.g. on
///   the iteration cap or the stall exit.
///
/// # Errors
/// - Propagates any `argmin` runtime error (including model errors raised
///   inside cost/gradient/Hessian evaluations) via `From<argmin::core::Error>`.
/// - Propagates validation errors when constructing [`OptimOutcome`].
pub fn run_trust_region<'a, F, S>(
    theta0: Theta, opts: &TrustRegionOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, NewtonState> + Send + 'static,
{
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let solver = GradientTolerance::new(solver, opts.tols.tol_grad);
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }
    if opts.verbose {
        optimizer = optimizer.add_observer(LogObserver, ObserverMode::Always);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    if termination != TerminationStatus::Terminated(TerminationReason::SolverConverged) {
        log::warn!("trust-region run stopped without convergence after {iterations} iterations: {termination:?}");
    }
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper Methods ----

fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    log::info!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {n:.6}")).unwrap_or_default()
    );
    Ok(())
}
