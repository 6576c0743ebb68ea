// Epoch pipeline: validate, build, solve, extract

use std::sync::Arc;

use crate::domain::{
    amount::Amount,
    models::{OptimizationProblem, SolverConfig},
    pool::{PoolState, SolverResult, TrancheOrders, TrancheWeights},
    solver_service::{Result, SolverService},
};
use crate::epoch::{builder, extractor, validator};
use crate::solver::{lp_format, SolverFactory};

/// Decides how much of each pending order executes at epoch close.
///
/// Holds no per-call state, so one instance can serve concurrent callers.
#[derive(Clone)]
pub struct EpochSolver {
    engine: Arc<dyn SolverService>,
    config: SolverConfig,
}

impl EpochSolver {
    /// Solver backed by the process-wide default engine
    pub fn new() -> Self {
        Self {
            engine: SolverFactory::shared(),
            config: SolverConfig::default(),
        }
    }

    /// Solver using the engine selected by `config.backend`
    pub fn with_config(config: SolverConfig) -> Result<Self> {
        let engine = SolverFactory::create_from_backend(config.backend)?;
        Ok(Self { engine, config })
    }

    /// Solver using an explicit engine
    pub fn with_engine(engine: Arc<dyn SolverService>, config: SolverConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Executes the orders as far as the reserve bounds allow, in weight order.
    pub fn solve(
        &self,
        state: &PoolState,
        orders: &[TrancheOrders],
        weights: &[TrancheWeights],
    ) -> Result<SolverResult> {
        self.run(state, orders, weights, None)
    }

    /// Like [`solve`](Self::solve), but with the invest order of `tranche`
    /// lifted to the most the pool could absorb. The result's invest amount
    /// for `tranche` is its investment capacity.
    pub fn solve_for_capacity(
        &self,
        state: &PoolState,
        orders: &[TrancheOrders],
        weights: &[TrancheWeights],
        tranche: usize,
    ) -> Result<SolverResult> {
        self.run(state, orders, weights, Some(tranche))
    }

    /// How much `tranche` could take in this epoch given the other orders,
    /// `None` if no execution is feasible.
    pub fn investment_capacity(
        &self,
        state: &PoolState,
        orders: &[TrancheOrders],
        weights: &[TrancheWeights],
        tranche: usize,
    ) -> Result<Option<Amount>> {
        let result = self.solve_for_capacity(state, orders, weights, tranche)?;
        Ok(result
            .is_feasible
            .then(|| result.tranches[tranche].invest))
    }

    /// The LP model the solver would hand to its engine
    pub fn build_model(
        &self,
        state: &PoolState,
        orders: &[TrancheOrders],
        weights: &[TrancheWeights],
        capacity_target: Option<usize>,
    ) -> Result<OptimizationProblem> {
        validator::validate_input(state, orders, weights, capacity_target)?;
        Ok(builder::build_problem(
            state,
            orders,
            weights,
            capacity_target,
            &self.config,
        ))
    }

    fn run(
        &self,
        state: &PoolState,
        orders: &[TrancheOrders],
        weights: &[TrancheWeights],
        capacity_target: Option<usize>,
    ) -> Result<SolverResult> {
        let problem = self.build_model(state, orders, weights, capacity_target)?;
        tracing::debug!(
            variables = problem.num_variables(),
            constraints = problem.constraints.len(),
            engine = self.engine.name(),
            "built epoch model"
        );
        tracing::trace!(model = %lp_format::to_lp_string(&problem), "epoch LP");

        let solution = self.engine.solve(&problem)?;
        tracing::debug!(
            status = %solution.status,
            integer = solution.integer_solution,
            solve_time_ms = solution.statistics.solve_time_ms,
            "engine finished"
        );

        let bounds = builder::variable_bounds(state, orders, capacity_target);
        let result = extractor::extract_result(&solution, state, &bounds, weights)?;

        tracing::info!(
            tranches = result.tranches.len(),
            feasible = result.is_feasible,
            invest = %result.total_invest(),
            redeem = %result.total_redeem(),
            "epoch solved"
        );
        Ok(result)
    }
}

impl Default for EpochSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "async")]
impl EpochSolver {
    /// Runs [`solve`](Self::solve) on tokio's blocking pool
    pub async fn solve_async(
        &self,
        state: PoolState,
        orders: Vec<TrancheOrders>,
        weights: Vec<TrancheWeights>,
    ) -> Result<SolverResult> {
        let solver = self.clone();
        tokio::task::spawn_blocking(move || solver.solve(&state, &orders, &weights))
            .await
            .map_err(|e| {
                crate::domain::solver_service::SolverError::ExecutionFailed(format!(
                    "solver task failed: {}",
                    e
                ))
            })?
    }
}
