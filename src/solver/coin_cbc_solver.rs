use crate::domain::{
    models::{OptimizationProblem, Solution},
    solver_service::{Result, SolverService},
};
use crate::solver::good_lp_model;
use good_lp::solvers::coin_cbc;

/// COIN-OR CBC through good_lp; needs the system CBC library
pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
        self.validate(problem)?;

        let config = &problem.solver_config;
        good_lp_model::solve_with(problem, coin_cbc::coin_cbc, self.name(), |mut model| {
            if !config.verbose {
                model.set_parameter("log", "0");
            }
            if let Some(limit) = config.time_limit {
                model.set_parameter("seconds", &limit.to_string());
            }
            model
        })
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
