// Shared translation from the domain model to good_lp
// Used by every engine that good_lp drives (microlp, CBC)

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverError},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType},
};
use good_lp::{
    solvers::Solver, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;

/// Builds `problem` for `solver`, lets `configure` adjust the engine model,
/// then solves and maps the outcome back to a domain [`DomainSolution`].
pub(crate) fn solve_with<S, F>(
    problem: &OptimizationProblem,
    solver: S,
    engine_name: &str,
    configure: F,
) -> Result<DomainSolution>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
    F: FnOnce(S::Model) -> S::Model,
{
    let start_time = Instant::now();
    let num_vars = problem.num_variables();

    let mut vars = variables!();
    let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(num_vars);

    for var_def in &problem.variables {
        let lower = var_def.lower_bound;
        let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

        let var = match var_def.variable_type {
            VariableType::Integer => vars.add(variable().integer().min(lower).max(upper)),
            VariableType::Continuous => vars.add(variable().min(lower).max(upper)),
        };
        lp_variables.push(var);
    }

    let mut obj_expr: Expression = 0.into();
    for (&coeff, &var) in problem.objective.coefficients.iter().zip(&lp_variables) {
        if coeff != 0.0 {
            obj_expr += coeff * var;
        }
    }

    let unsolved = match problem.objective.optimization_type {
        OptimizationType::Maximize => vars.maximise(obj_expr),
        OptimizationType::Minimize => vars.minimise(obj_expr),
    };
    let mut lp_model = configure(unsolved.using(solver));

    for constraint in &problem.constraints {
        let mut lhs: Expression = 0.into();
        for (&coeff, &var) in constraint.coefficients.iter().zip(&lp_variables) {
            if coeff != 0.0 {
                lhs += coeff * var;
            }
        }

        lp_model = match constraint.constraint_type {
            ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(constraint.bound)),
            ConstraintType::Equal => lp_model.with(lhs.eq(constraint.bound)),
            ConstraintType::GreaterThanOrEqual => lp_model.with(lhs.geq(constraint.bound)),
        };
    }

    let solution_result = lp_model.solve();
    let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
    let statistics = SolverStatistics::for_problem(problem, solve_time);

    match solution_result {
        Ok(sol) => {
            let variable_values: Vec<f64> = lp_variables.iter().map(|&var| sol.value(var)).collect();
            let objective_value = problem.objective_value(&variable_values);

            let mut solution = DomainSolution::optimal(objective_value, variable_values)
                .with_statistics(statistics)
                .with_integrality_check(problem.solver_config.integrality_tolerance);
            solution.message = format!(
                "Optimal solution found for '{}' by {}",
                problem.name, engine_name
            );
            Ok(solution)
        }
        Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
            SolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        )
        .with_statistics(statistics)),
        Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
            SolutionStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        )
        .with_statistics(statistics)),
        Err(e) => Err(SolverError::ExecutionFailed(format!(
            "{} failed: {:?}",
            engine_name, e
        ))),
    }
}
