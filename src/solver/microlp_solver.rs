use crate::domain::{
    models::{OptimizationProblem, Solution},
    solver_service::{Result, SolverService},
};
use crate::solver::good_lp_model;
use good_lp::solvers::microlp::microlp;

/// Pure Rust simplex engine, always compiled in
pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
        self.validate(problem)?;

        if problem.solver_config.time_limit.is_some() {
            tracing::debug!("microlp has no time limit support, ignoring configured limit");
        }

        good_lp_model::solve_with(problem, microlp, self.name(), |model| model)
    }

    fn name(&self) -> &str {
        "microlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        models::{Constraint, ObjectiveFunction, Variable},
        value_objects::{ConstraintType, OptimizationType, SolutionStatus},
    };

    fn two_variable_problem(ceiling: f64, floor: f64) -> OptimizationProblem {
        objective_problem(OptimizationType::Maximize, ceiling, floor)
    }

    fn objective_problem(sense: OptimizationType, ceiling: f64, floor: f64) -> OptimizationProblem {
        OptimizationProblem::new(ObjectiveFunction::new(sense, vec![3.0, 1.0]))
        .with_variables(vec![
            Variable::continuous("a").with_bounds(0.0, Some(80.0)),
            Variable::continuous("b").with_bounds(0.0, Some(80.0)),
        ])
        .add_constraint(Constraint::new(
            ConstraintType::LessThanOrEqual,
            vec![1.0, 1.0],
            ceiling,
        ))
        .add_constraint(Constraint::new(
            ConstraintType::GreaterThanOrEqual,
            vec![1.0, 1.0],
            floor,
        ))
    }

    #[test]
    fn solves_bounded_lp_to_integral_vertex() {
        let solution = MicroLpSolver::new()
            .solve(&two_variable_problem(100.0, 0.0))
            .unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!(solution.integer_solution);
        assert!((solution.variable_values[0] - 80.0).abs() < 1e-6);
        assert!((solution.variable_values[1] - 20.0).abs() < 1e-6);
        assert!((solution.optimal_value.unwrap() - 260.0).abs() < 1e-6);
    }

    #[test]
    fn minimizes_toward_the_cheaper_variable() {
        let solution = MicroLpSolver::new()
            .solve(&objective_problem(OptimizationType::Minimize, 100.0, 50.0))
            .unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.variable_values[0]).abs() < 1e-6);
        assert!((solution.variable_values[1] - 50.0).abs() < 1e-6);
        assert!((solution.optimal_value.unwrap() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn reports_infeasibility_as_status() {
        let solution = MicroLpSolver::new()
            .solve(&two_variable_problem(100.0, 200.0))
            .unwrap();

        assert!(solution.is_infeasible());
        assert!(solution.variable_values.is_empty());
    }

    #[test]
    fn rejects_inconsistent_problem_before_solving() {
        let problem = two_variable_problem(100.0, 0.0)
            .add_constraint(Constraint::new(ConstraintType::Equal, vec![1.0], 5.0));

        assert!(MicroLpSolver::new().solve(&problem).is_err());
    }
}
