// Domain service interface for solving optimization problems
// Engines plug in behind this trait; the epoch pipeline never names a backend directly.

use super::models::{OptimizationProblem, Solution};

/// Malformed pool configuration detected before any model is built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("mismatched input length: {tranches} tranches, {orders} orders, {weights} weights")]
    MismatchedInputLength {
        tranches: usize,
        orders: usize,
        weights: usize,
    },

    #[error("missing junior tranche")]
    MissingJuniorTranche,

    #[error("missing min risk buffer for non-junior tranche {index}")]
    MissingMinRiskBuffer { index: usize },

    #[error("missing ratio for tranche {index}")]
    MissingRatio { index: usize },

    #[error("trying to calculate investment capacity for an invalid tranche: {index} (pool has {tranche_count})")]
    InvalidCapacityTranche { index: usize, tranche_count: usize },

    #[error("invalid {kind} weight for tranche {index}: {value}")]
    InvalidWeight {
        index: usize,
        kind: &'static str,
        value: f64,
    },

    #[error("cannot derive default weights for {count} tranches (at most {max})")]
    TooManyTranches { count: usize, max: usize },
}

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Malformed solution: expected {expected} values, engine returned {actual}")]
    MalformedSolution { expected: usize, actual: usize },
}

impl SolverError {
    /// Infrastructure failure of the engine, as opposed to bad caller input
    pub fn is_engine_failure(&self) -> bool {
        matches!(
            self,
            SolverError::SolverNotAvailable(_)
                | SolverError::ExecutionFailed(_)
                | SolverError::MalformedSolution { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
///
/// Implementations translate an [`OptimizationProblem`] into the engine's own
/// representation and report status, values and integrality back as a
/// [`Solution`]. An infeasible problem is a successful solve with
/// `SolutionStatus::Infeasible`, not an error.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();

        if problem.objective.coefficients.is_empty() {
            errors.push("Objective must have at least one coefficient".to_string());
        }

        let num_vars = problem.num_variables();

        if problem.variables.len() != num_vars {
            errors.push(format!(
                "Number of variables ({}) doesn't match objective coefficients ({})",
                problem.variables.len(),
                num_vars
            ));
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            if constraint.num_variables() != num_vars {
                errors.push(format!(
                    "Constraint {} has {} coefficients but problem has {} variables",
                    i,
                    constraint.num_variables(),
                    num_vars
                ));
            }
            if !constraint.bound.is_finite() {
                errors.push(format!("Constraint {} has a non-finite bound", i));
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_failures_are_distinguished_from_configuration_errors() {
        assert!(SolverError::ExecutionFailed("crashed".into()).is_engine_failure());
        assert!(SolverError::MalformedSolution {
            expected: 4,
            actual: 3
        }
        .is_engine_failure());
        assert!(!SolverError::from(ValidationError::MissingJuniorTranche).is_engine_failure());
    }

    #[test]
    fn validation_messages_name_the_problem() {
        assert_eq!(
            ValidationError::MissingJuniorTranche.to_string(),
            "missing junior tranche"
        );
        assert_eq!(
            ValidationError::MissingMinRiskBuffer { index: 2 }.to_string(),
            "missing min risk buffer for non-junior tranche 2"
        );
    }
}
