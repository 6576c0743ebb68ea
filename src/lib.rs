// Domain layer: pool types, LP model and the solver contract
pub mod domain;

// Epoch pipeline: validate, build, solve, extract
pub mod epoch;

// Application layer: request/report documents
pub mod application;

// Infrastructure layer: command line front end
#[cfg(feature = "cli")]
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Amount, OptimizationProblem, PoolState, Solution, SolutionStatus, SolverBackend, SolverConfig,
    SolverError, SolverResult, SolverService, TrancheOrders, TrancheSolution, TrancheState,
    TrancheWeights, ValidationError,
};

pub use application::{close_epoch, EpochReport, EpochRequest};
pub use epoch::{check_solution, EpochSolver, Violation};

#[cfg(feature = "cli")]
pub use infrastructure::{init_tracing, run, Cli};

pub use solver::{MicroLpSolver, SolverFactory};

#[cfg(feature = "coin_cbc")]
pub use solver::CoinCbcSolver;

#[cfg(feature = "highs")]
pub use solver::HighsSolver;
