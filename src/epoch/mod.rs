// Epoch order matching: validation, model building and result extraction

pub mod builder;
pub mod checks;
pub mod extractor;
pub mod solver;
pub mod validator;

pub use checks::{check_solution, Violation};
pub use solver::EpochSolver;
pub use validator::validate_input;
