// Domain module: pool types, the LP model and the solver contract

pub mod amount;
pub mod models;
pub mod pool;
pub mod solver_service;
pub mod value_objects;

pub use amount::Amount;
pub use models::*;
pub use pool::*;
pub use solver_service::*;
pub use value_objects::*;
