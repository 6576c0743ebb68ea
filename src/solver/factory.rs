use crate::domain::{
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use crate::solver::MicroLpSolver;
use std::sync::{Arc, OnceLock};

static SHARED_ENGINE: OnceLock<Arc<dyn SolverService>> = OnceLock::new();

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Ok(Self::default_solver()),
            SolverBackend::MicroLp => Ok(Arc::new(MicroLpSolver::new())),
            SolverBackend::CoinCbc => Self::coin_cbc(),
            SolverBackend::Highs => Self::highs(),
        }
    }

    /// Best engine compiled into this build: HiGHS, then CBC, then microlp
    pub fn default_solver() -> Arc<dyn SolverService> {
        Self::highs()
            .or_else(|_| Self::coin_cbc())
            .unwrap_or_else(|_| Arc::new(MicroLpSolver::new()))
    }

    /// Process-wide default engine, created on first use
    pub fn shared() -> Arc<dyn SolverService> {
        SHARED_ENGINE
            .get_or_init(|| {
                let engine = Self::default_solver();
                tracing::debug!(engine = engine.name(), "initialized shared solver engine");
                engine
            })
            .clone()
    }

    #[cfg(feature = "coin_cbc")]
    fn coin_cbc() -> Result<Arc<dyn SolverService>> {
        Ok(Arc::new(crate::solver::CoinCbcSolver::new()))
    }

    #[cfg(not(feature = "coin_cbc"))]
    fn coin_cbc() -> Result<Arc<dyn SolverService>> {
        Err(SolverError::SolverNotAvailable(
            "COIN-OR CBC support was not compiled in (enable the `coin_cbc` feature)".to_string(),
        ))
    }

    #[cfg(feature = "highs")]
    fn highs() -> Result<Arc<dyn SolverService>> {
        Ok(Arc::new(crate::solver::HighsSolver::new()))
    }

    #[cfg(not(feature = "highs"))]
    fn highs() -> Result<Arc<dyn SolverService>> {
        Err(SolverError::SolverNotAvailable(
            "HiGHS support was not compiled in (enable the `highs` feature)".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn microlp_is_always_available() {
        let solver = SolverFactory::create_from_backend(SolverBackend::MicroLp).unwrap();
        assert_eq!(solver.name(), "microlp");
    }

    #[test]
    fn shared_engine_is_created_once() {
        let first = SolverFactory::shared();
        let second = SolverFactory::shared();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[cfg(not(feature = "highs"))]
    #[test]
    fn missing_backend_is_an_engine_failure() {
        let err = SolverFactory::create_from_backend(SolverBackend::Highs)
            .err()
            .expect("HiGHS should not be available");
        assert!(err.is_engine_failure());
    }
}
