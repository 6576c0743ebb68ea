// Application service: request/report documents around the epoch solver
// Keeps the document shape used by callers out of the domain types

use serde::{Deserialize, Serialize};

use crate::domain::{
    amount::{self, Amount},
    pool::{PoolState, SolverResult, TrancheOrders, TrancheSolution, TrancheWeights},
    solver_service::{Result, ValidationError},
};
use crate::epoch::EpochSolver;

/// Everything needed to close one epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRequest {
    pub state: PoolState,
    pub orders: Vec<TrancheOrders>,
    /// Defaults to [`TrancheWeights::prioritized`] when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<TrancheWeights>>,
}

impl EpochRequest {
    pub fn new(state: PoolState, orders: Vec<TrancheOrders>) -> Self {
        Self {
            state,
            orders,
            weights: None,
        }
    }

    pub fn with_weights(mut self, weights: Vec<TrancheWeights>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn effective_weights(&self) -> std::result::Result<Vec<TrancheWeights>, ValidationError> {
        match &self.weights {
            Some(weights) => Ok(weights.clone()),
            None => TrancheWeights::prioritized(self.state.tranches.len()),
        }
    }
}

/// Outcome of one epoch, as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochReport {
    pub is_feasible: bool,
    pub tranches: Vec<TrancheSolution>,
    #[serde(with = "amount::serde_decimal_opt")]
    pub reserve_after: Option<Amount>,
    /// Investment capacity of the requested tranche, if one was requested
    #[serde(
        with = "amount::serde_decimal_opt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub capacity: Option<Amount>,
    pub engine: String,
}

impl EpochReport {
    fn from_result(result: SolverResult, state: &PoolState, engine: &str) -> Self {
        let reserve_after = if result.is_feasible {
            result.reserve_after(state)
        } else {
            Some(state.reserve)
        };
        Self {
            is_feasible: result.is_feasible,
            tranches: result.tranches,
            reserve_after,
            capacity: None,
            engine: engine.to_string(),
        }
    }
}

/// Solves `request`; with `capacity_for` the report also carries that
/// tranche's investment capacity.
pub fn close_epoch(
    solver: &EpochSolver,
    request: &EpochRequest,
    capacity_for: Option<usize>,
) -> Result<EpochReport> {
    let weights = request.effective_weights()?;
    let result = solver.solve(&request.state, &request.orders, &weights)?;
    let mut report = EpochReport::from_result(result, &request.state, solver.engine_name());

    if let Some(tranche) = capacity_for {
        report.capacity =
            solver.investment_capacity(&request.state, &request.orders, &weights, tranche)?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        models::SolverConfig, pool::TrancheState, solver_service::SolverError,
        value_objects::SolverBackend,
    };

    const REQUEST: &str = r#"{
        "state": {
            "netAssetValue": "0",
            "reserve": "1000",
            "maxReserve": "1500",
            "tranches": [
                { "ratio": "20" },
                { "ratio": "80", "minRiskBuffer": "15" }
            ]
        },
        "orders": [
            { "invest": "300", "redeem": "100" },
            { "invest": "400", "redeem": "0" }
        ]
    }"#;

    fn solver() -> EpochSolver {
        EpochSolver::with_config(SolverConfig::default().with_backend(SolverBackend::MicroLp))
            .unwrap()
    }

    #[test]
    fn request_without_weights_uses_prioritized_defaults() {
        let request: EpochRequest = serde_json::from_str(REQUEST).unwrap();
        assert!(request.weights.is_none());
        assert_eq!(
            request.effective_weights().unwrap(),
            TrancheWeights::prioritized(2).unwrap()
        );
    }

    #[test]
    fn oversized_pool_without_weights_is_rejected() {
        let tranches = std::iter::once(TrancheState::junior(Amount::from(1)))
            .chain((1..160).map(|_| TrancheState::senior(Amount::from(1), Amount::from(1))))
            .collect();
        let request = EpochRequest::new(
            PoolState::new(Amount::ZERO, Amount::from(100), tranches),
            vec![TrancheOrders::default(); 160],
        );

        let err = close_epoch(&solver(), &request, None).unwrap_err();
        assert!(matches!(
            err,
            SolverError::Validation(ValidationError::TooManyTranches { count: 160, .. })
        ));
        assert!(!err.is_engine_failure());
    }

    #[test]
    fn report_carries_projected_reserve_and_capacity() {
        let request: EpochRequest = serde_json::from_str(REQUEST).unwrap();
        let report = close_epoch(&solver(), &request, Some(1)).unwrap();

        // Headroom is 500 plus the 100 redeemed; junior invest outranks senior.
        assert!(report.is_feasible);
        assert_eq!(
            report.tranches,
            vec![
                TrancheSolution::new(Amount::from(300), Amount::from(100)),
                TrancheSolution::new(Amount::from(300), Amount::ZERO),
            ]
        );
        assert_eq!(report.reserve_after, Some(Amount::from(1_500)));
        assert_eq!(report.capacity, Some(Amount::from(300)));
        assert_eq!(report.engine, "microlp");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["reserveAfter"], "1500");
        assert_eq!(json["tranches"][0]["invest"], "300");
    }
}
