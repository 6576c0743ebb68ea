// Domain: pool, tranche and order types exchanged with callers of the epoch solver

use serde::{Deserialize, Serialize};

use super::amount::{self, Amount};
use super::solver_service::ValidationError;

/// Snapshot of the pool at epoch close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolState {
    #[serde(with = "amount::serde_decimal", default)]
    pub net_asset_value: Amount,
    #[serde(with = "amount::serde_decimal")]
    pub reserve: Amount,
    #[serde(with = "amount::serde_decimal")]
    pub max_reserve: Amount,
    /// Index 0 is the most junior tranche
    pub tranches: Vec<TrancheState>,
}

impl PoolState {
    pub fn new(reserve: Amount, max_reserve: Amount, tranches: Vec<TrancheState>) -> Self {
        Self {
            net_asset_value: Amount::ZERO,
            reserve,
            max_reserve,
            tranches,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrancheState {
    #[serde(with = "amount::serde_decimal_opt", default)]
    pub ratio: Option<Amount>,
    /// Only non-junior tranches carry a subordination requirement
    #[serde(
        with = "amount::serde_decimal_opt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub min_risk_buffer: Option<Amount>,
}

impl TrancheState {
    pub fn junior(ratio: Amount) -> Self {
        Self {
            ratio: Some(ratio),
            min_risk_buffer: None,
        }
    }

    pub fn senior(ratio: Amount, min_risk_buffer: Amount) -> Self {
        Self {
            ratio: Some(ratio),
            min_risk_buffer: Some(min_risk_buffer),
        }
    }
}

/// Pending order totals for one tranche; both are upper bounds on execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrancheOrders {
    #[serde(with = "amount::serde_decimal")]
    pub invest: Amount,
    #[serde(with = "amount::serde_decimal")]
    pub redeem: Amount,
}

impl TrancheOrders {
    pub fn new(invest: Amount, redeem: Amount) -> Self {
        Self { invest, redeem }
    }
}

/// Objective coefficients for one tranche.
///
/// Only the relative magnitude matters: the optimizer exhausts the order with
/// the larger weight before it touches one with a smaller weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrancheWeights {
    pub invest: f64,
    pub redeem: f64,
}

impl TrancheWeights {
    /// Largest pool [`prioritized`](Self::prioritized) can weight
    pub const MAX_PRIORITIZED_TRANCHES: usize = 150;

    pub fn new(invest: f64, redeem: f64) -> Self {
        Self { invest, redeem }
    }

    /// Conventional priority for `tranche_count` tranches, each rank ten
    /// times the next.
    ///
    /// Redemptions outrank investments. Redemptions rank most senior first,
    /// investments rank most junior first. For two tranches this yields
    /// senior redeem > junior redeem > junior invest > senior invest.
    ///
    /// The top rank is `10^(2n + 1)`, so at most
    /// [`MAX_PRIORITIZED_TRANCHES`](Self::MAX_PRIORITIZED_TRANCHES) tranches
    /// get finite weights; larger pools must supply their own.
    pub fn prioritized(tranche_count: usize) -> Result<Vec<TrancheWeights>, ValidationError> {
        if tranche_count > Self::MAX_PRIORITIZED_TRANCHES {
            return Err(ValidationError::TooManyTranches {
                count: tranche_count,
                max: Self::MAX_PRIORITIZED_TRANCHES,
            });
        }
        let rank_weight = |rank: usize| 10f64.powi(rank as i32);
        // Lowest rank is the most senior invest; highest is the most senior redeem.
        Ok((0..tranche_count)
            .map(|i| TrancheWeights {
                invest: rank_weight(tranche_count - i),
                redeem: rank_weight(tranche_count + 1 + i),
            })
            .collect())
    }
}

/// Executed amounts for one tranche
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrancheSolution {
    #[serde(with = "amount::serde_decimal")]
    pub invest: Amount,
    #[serde(with = "amount::serde_decimal")]
    pub redeem: Amount,
}

impl TrancheSolution {
    pub fn new(invest: Amount, redeem: Amount) -> Self {
        Self { invest, redeem }
    }
}

/// Outcome of one epoch solve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResult {
    pub is_feasible: bool,
    pub tranches: Vec<TrancheSolution>,
}

impl SolverResult {
    pub fn feasible(tranches: Vec<TrancheSolution>) -> Self {
        Self {
            is_feasible: true,
            tranches,
        }
    }

    /// All-zero result for `tranche_count` tranches
    pub fn infeasible(tranche_count: usize) -> Self {
        Self {
            is_feasible: false,
            tranches: vec![TrancheSolution::default(); tranche_count],
        }
    }

    pub fn total_invest(&self) -> Amount {
        self.tranches
            .iter()
            .fold(Amount::ZERO, |acc, t| acc.saturating_add(t.invest))
    }

    pub fn total_redeem(&self) -> Amount {
        self.tranches
            .iter()
            .fold(Amount::ZERO, |acc, t| acc.saturating_add(t.redeem))
    }

    /// Reserve after executing this result, `None` if it would go negative.
    pub fn reserve_after(&self, state: &PoolState) -> Option<Amount> {
        state
            .reserve
            .saturating_add(self.total_invest())
            .checked_sub(self.total_redeem())
    }
}
