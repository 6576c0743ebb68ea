// Epoch checks: exact re-check of a result against its orders and the pool reserve

use crate::domain::{
    amount::Amount,
    pool::{PoolState, SolverResult, TrancheOrders},
};

/// One broken invariant in a [`SolverResult`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("result has {actual} tranches, expected {expected}")]
    TrancheCount { expected: usize, actual: usize },

    #[error("tranche {index} invests {executed}, order is {ordered}")]
    InvestAboveOrder {
        index: usize,
        executed: Amount,
        ordered: Amount,
    },

    #[error("tranche {index} redeems {executed}, order is {ordered}")]
    RedeemAboveOrder {
        index: usize,
        executed: Amount,
        ordered: Amount,
    },

    #[error("net outflow drives the reserve below zero")]
    ReserveBelowZero,

    #[error("net inflow pushes the reserve above its maximum")]
    ReserveAboveMaximum,

    #[error("infeasible result executes tranche {index}")]
    NonZeroInfeasible { index: usize },
}

/// All invariant violations of `result`; empty when it is sound.
///
/// Feasible results must stay within the order bounds and keep
/// `0 <= reserve + Σinvest - Σredeem <= maxReserve`. Infeasible results must
/// be all zero.
pub fn check_solution(
    state: &PoolState,
    orders: &[TrancheOrders],
    result: &SolverResult,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if result.tranches.len() != orders.len() {
        violations.push(Violation::TrancheCount {
            expected: orders.len(),
            actual: result.tranches.len(),
        });
        return violations;
    }

    if !result.is_feasible {
        violations.extend(
            result
                .tranches
                .iter()
                .enumerate()
                .filter(|(_, t)| !t.invest.is_zero() || !t.redeem.is_zero())
                .map(|(index, _)| Violation::NonZeroInfeasible { index }),
        );
        return violations;
    }

    for (index, (executed, ordered)) in result.tranches.iter().zip(orders).enumerate() {
        if executed.invest > ordered.invest {
            violations.push(Violation::InvestAboveOrder {
                index,
                executed: executed.invest,
                ordered: ordered.invest,
            });
        }
        if executed.redeem > ordered.redeem {
            violations.push(Violation::RedeemAboveOrder {
                index,
                executed: executed.redeem,
                ordered: ordered.redeem,
            });
        }
    }

    violations.extend(reserve_violation(state, result));
    violations
}

/// Reserve check alone, in unsigned arithmetic:
/// `reserve + Σinvest >= Σredeem` and `reserve + Σinvest <= maxReserve + Σredeem`.
pub(crate) fn reserve_violation(state: &PoolState, result: &SolverResult) -> Option<Violation> {
    let inflow = state.reserve.saturating_add(result.total_invest());
    let redeemed = result.total_redeem();

    if inflow < redeemed {
        Some(Violation::ReserveBelowZero)
    } else if inflow > state.max_reserve.saturating_add(redeemed) {
        Some(Violation::ReserveAboveMaximum)
    } else {
        None
    }
}
