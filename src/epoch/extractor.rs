// Epoch extraction: raw engine output to exact per-tranche amounts

use crate::domain::{
    amount::{self, Amount},
    models::Solution,
    pool::{PoolState, SolverResult, TrancheSolution, TrancheWeights},
    solver_service::{Result, SolverError},
    value_objects::SolutionStatus,
};
use crate::epoch::checks::{self, Violation};

/// Derives the epoch result from an engine solution.
///
/// `bounds` are the exact variable upper bounds in declaration order
/// (`invest_0, redeem_0, …`). Only an optimal, integral solution yields a
/// feasible result; every other outcome is the all-zero infeasible shape.
/// A wrong vector length or a non-finite value is an engine failure.
pub fn extract_result(
    solution: &Solution,
    state: &PoolState,
    bounds: &[Amount],
    weights: &[TrancheWeights],
) -> Result<SolverResult> {
    let tranche_count = bounds.len() / 2;

    match solution.status {
        SolutionStatus::Optimal => {}
        SolutionStatus::Infeasible => {
            tracing::debug!("engine reports no feasible execution");
            return Ok(SolverResult::infeasible(tranche_count));
        }
        status => {
            tracing::warn!(%status, message = %solution.message, "solution is not a proven optimum");
            return Ok(SolverResult::infeasible(tranche_count));
        }
    }

    let values = &solution.variable_values;
    if values.len() != bounds.len() {
        return Err(SolverError::MalformedSolution {
            expected: bounds.len(),
            actual: values.len(),
        });
    }

    if !solution.integer_solution {
        tracing::warn!("engine solution is not integral, treating epoch as infeasible");
        return Ok(SolverResult::infeasible(tranche_count));
    }

    let mut exact = Vec::with_capacity(values.len());
    for (i, (&value, &bound)) in values.iter().zip(bounds).enumerate() {
        let rounded = amount::from_f64_rounded(value).ok_or_else(|| {
            SolverError::ExecutionFailed(format!("variable {} has unusable value {}", i, value))
        })?;
        exact.push(rounded.min(bound));
    }

    let mut result = SolverResult::feasible(
        exact
            .chunks(2)
            .map(|pair| TrancheSolution::new(pair[0], pair[1]))
            .collect(),
    );

    if let Some(violation) = checks::reserve_violation(state, &result) {
        tracing::warn!(%violation, "rounding broke the reserve bounds, trimming lowest priority orders");
        if !repair_reserve(&mut result, state, weights) {
            tracing::warn!("reserve bounds cannot be restored, treating epoch as infeasible");
            return Ok(SolverResult::infeasible(tranche_count));
        }
    }

    fill_headroom(&mut result, state, bounds, weights);
    Ok(result)
}

/// Hands exact reserve room the engine left unused back to unfilled orders.
///
/// The engine sees reserve limits as `f64`, so at a binding limit it can stop
/// up to one ulp short of the exact integer. Room within that tolerance goes
/// to invests (ceiling) or redeems (floor), highest weight first.
fn fill_headroom(
    result: &mut SolverResult,
    state: &PoolState,
    bounds: &[Amount],
    weights: &[TrancheWeights],
) {
    let tolerance = binding_tolerance(state, result);

    let inflow = state.reserve.saturating_add(result.total_invest());
    let ceiling = state.max_reserve.saturating_add(result.total_redeem());
    let room = ceiling.saturating_sub(inflow);
    if !room.is_zero() && room <= tolerance {
        let filled = fill_descending(result, bounds, weights, room, |w| w.invest, 0);
        tracing::debug!(%filled, "filled reserve ceiling room left by the engine");
    }

    let inflow = state.reserve.saturating_add(result.total_invest());
    let room = inflow.saturating_sub(result.total_redeem());
    if !room.is_zero() && room <= tolerance {
        let filled = fill_descending(result, bounds, weights, room, |w| w.redeem, 1);
        tracing::debug!(%filled, "filled reserve floor room left by the engine");
    }
}

/// Largest slack still attributable to `f64` rounding of the reserve limits
fn binding_tolerance(state: &PoolState, result: &SolverResult) -> Amount {
    let scale = state
        .reserve
        .max(state.max_reserve)
        .max(result.total_invest())
        .max(result.total_redeem());
    (scale / Amount::from(RELATIVE_PRECISION)).max(Amount::from(1))
}

const RELATIVE_PRECISION: u64 = 1_000_000_000;

/// Raises one side (`offset` 0 invest, 1 redeem) toward its bounds,
/// highest weight first, by at most `room`. Returns the amount added.
fn fill_descending(
    result: &mut SolverResult,
    bounds: &[Amount],
    weights: &[TrancheWeights],
    room: Amount,
    key: impl Fn(&TrancheWeights) -> f64,
    offset: usize,
) -> Amount {
    let mut left = room;
    for i in ascending_priority(weights, key).into_iter().rev() {
        let side = if offset == 0 {
            &mut result.tranches[i].invest
        } else {
            &mut result.tranches[i].redeem
        };
        let add = left.min(bounds[2 * i + offset].saturating_sub(*side));
        *side += add;
        left -= add;
    }
    room - left
}

/// Trims invest (ceiling) or redeem (floor) amounts, lowest weight first,
/// until the reserve bounds hold. Returns false if trimming cannot restore
/// them.
fn repair_reserve(result: &mut SolverResult, state: &PoolState, weights: &[TrancheWeights]) -> bool {
    let inflow = state.reserve.saturating_add(result.total_invest());
    let redeemed = result.total_redeem();

    match checks::reserve_violation(state, result) {
        None => return true,
        Some(Violation::ReserveAboveMaximum) => {
            let mut excess = inflow - state.max_reserve.saturating_add(redeemed);
            for i in ascending_priority(weights, |w| w.invest) {
                let cut = excess.min(result.tranches[i].invest);
                result.tranches[i].invest -= cut;
                excess -= cut;
            }
        }
        Some(Violation::ReserveBelowZero) => {
            let mut deficit = redeemed - inflow;
            for i in ascending_priority(weights, |w| w.redeem) {
                let cut = deficit.min(result.tranches[i].redeem);
                result.tranches[i].redeem -= cut;
                deficit -= cut;
            }
        }
        Some(_) => return false,
    }

    checks::reserve_violation(state, result).is_none()
}

fn ascending_priority(weights: &[TrancheWeights], key: impl Fn(&TrancheWeights) -> f64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| key(&weights[a]).total_cmp(&key(&weights[b])).then(b.cmp(&a)));
    order
}
