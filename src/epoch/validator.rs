// Epoch validation: structural checks on the solver input

use crate::domain::{
    pool::{PoolState, TrancheOrders, TrancheWeights},
    solver_service::ValidationError,
};

/// Fails on the first structural problem found in the input.
///
/// `capacity_target` is the tranche index for an investment-capacity solve.
pub fn validate_input(
    state: &PoolState,
    orders: &[TrancheOrders],
    weights: &[TrancheWeights],
    capacity_target: Option<usize>,
) -> Result<(), ValidationError> {
    let tranche_count = state.tranches.len();
    if orders.len() != tranche_count || weights.len() != tranche_count {
        return Err(ValidationError::MismatchedInputLength {
            tranches: tranche_count,
            orders: orders.len(),
            weights: weights.len(),
        });
    }

    match state.tranches.first() {
        Some(junior) if junior.min_risk_buffer.is_none() => {}
        _ => return Err(ValidationError::MissingJuniorTranche),
    }

    for (index, tranche) in state.tranches.iter().enumerate().skip(1) {
        if tranche.min_risk_buffer.is_none() {
            return Err(ValidationError::MissingMinRiskBuffer { index });
        }
    }

    for (index, tranche) in state.tranches.iter().enumerate() {
        if tranche.ratio.is_none() {
            return Err(ValidationError::MissingRatio { index });
        }
    }

    for (index, weight) in weights.iter().enumerate() {
        for (kind, value) in [("invest", weight.invest), ("redeem", weight.redeem)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidWeight { index, kind, value });
            }
        }
    }

    if let Some(index) = capacity_target {
        if index >= tranche_count {
            return Err(ValidationError::InvalidCapacityTranche {
                index,
                tranche_count,
            });
        }
    }

    Ok(())
}
