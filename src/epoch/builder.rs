// Epoch model: pool state, orders and weights to an LP
// Variables come in pairs (invest_i, redeem_i); both reserve rows constrain the net flow
// Risk-buffer rows are not part of the model

use crate::domain::{
    amount::{self, Amount},
    models::{Constraint, ObjectiveFunction, OptimizationProblem, SolverConfig, Variable},
    pool::{PoolState, TrancheOrders, TrancheWeights},
    value_objects::{ConstraintType, OptimizationType},
};

pub const RESERVE_FLOOR: &str = "reserve_floor";
pub const RESERVE_CEILING: &str = "reserve_ceiling";

pub fn invest_variable(tranche: usize) -> String {
    format!("invest_{}", tranche)
}

pub fn redeem_variable(tranche: usize) -> String {
    format!("redeem_{}", tranche)
}

/// Exact upper bound for every decision variable, in declaration order.
///
/// In capacity mode the target tranche's invest bound is the largest inflow
/// any execution could absorb: `maxReserve + Σ redeem orders`.
pub fn variable_bounds(
    state: &PoolState,
    orders: &[TrancheOrders],
    capacity_target: Option<usize>,
) -> Vec<Amount> {
    let capacity_bound = orders
        .iter()
        .fold(state.max_reserve, |acc, o| acc.saturating_add(o.redeem));

    orders
        .iter()
        .enumerate()
        .flat_map(|(i, order)| {
            let invest = if capacity_target == Some(i) {
                capacity_bound
            } else {
                order.invest
            };
            [invest, order.redeem]
        })
        .collect()
}

/// Builds the epoch LP. Input must already be validated.
pub fn build_problem(
    state: &PoolState,
    orders: &[TrancheOrders],
    weights: &[TrancheWeights],
    capacity_target: Option<usize>,
    config: &SolverConfig,
) -> OptimizationProblem {
    let bounds = variable_bounds(state, orders, capacity_target);

    let variables = bounds
        .chunks(2)
        .enumerate()
        .flat_map(|(i, pair)| {
            [
                order_variable(invest_variable(i), pair[0], config),
                order_variable(redeem_variable(i), pair[1], config),
            ]
        })
        .collect::<Vec<_>>();

    let objective = weights
        .iter()
        .flat_map(|w| [w.invest, w.redeem])
        .collect::<Vec<_>>();

    let net_flow = orders
        .iter()
        .flat_map(|_| [1.0, -1.0])
        .collect::<Vec<_>>();

    let floor = -amount::to_f64(state.reserve);
    let ceiling = amount::signed_difference(state.max_reserve, state.reserve);

    OptimizationProblem::new(ObjectiveFunction::new(OptimizationType::Maximize, objective))
        .with_name("epoch")
        .with_variables(variables)
        .add_constraint(
            Constraint::new(ConstraintType::GreaterThanOrEqual, net_flow.clone(), floor)
                .with_name(RESERVE_FLOOR),
        )
        .add_constraint(
            Constraint::new(ConstraintType::LessThanOrEqual, net_flow, ceiling)
                .with_name(RESERVE_CEILING),
        )
        .with_config(config.clone())
}

fn order_variable(name: String, bound: Amount, config: &SolverConfig) -> Variable {
    let variable = if config.integer_variables {
        Variable::integer(name)
    } else {
        Variable::continuous(name)
    };
    variable.with_bounds(0.0, Some(amount::to_f64(bound)))
}
