// End-to-end epoch scenarios against the microlp engine

use std::sync::Arc;

use epoch_solver::{
    check_solution, Amount, EpochSolver, MicroLpSolver, PoolState, SolverConfig, SolverError,
    SolverResult, TrancheOrders, TrancheSolution, TrancheState, TrancheWeights, ValidationError,
};
use rstest::rstest;

fn solver() -> EpochSolver {
    EpochSolver::with_engine(Arc::new(MicroLpSolver::new()), SolverConfig::default())
}

fn amt(v: u64) -> Amount {
    Amount::from(v)
}

fn single_tranche_pool(reserve: u64, max_reserve: u64) -> PoolState {
    PoolState::new(
        amt(reserve),
        amt(max_reserve),
        vec![TrancheState::junior(amt(100))],
    )
}

fn two_tranche_pool(reserve: u64, max_reserve: u64) -> PoolState {
    PoolState::new(
        amt(reserve),
        amt(max_reserve),
        vec![
            TrancheState::junior(amt(20)),
            TrancheState::senior(amt(80), amt(15)),
        ],
    )
}

#[rstest]
// fully satisfiable: plenty of room
#[case(1_000, 2_000, 500, 0, 500, 0)]
// reserve already at its maximum leaves no room for inflow
#[case(1_000, 1_000, 500, 0, 0, 0)]
// capped by maxReserve - reserve
#[case(0, 100, 500, 0, 100, 0)]
// redemption capped by the reserve floor
#[case(30, 1_000, 0, 50, 0, 30)]
// redemption frees room for investment
#[case(900, 1_000, 300, 200, 300, 200)]
fn single_tranche_execution(
    #[case] reserve: u64,
    #[case] max_reserve: u64,
    #[case] invest: u64,
    #[case] redeem: u64,
    #[case] expected_invest: u64,
    #[case] expected_redeem: u64,
) {
    let state = single_tranche_pool(reserve, max_reserve);
    let orders = [TrancheOrders::new(amt(invest), amt(redeem))];

    let result = solver()
        .solve(&state, &orders, &TrancheWeights::prioritized(1).unwrap())
        .unwrap();

    assert!(result.is_feasible);
    assert_eq!(
        result.tranches,
        vec![TrancheSolution::new(amt(expected_invest), amt(expected_redeem))]
    );
    assert!(check_solution(&state, &orders, &result).is_empty());
}

#[test]
fn junior_investment_takes_priority_over_senior() {
    let state = two_tranche_pool(0, 100);
    let orders = [
        TrancheOrders::new(amt(100), Amount::ZERO),
        TrancheOrders::new(amt(100), Amount::ZERO),
    ];
    let weights = [
        TrancheWeights::new(10_000.0, 1.0),
        TrancheWeights::new(10.0, 1.0),
    ];

    let result = solver().solve(&state, &orders, &weights).unwrap();

    assert!(result.is_feasible);
    assert_eq!(result.tranches[0], TrancheSolution::new(amt(100), Amount::ZERO));
    assert_eq!(result.tranches[1], TrancheSolution::new(Amount::ZERO, Amount::ZERO));
}

#[test]
fn senior_redemption_takes_priority_over_junior() {
    let state = two_tranche_pool(100, 1_000);
    let orders = [
        TrancheOrders::new(Amount::ZERO, amt(80)),
        TrancheOrders::new(Amount::ZERO, amt(80)),
    ];

    let result = solver()
        .solve(&state, &orders, &TrancheWeights::prioritized(2).unwrap())
        .unwrap();

    assert!(result.is_feasible);
    assert_eq!(result.tranches[1].redeem, amt(80));
    assert_eq!(result.tranches[0].redeem, amt(20));
}

#[test]
fn excess_reserve_that_redemptions_cannot_drain_is_infeasible() {
    // Reserve sits 400 above its maximum, but only 50 is up for redemption.
    let state = single_tranche_pool(500, 100);
    let orders = [TrancheOrders::new(Amount::ZERO, amt(50))];

    let result = solver()
        .solve(&state, &orders, &TrancheWeights::prioritized(1).unwrap())
        .unwrap();

    assert_eq!(result, SolverResult::infeasible(1));
}

#[test]
fn redemption_without_reserve_executes_nothing() {
    let state = single_tranche_pool(0, 1_000);
    let orders = [TrancheOrders::new(Amount::ZERO, amt(50))];

    let result = solver()
        .solve(&state, &orders, &TrancheWeights::prioritized(1).unwrap())
        .unwrap();

    assert!(result.is_feasible);
    assert_eq!(result.tranches, vec![TrancheSolution::default()]);
}

#[test]
fn eighteen_decimal_amounts_stay_exact() {
    // 100 tokens of headroom at 18 decimals, order five times larger
    let ceiling: Amount = "100000000000000000000".parse().unwrap();
    let order: Amount = "500000000000000000000".parse().unwrap();
    let state = PoolState::new(Amount::ZERO, ceiling, vec![TrancheState::junior(amt(1))]);
    let orders = [TrancheOrders::new(order, Amount::ZERO)];

    let result = solver()
        .solve(&state, &orders, &TrancheWeights::prioritized(1).unwrap())
        .unwrap();

    assert!(result.is_feasible);
    assert_eq!(result.tranches[0].invest, ceiling);
    assert!(check_solution(&state, &orders, &result).is_empty());
}

#[test]
fn ceiling_not_representable_as_f64_is_reached_exactly() {
    // 1e20 + 1 rounds to 1e20 on its way into the engine.
    let ceiling: Amount = "100000000000000000001".parse().unwrap();
    let order: Amount = "500000000000000000000".parse().unwrap();
    let state = PoolState::new(Amount::ZERO, ceiling, vec![TrancheState::junior(amt(1))]);
    let orders = [TrancheOrders::new(order, Amount::ZERO)];

    let result = solver()
        .solve(&state, &orders, &TrancheWeights::prioritized(1).unwrap())
        .unwrap();

    assert!(result.is_feasible);
    assert_eq!(result.tranches[0].invest, ceiling);
    assert_eq!(result.reserve_after(&state), Some(ceiling));
}

#[test]
fn junior_with_risk_buffer_fails_fast() {
    let mut state = two_tranche_pool(0, 100);
    state.tranches[0].min_risk_buffer = Some(amt(5));

    let err = solver()
        .solve(
            &state,
            &[TrancheOrders::default(); 2],
            &TrancheWeights::prioritized(2).unwrap(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        SolverError::Validation(ValidationError::MissingJuniorTranche)
    ));
}

#[test]
fn length_mismatch_fails_fast() {
    let err = solver()
        .solve(
            &two_tranche_pool(0, 100),
            &[TrancheOrders::default(); 2],
            &TrancheWeights::prioritized(1).unwrap(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        SolverError::Validation(ValidationError::MismatchedInputLength { .. })
    ));
    assert!(!err.is_engine_failure());
}

#[test]
fn integer_variables_give_the_same_answer() {
    let state = two_tranche_pool(250, 1_000);
    let orders = [
        TrancheOrders::new(amt(600), amt(120)),
        TrancheOrders::new(amt(400), amt(90)),
    ];
    let weights = TrancheWeights::prioritized(2).unwrap();

    let continuous = solver().solve(&state, &orders, &weights).unwrap();
    let integer = EpochSolver::with_engine(
        Arc::new(MicroLpSolver::new()),
        SolverConfig::default().with_integer_variables(true),
    )
    .solve(&state, &orders, &weights)
    .unwrap();

    assert_eq!(continuous, integer);
}

#[cfg(feature = "async")]
#[tokio::test]
async fn async_wrapper_matches_blocking_solve() {
    let state = two_tranche_pool(0, 100);
    let orders = vec![
        TrancheOrders::new(amt(70), Amount::ZERO),
        TrancheOrders::new(amt(70), Amount::ZERO),
    ];
    let weights = TrancheWeights::prioritized(2).unwrap();

    let solver = solver();
    let blocking = solver.solve(&state, &orders, &weights).unwrap();
    let awaited = solver.solve_async(state, orders, weights).await.unwrap();

    assert_eq!(blocking, awaited);
    assert_eq!(awaited.tranches[0].invest, amt(70));
    assert_eq!(awaited.tranches[1].invest, amt(30));
}
