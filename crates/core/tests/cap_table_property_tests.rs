//! Property-based integration tests for the cap table simulator.
//!
//! Random sequences of financing operations are replayed against a fresh
//! simulator, using the `proptest` crate for random test case generation.

use captable_core::cap_table::recompute;
use captable_core::constants::PERCENTAGE_TOLERANCE;
use captable_core::{CapTableServiceTrait, CapTableSimulator, SimulatorState};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Generators
// =============================================================================

#[derive(Debug, Clone)]
enum Operation {
    Safe {
        invested: Decimal,
        discount_rate: Option<i64>,
        post_money_cap: Option<u64>,
    },
    ConvertibleNote {
        invested: Decimal,
        conversion_price: u32,
    },
    PricedEquity {
        pre_money: u64,
        invested: u64,
        pool: u32,
    },
    OptionPool(u32),
    Allocate(u8, u32),
    Undo,
}

/// Amounts near the top of the decimal range, where products can overflow.
fn arb_extreme_amount() -> impl Strategy<Value = Decimal> {
    (1u32..1000, 20u32..=25).prop_map(|(mantissa, exponent)| {
        Decimal::from_scientific(&format!("{}e{}", mantissa, exponent)).unwrap()
    })
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (
            prop_oneof![
                4 => (1_000u64..1_000_000).prop_map(Decimal::from),
                1 => arb_extreme_amount(),
            ],
            // Includes negative and >= 100 discounts, which must be rejected.
            proptest::option::of(-10i64..=150),
            proptest::option::of(100_000u64..10_000_000),
        )
            .prop_map(|(invested, discount_rate, post_money_cap)| Operation::Safe {
                invested,
                discount_rate,
                post_money_cap,
            }),
        (
            prop_oneof![
                4 => (1u64..500).prop_map(Decimal::from),
                1 => arb_extreme_amount(),
            ],
            1u32..10,
        )
            .prop_map(|(invested, conversion_price)| Operation::ConvertibleNote {
                invested,
                conversion_price,
            }),
        (100_000u64..50_000_000, 10_000u64..10_000_000, 0u32..30).prop_map(
            |(pre_money, invested, pool)| Operation::PricedEquity {
                pre_money,
                invested,
                pool,
            }
        ),
        (1u32..50).prop_map(Operation::OptionPool),
        (0u8..4, 1u32..20).prop_map(|(who, pct)| Operation::Allocate(who, pct)),
        Just(Operation::Undo),
    ]
}

fn arb_founders() -> impl Strategy<Value = Vec<(String, Decimal)>> {
    proptest::collection::vec(1u32..100, 1..4).prop_map(|weights| {
        weights
            .into_iter()
            .enumerate()
            .map(|(i, w)| (format!("Founder {}", i + 1), Decimal::from(w)))
            .collect()
    })
}

/// Applies one operation; the round name is derived from its position.
fn apply(simulator: &mut CapTableSimulator, step: usize, operation: &Operation) -> bool {
    let name = format!("Round {}", step + 1);
    let result = match operation {
        Operation::Safe {
            invested,
            discount_rate,
            post_money_cap,
        } => simulator
            .add_safe_round(
                &name,
                *invested,
                discount_rate.map(Decimal::from),
                post_money_cap.map(Decimal::from),
            )
            .map(|_| ()),
        Operation::ConvertibleNote {
            invested,
            conversion_price,
        } => simulator
            .add_convertible_note_round(
                &name,
                *invested,
                Decimal::from(*conversion_price),
            )
            .map(|_| ()),
        Operation::PricedEquity {
            pre_money,
            invested,
            pool,
        } => simulator
            .add_priced_equity_round(
                &name,
                Decimal::from(*pre_money),
                Decimal::from(*invested),
                Decimal::from(*pool),
            )
            .map(|_| ()),
        Operation::OptionPool(pool) => simulator
            .create_option_pool(Decimal::from(*pool))
            .map(|_| ()),
        Operation::Allocate(who, pct) => simulator
            .allocate(&format!("Employee {}", who), Decimal::from(*pct))
            .map(|_| ()),
        Operation::Undo => simulator.undo().map(|_| ()),
    };
    result.is_ok()
}

fn is_balanced(simulator: &CapTableSimulator) -> bool {
    let table = simulator.current_cap_table();
    table.is_empty() || (table.total() - dec!(100)).abs() <= PERCENTAGE_TOLERANCE
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The cap table sums to 100 after every operation, successful or not.
    #[test]
    fn prop_cap_table_always_sums_to_hundred(
        founders in arb_founders(),
        pool in 0u32..30,
        operations in proptest::collection::vec(arb_operation(), 0..25),
    ) {
        let mut simulator = CapTableSimulator::new();
        simulator
            .initialize_founders(&founders, Decimal::from(pool))
            .unwrap();
        prop_assert!(is_balanced(&simulator));

        for (step, operation) in operations.iter().enumerate() {
            apply(&mut simulator, step, operation);
            prop_assert!(
                is_balanced(&simulator),
                "unbalanced after {:?}: total {}",
                operation,
                simulator.current_cap_table().total()
            );
        }
    }

    /// Recomputing without an intervening mutation changes nothing.
    #[test]
    fn prop_recompute_is_idempotent(
        founders in arb_founders(),
        operations in proptest::collection::vec(arb_operation(), 0..15),
    ) {
        let mut simulator = CapTableSimulator::new();
        simulator.initialize_founders(&founders, dec!(10)).unwrap();
        for (step, operation) in operations.iter().enumerate() {
            apply(&mut simulator, step, operation);
        }

        let current = simulator.current_cap_table().clone();
        let first = simulator.recompute().unwrap().clone();
        let second = simulator.recompute().unwrap().clone();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &current);
    }

    /// Undo restores the exact pre-operation rounds, ledger and table.
    #[test]
    fn prop_undo_inverts_the_last_mutation(
        founders in arb_founders(),
        setup in proptest::collection::vec(arb_operation(), 0..10),
        operation in arb_operation(),
    ) {
        let mut simulator = CapTableSimulator::new();
        simulator.initialize_founders(&founders, dec!(10)).unwrap();
        for (step, op) in setup.iter().enumerate() {
            apply(&mut simulator, step, op);
        }
        prop_assume!(!matches!(operation, Operation::Undo));

        let before = simulator.clone();
        if apply(&mut simulator, setup.len(), &operation) {
            simulator.undo().unwrap();
            prop_assert_eq!(simulator.rounds(), before.rounds());
            prop_assert_eq!(simulator.holders(), before.holders());
            prop_assert_eq!(simulator.current_cap_table(), before.current_cap_table());
        } else {
            // A failed operation writes nothing, not even a snapshot.
            prop_assert_eq!(simulator.history_depth(), before.history_depth());
            prop_assert_eq!(simulator.current_cap_table(), before.current_cap_table());
        }
    }

    /// Every round's synthetic holder weight equals its resolved percentage.
    #[test]
    fn prop_round_weights_track_resolved_percentage(
        founders in arb_founders(),
        operations in proptest::collection::vec(arb_operation(), 1..20),
    ) {
        let mut simulator = CapTableSimulator::new();
        simulator.initialize_founders(&founders, dec!(0)).unwrap();
        for (step, operation) in operations.iter().enumerate() {
            apply(&mut simulator, step, operation);
        }

        let state = simulator.serialize_state();
        let table = recompute(&state.holders, &state.rounds).unwrap();
        let raw_total: Decimal = captable_core::cap_table::collect_raw_weights(
            &state.holders,
            &state.rounds,
        )
        .total()
        .unwrap();
        for round in simulator.rounds() {
            let expected = round.resolved_percentage * dec!(100) / raw_total;
            let actual = table.percentage_of(&round.name).unwrap();
            prop_assert!((actual - expected).abs() <= PERCENTAGE_TOLERANCE);
        }
    }

    /// Serializing and restoring keeps the table and the undo history.
    #[test]
    fn prop_state_round_trips_through_json(
        founders in arb_founders(),
        operations in proptest::collection::vec(arb_operation(), 0..15),
    ) {
        let mut simulator = CapTableSimulator::new();
        simulator.initialize_founders(&founders, dec!(10)).unwrap();
        for (step, operation) in operations.iter().enumerate() {
            apply(&mut simulator, step, operation);
        }

        let json = serde_json::to_string(&simulator.serialize_state()).unwrap();
        let state: SimulatorState = serde_json::from_str(&json).unwrap();
        let restored = CapTableSimulator::from_state(state).unwrap();

        prop_assert_eq!(restored.history_depth(), simulator.history_depth());
        for entry in simulator.current_cap_table().iter() {
            let restored_pct = restored
                .current_cap_table()
                .percentage_of(&entry.holder)
                .unwrap();
            prop_assert!((restored_pct - entry.percentage).abs() <= PERCENTAGE_TOLERANCE);
        }
    }
}
