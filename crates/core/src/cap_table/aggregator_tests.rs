#[cfg(test)]
mod tests {
    use crate::cap_table::{collect_raw_weights, recompute, CapTable, RawWeights};
    use crate::constants::PERCENTAGE_TOLERANCE;
    use crate::errors::{CapTableError, Error};
    use crate::holders::{HolderKind, HolderLedger};
    use crate::rounds::{Round, RoundTerms};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal) {
        assert!(
            (actual - expected).abs() <= PERCENTAGE_TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    fn seeded_ledger() -> HolderLedger {
        let mut ledger = HolderLedger::new();
        ledger.set_weight("A", HolderKind::Founder, dec!(60)).unwrap();
        ledger.set_weight("B", HolderKind::Founder, dec!(40)).unwrap();
        ledger
            .set_weight("Pool", HolderKind::OptionPool, dec!(10))
            .unwrap();
        ledger
    }

    fn safe_round(name: &str, resolved_percentage: Decimal) -> Round {
        Round {
            name: name.to_string(),
            invested: dec!(100000),
            terms: RoundTerms::Safe {
                discount_rate: None,
                post_money_cap: Some(dec!(1000000)),
            },
            resolved_percentage,
        }
    }

    #[test]
    fn test_recompute_normalizes_founders_and_pool() {
        let table = recompute(&seeded_ledger(), &[]).unwrap();

        assert_close(table.percentage_of("A").unwrap(), dec!(54.5454545454545));
        assert_close(table.percentage_of("B").unwrap(), dec!(36.3636363636364));
        assert_close(table.percentage_of("Pool").unwrap(), dec!(9.09090909090909));
        assert_close(table.total(), dec!(100));
        assert!(table.is_balanced());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let ledger = seeded_ledger();
        let rounds = vec![safe_round("Seed", dec!(10))];

        let first = recompute(&ledger, &rounds).unwrap();
        let second = recompute(&ledger, &rounds).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_rounds_follow_ledger_entries() {
        let table = recompute(&seeded_ledger(), &[safe_round("Seed", dec!(10))]).unwrap();
        let holders: Vec<&str> = table.iter().map(|e| e.holder.as_str()).collect();
        assert_eq!(holders, vec!["A", "B", "Pool", "Seed"]);
        assert_close(table.percentage_of("Seed").unwrap(), dec!(8.3333333333333));
    }

    #[test]
    fn test_round_named_like_holder_overwrites_instead_of_duplicating() {
        let rounds = vec![safe_round("B", dec!(20))];
        let raw = collect_raw_weights(&seeded_ledger(), &rounds);

        assert_eq!(raw.len(), 3);
        assert_eq!(raw.get("B"), Some(dec!(20)));
    }

    #[test]
    fn test_pending_mfn_contributes_zero() {
        let rounds = vec![Round {
            name: "MFN".to_string(),
            invested: dec!(50000),
            terms: RoundTerms::MfnSafe {
                resolved_post_money: None,
            },
            resolved_percentage: Decimal::ZERO,
        }];
        let table = recompute(&seeded_ledger(), &rounds).unwrap();
        assert_eq!(table.percentage_of("MFN"), Some(Decimal::ZERO));
        assert_close(table.total(), dec!(100));
    }

    #[test]
    fn test_empty_inputs_give_empty_table() {
        let table = recompute(&HolderLedger::new(), &[]).unwrap();
        assert!(table.is_empty());
        assert!(table.is_balanced());
    }

    #[test]
    fn test_all_zero_weights_is_division_by_zero() {
        let mut raw = RawWeights::new();
        raw.upsert("A", Decimal::ZERO);
        let err = CapTable::normalize(&raw).unwrap_err();
        assert!(matches!(
            err,
            Error::CapTable(CapTableError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_weights_beyond_decimal_range_are_invalid_input() {
        let mut raw = RawWeights::new();
        raw.upsert("A", Decimal::MAX);
        raw.upsert("B", dec!(1));
        let err = raw.total().unwrap_err();
        assert!(matches!(err, Error::CapTable(CapTableError::InvalidInput(_))));

        let mut raw = RawWeights::new();
        raw.upsert("A", Decimal::from_scientific("1e27").unwrap());
        let err = CapTable::normalize(&raw).unwrap_err();
        assert!(matches!(err, Error::CapTable(CapTableError::InvalidInput(_))));
    }

    #[test]
    fn test_display_rows_round_to_precision() {
        let table = recompute(&seeded_ledger(), &[]).unwrap();
        assert_eq!(
            table.display_rows(2),
            vec![
                ("A".to_string(), dec!(54.55)),
                ("B".to_string(), dec!(36.36)),
                ("Pool".to_string(), dec!(9.09)),
            ]
        );
        assert_eq!(table.to_string(), "A: 54.55%\nB: 36.36%\nPool: 9.09%\n");
    }
}
