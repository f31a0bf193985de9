//! Property tests for the personal income tax estimate.

use pit_core::calculations::allocate;
use pit_core::calculations::common::round_whole;
use pit_core::{RentReliefPolicy, TaxBand, TaxRuleSet, estimate};
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn rules_2025() -> TaxRuleSet {
    TaxRuleSet {
        version: "2025-07-01-v1".to_string(),
        effective_date: None,
        bands: vec![
            TaxBand::new(dec!(0), Some(dec!(800000)), dec!(0)),
            TaxBand::new(dec!(800000), Some(dec!(3000000)), dec!(0.15)),
            TaxBand::new(dec!(3000000), Some(dec!(12000000)), dec!(0.18)),
            TaxBand::new(dec!(12000000), Some(dec!(25000000)), dec!(0.21)),
            TaxBand::new(dec!(25000000), Some(dec!(50000000)), dec!(0.23)),
            TaxBand::new(dec!(50000000), None, dec!(0.25)),
        ],
        rent_relief: RentReliefPolicy {
            percent: dec!(0.20),
            cap: dec!(500000),
        },
    }
}

/// Whole currency units with two decimal places of minor units.
fn amount(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn prop_outputs_are_non_negative(
        income in -1_000_000_000i64..20_000_000_000,
        expenses in -1_000_000_000i64..5_000_000_000,
        rent in -1_000_000_000i64..5_000_000_000
    ) {
        let result = estimate(amount(income), amount(expenses), amount(rent), &rules_2025()).unwrap();

        prop_assert!(result.tax_due >= Decimal::ZERO);
        prop_assert!(result.taxable_income >= Decimal::ZERO);
        prop_assert!(result.rent_relief >= Decimal::ZERO);
        prop_assert!(result.monthly_tax >= Decimal::ZERO);
        prop_assert!(result.quarterly_tax >= Decimal::ZERO);
    }

    #[test]
    fn prop_rent_relief_never_exceeds_cap(rent in 0i64..i64::MAX) {
        let rules = rules_2025();

        let result = estimate(dec!(1000000), Decimal::ZERO, Decimal::from(rent), &rules).unwrap();

        prop_assert!(result.rent_relief <= rules.rent_relief.cap);
    }

    #[test]
    fn prop_tax_due_is_monotonic_in_income(
        income in 0i64..10_000_000_000,
        increase in 0i64..10_000_000_000,
        expenses in 0i64..1_000_000_000,
        rent in 0i64..1_000_000_000
    ) {
        let rules = rules_2025();

        let lower = estimate(amount(income), amount(expenses), amount(rent), &rules).unwrap();
        let higher = estimate(amount(income + increase), amount(expenses), amount(rent), &rules).unwrap();

        prop_assert!(higher.tax_due >= lower.tax_due);
    }

    #[test]
    fn prop_estimate_is_idempotent(
        income in 0i64..10_000_000_000,
        expenses in 0i64..1_000_000_000,
        rent in 0i64..1_000_000_000
    ) {
        let rules = rules_2025();

        let first = estimate(amount(income), amount(expenses), amount(rent), &rules).unwrap();
        let second = estimate(amount(income), amount(expenses), amount(rent), &rules).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_effective_rate_is_bounded_by_top_rate(income in 0i64..100_000_000_000) {
        let rules = rules_2025();

        let result = estimate(amount(income), Decimal::ZERO, Decimal::ZERO, &rules).unwrap();

        prop_assert!(result.effective_rate >= Decimal::ZERO);
        prop_assert!(result.effective_rate <= rules.max_rate());
    }

    #[test]
    fn prop_tax_due_is_rounded_unrounded_band_total(
        income in 0i64..20_000_000_000,
        expenses in 0i64..1_000_000_000
    ) {
        let rules = rules_2025();

        let result = estimate(amount(income), amount(expenses), Decimal::ZERO, &rules).unwrap();
        let raw: Decimal = allocate(result.taxable_income, &rules.bands)
            .iter()
            .map(|allocation| allocation.tax)
            .sum();

        prop_assert_eq!(round_whole(raw), result.tax_due);
    }

    #[test]
    fn prop_band_breakdown_is_ascending_and_positive(income in 0i64..20_000_000_000) {
        let result = estimate(amount(income), Decimal::ZERO, Decimal::ZERO, &rules_2025()).unwrap();

        for pair in result.band_breakdown.windows(2) {
            prop_assert!(pair[0].from < pair[1].from);
        }
        for entry in &result.band_breakdown {
            prop_assert!(entry.taxable_amount >= Decimal::ZERO);
        }
    }
}
