use proptest::prelude::*;
use rust_decimal::Decimal;

use restaurant_pos_api::{
    benchmarks::{
        compare_to_benchmark, is_within_benchmark, parse_inr_range, parse_range,
        ComparisonStatus,
    },
    services::orders::compute_totals,
};

proptest! {
    #[test]
    fn parse_range_never_panics(input in ".{0,24}") {
        let _ = parse_range(&input);
        let _ = parse_inr_range(&input);
    }

    #[test]
    fn integer_ranges_round_trip(low in 0u32..500, width in 0u32..500) {
        let high = low + width;
        let parsed = parse_range(&format!("{low}-{high}")).unwrap();
        prop_assert_eq!(parsed.min, f64::from(low));
        prop_assert_eq!(parsed.max, f64::from(high));
    }

    #[test]
    fn deviation_is_zero_exactly_when_within(
        low in 1.0f64..100.0,
        width in 0.0f64..50.0,
        actual in 0.0f64..200.0,
    ) {
        let range = format!("{}-{}", low, low + width);
        let comparison = compare_to_benchmark(actual, Some(&range), "Metric");

        prop_assert!(comparison.deviation >= 0.0);
        let within = is_within_benchmark(actual, Some(&range)).within;
        prop_assert_eq!(comparison.status == ComparisonStatus::Within, within);
        prop_assert_eq!(comparison.deviation == 0.0, within);
    }

    #[test]
    fn values_below_the_minimum_are_below(
        low in 10.0f64..100.0,
        width in 0.0f64..50.0,
        gap in 0.5f64..10.0,
    ) {
        let range = format!("{}-{}", low, low + width);
        let comparison = compare_to_benchmark(low - gap, Some(&range), "Metric");
        prop_assert_eq!(comparison.status, ComparisonStatus::Below);
    }

    #[test]
    fn missing_benchmark_is_neutral(actual in -1000.0f64..1000.0) {
        let comparison = compare_to_benchmark(actual, None, "Metric");
        prop_assert_eq!(comparison.status, ComparisonStatus::Within);
        prop_assert_eq!(comparison.deviation, 0.0);
        prop_assert!(comparison.benchmark.is_none());
    }

    #[test]
    fn order_total_is_subtotal_plus_tax(
        lines in prop::collection::vec((1i64..100_000, 1i32..20), 1..12),
        rate_bp in 0i64..3000,
    ) {
        let tax_rate = Decimal::new(rate_bp, 4);
        let priced: Vec<(Decimal, i32)> = lines
            .iter()
            .map(|(paise, qty)| (Decimal::new(*paise, 2), *qty))
            .collect();

        let totals = compute_totals(priced.iter().copied(), tax_rate);

        let expected_subtotal: Decimal = priced
            .iter()
            .map(|(price, qty)| *price * Decimal::from(*qty))
            .sum();
        prop_assert_eq!(totals.subtotal, expected_subtotal);
        prop_assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
        prop_assert!(totals.tax_amount.scale() <= 2);
        prop_assert!(totals.tax_amount >= Decimal::ZERO);
    }
}
