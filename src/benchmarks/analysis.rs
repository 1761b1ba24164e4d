use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use super::catalog::restaurant_profile;
use super::{
    BenchmarkComparison, BenchmarkInsight, BenchmarkRange, CityTier, ComparisonStatus, Region,
    RestaurantType, Season,
};

static SIGNED_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?)(\d+)$").expect("signed percent pattern is valid"));

const LAKH: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WithinResult {
    pub within: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Optional context applied on top of a core benchmark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Adjustments {
    pub city_tier: Option<CityTier>,
    pub season: Option<Season>,
    /// Accepted for completeness; regional data is qualitative.
    pub region: Option<Region>,
}

fn split_range(range: &str) -> Option<(&str, &str)> {
    let mut parts = range.split('-');
    let low = parts.next()?;
    let high = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((low, high))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses `"32-38"` into `{min: 32, max: 38}`.
pub fn parse_range(range: &str) -> Option<BenchmarkRange> {
    let (low, high) = split_range(range)?;
    Some(BenchmarkRange {
        min: parse_number(low)?,
        max: parse_number(high)?,
    })
}

/// Like [`parse_range`], but each side may carry an `L` (lakh) suffix.
pub fn parse_inr_range(range: &str) -> Option<BenchmarkRange> {
    fn parse_inr(raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        match trimmed.strip_suffix(['L', 'l']) {
            Some(lakhs) => parse_number(lakhs).map(|v| v * LAKH),
            None => parse_number(trimmed),
        }
    }

    let (low, high) = split_range(range)?;
    Some(BenchmarkRange {
        min: parse_inr(low)?,
        max: parse_inr(high)?,
    })
}

pub fn is_within_benchmark(value: f64, range: Option<&str>) -> WithinResult {
    match range.and_then(parse_range) {
        Some(parsed) => WithinResult {
            within: parsed.contains(value),
            min: Some(parsed.min),
            max: Some(parsed.max),
        },
        None => WithinResult {
            within: false,
            min: None,
            max: None,
        },
    }
}

/// Percent distance of `gap` relative to `bound`. A zero bound has no
/// meaningful ratio, so the raw gap in percentage points is used instead.
fn relative_deviation(gap: f64, bound: f64) -> f64 {
    if bound == 0.0 {
        gap.abs()
    } else {
        (gap / bound.abs() * 100.0).abs()
    }
}

pub fn compare_to_benchmark(actual: f64, range: Option<&str>, metric: &str) -> BenchmarkComparison {
    let neutral = |benchmark: Option<&str>, message: String| BenchmarkComparison {
        metric: metric.to_string(),
        actual,
        benchmark: benchmark.map(str::to_string),
        status: ComparisonStatus::Within,
        deviation: 0.0,
        message,
    };

    let Some(range) = range.filter(|r| !r.is_empty()) else {
        return neutral(None, format!("No benchmark available for {metric}"));
    };
    let Some(parsed) = parse_range(range) else {
        return neutral(Some(range), format!("Invalid benchmark format for {metric}"));
    };

    let (status, deviation, message) = if actual < parsed.min {
        let deviation = relative_deviation(parsed.min - actual, parsed.min);
        (
            ComparisonStatus::Below,
            deviation,
            format!(
                "{metric} is {deviation:.1}% below expected minimum ({}%)",
                parsed.min
            ),
        )
    } else if actual > parsed.max {
        let deviation = relative_deviation(actual - parsed.max, parsed.max);
        (
            ComparisonStatus::Above,
            deviation,
            format!(
                "{metric} is {deviation:.1}% above expected maximum ({}%)",
                parsed.max
            ),
        )
    } else {
        (
            ComparisonStatus::Within,
            0.0,
            format!(
                "{metric} is within expected range ({}-{}%)",
                parsed.min, parsed.max
            ),
        )
    };

    BenchmarkComparison {
        metric: metric.to_string(),
        actual,
        benchmark: Some(range.to_string()),
        status,
        deviation,
        message,
    }
}

fn parse_signed_percent(raw: &str) -> Option<f64> {
    let captures = SIGNED_PERCENT.captures(raw)?;
    let magnitude: f64 = captures.get(2)?.as_str().parse().ok()?;
    let sign = if captures.get(1).map(|m| m.as_str()) == Some("-") {
        -1.0
    } else {
        1.0
    };
    Some(sign * magnitude)
}

pub fn seasonal_adjustment(
    restaurant_type: RestaurantType,
    season: Season,
    metric: &str,
) -> Option<f64> {
    restaurant_profile(restaurant_type)
        .seasonal_effects
        .get(&season)?
        .get(metric)
        .and_then(|raw| parse_signed_percent(raw))
}

pub fn city_tier_adjustment(
    restaurant_type: RestaurantType,
    city_tier: CityTier,
    metric: &str,
) -> Option<f64> {
    restaurant_profile(restaurant_type)
        .city_tier_adjustments
        .get(&city_tier)?
        .get(metric)
        .and_then(|raw| parse_signed_percent(raw))
}

pub fn regional_notes(restaurant_type: RestaurantType, region: Region) -> Vec<(String, String)> {
    restaurant_profile(restaurant_type)
        .regional_adjustments
        .get(&region)
        .map(|notes| {
            notes
                .iter()
                .map(|(key, note)| (key.clone(), note.clone()))
                .collect()
        })
        .unwrap_or_default()
}

pub fn common_problems(restaurant_type: RestaurantType) -> &'static [String] {
    &restaurant_profile(restaurant_type).common_problems
}

pub fn staff_structure(restaurant_type: RestaurantType) -> &'static [String] {
    &restaurant_profile(restaurant_type).staff_structure
}

/// Midpoint of the named core benchmark, scaled by the city tier and then
/// the seasonal adjustment when either applies to `base_metric`.
pub fn calculate_adjusted_benchmark(
    restaurant_type: RestaurantType,
    base_metric: &str,
    adjustments: &Adjustments,
) -> Option<f64> {
    let profile = restaurant_profile(restaurant_type);
    let parsed = parse_range(profile.core_benchmarks.get(base_metric)?)?;
    let mut adjusted = parsed.midpoint();

    if let Some(tier) = adjustments.city_tier {
        if let Some(pct) = city_tier_adjustment(restaurant_type, tier, base_metric) {
            adjusted *= 1.0 + pct / 100.0;
        }
    }
    if let Some(season) = adjustments.season {
        if let Some(pct) = seasonal_adjustment(restaurant_type, season, base_metric) {
            adjusted *= 1.0 + pct / 100.0;
        }
    }

    Some(adjusted)
}

/// Compares each metric against its `{metric}_percent_range` benchmark.
/// Metrics without one are skipped. Output follows metric name order.
pub fn generate_benchmark_insights(
    restaurant_type: RestaurantType,
    actual: &BTreeMap<String, f64>,
) -> Vec<BenchmarkInsight> {
    let core = &restaurant_profile(restaurant_type).core_benchmarks;

    actual
        .iter()
        .filter_map(|(metric, value)| {
            let benchmark = core.get(&format!("{metric}_percent_range"))?;
            let comparison = compare_to_benchmark(*value, Some(benchmark), metric);
            let recommendation = match comparison.status {
                ComparisonStatus::Above => {
                    Some(format!("Consider optimizing {metric} to reduce costs"))
                }
                ComparisonStatus::Below => Some(format!(
                    "Your {metric} is lower than expected - this could indicate underinvestment"
                )),
                ComparisonStatus::Within => None,
            };
            Some(BenchmarkInsight {
                metric: metric.clone(),
                comparison,
                recommendation,
            })
        })
        .collect()
}

pub fn display_name(restaurant_type: RestaurantType) -> &'static str {
    match restaurant_type {
        RestaurantType::Cafe => "Café",
        RestaurantType::Qsr => "Quick Service Restaurant (QSR)",
        RestaurantType::FineDine => "Fine Dining",
        RestaurantType::PubRestobar => "Pub/Restobar",
        RestaurantType::CloudKitchen => "Cloud Kitchen",
        RestaurantType::Bakery => "Bakery",
        RestaurantType::FoodTruck => "Food Truck",
    }
}

pub fn available_types() -> Vec<RestaurantType> {
    RestaurantType::iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("32-38", Some((32.0, 38.0)))]
    #[case(" 4 - 7 ", Some((4.0, 7.0)))]
    #[case("1.5-6", Some((1.5, 6.0)))]
    #[case("32", None)]
    #[case("1-2-3", None)]
    #[case("abc-10", None)]
    #[case("", None)]
    #[case("NaN-5", None)]
    fn parses_plain_ranges(#[case] input: &str, #[case] expected: Option<(f64, f64)>) {
        let parsed = parse_range(input).map(|r| (r.min, r.max));
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("3L-12L", Some((300_000.0, 1_200_000.0)))]
    #[case("1.5L-6L", Some((150_000.0, 600_000.0)))]
    #[case("4l-10l", Some((400_000.0, 1_000_000.0)))]
    #[case("250-450", Some((250.0, 450.0)))]
    #[case("3L", None)]
    #[case("L-5L", None)]
    fn parses_inr_ranges(#[case] input: &str, #[case] expected: Option<(f64, f64)>) {
        let parsed = parse_inr_range(input).map(|r| (r.min, r.max));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn within_benchmark_is_inclusive() {
        assert!(is_within_benchmark(30.0, Some("30-40")).within);
        assert!(is_within_benchmark(40.0, Some("30-40")).within);
        let outside = is_within_benchmark(41.0, Some("30-40"));
        assert!(!outside.within);
        assert_eq!(outside.max, Some(40.0));
        assert_eq!(
            is_within_benchmark(35.0, None),
            WithinResult {
                within: false,
                min: None,
                max: None
            }
        );
        assert_eq!(is_within_benchmark(35.0, Some("oops")).min, None);
    }

    #[test]
    fn compares_within_range() {
        let result = compare_to_benchmark(35.0, Some("30-40"), "Food Cost");
        assert_eq!(result.status, ComparisonStatus::Within);
        assert_eq!(result.deviation, 0.0);
        assert_eq!(result.message, "Food Cost is within expected range (30-40%)");
    }

    #[test]
    fn compares_below_range() {
        let result = compare_to_benchmark(24.0, Some("30-40"), "Food Cost");
        assert_eq!(result.status, ComparisonStatus::Below);
        assert!((result.deviation - 20.0).abs() < 1e-9);
        assert_eq!(
            result.message,
            "Food Cost is 20.0% below expected minimum (30%)"
        );
    }

    #[test]
    fn compares_above_range() {
        let result = compare_to_benchmark(44.0, Some("30-40"), "Food Cost");
        assert_eq!(result.status, ComparisonStatus::Above);
        assert!((result.deviation - 10.0).abs() < 1e-9);
        assert_eq!(
            result.message,
            "Food Cost is 10.0% above expected maximum (40%)"
        );
    }

    #[test]
    fn missing_and_malformed_benchmarks_are_neutral() {
        let missing = compare_to_benchmark(12.0, None, "Rent");
        assert_eq!(missing.status, ComparisonStatus::Within);
        assert_eq!(missing.benchmark, None);
        assert_eq!(missing.message, "No benchmark available for Rent");

        let malformed = compare_to_benchmark(12.0, Some("ten to twenty"), "Rent");
        assert_eq!(malformed.status, ComparisonStatus::Within);
        assert_eq!(malformed.benchmark.as_deref(), Some("ten to twenty"));
        assert_eq!(malformed.message, "Invalid benchmark format for Rent");
    }

    #[test]
    fn zero_lower_bound_uses_absolute_gap() {
        let result = compare_to_benchmark(-3.0, Some("0-10"), "Waste");
        assert_eq!(result.status, ComparisonStatus::Below);
        assert_eq!(result.deviation, 3.0);
        assert!(result.deviation.is_finite());
    }

    #[rstest]
    #[case(RestaurantType::Cafe, Season::Summer, "cold_beverages_sales_boost", Some(35.0))]
    #[case(RestaurantType::Cafe, Season::Summer, "hot_sales_drop", Some(-12.0))]
    #[case(RestaurantType::Qsr, Season::Monsoon, "fried_sales_boost", Some(30.0))]
    #[case(RestaurantType::Cafe, Season::Winter, "unknown_metric", None)]
    #[case(RestaurantType::Bakery, Season::Winter, "desserts_boost", None)]
    fn reads_seasonal_adjustments(
        #[case] restaurant_type: RestaurantType,
        #[case] season: Season,
        #[case] metric: &str,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(seasonal_adjustment(restaurant_type, season, metric), expected);
    }

    #[test]
    fn reads_city_tier_adjustments() {
        assert_eq!(
            city_tier_adjustment(RestaurantType::Cafe, CityTier::Metro, "rent_increase_percent"),
            Some(30.0)
        );
        assert_eq!(
            city_tier_adjustment(RestaurantType::Cafe, CityTier::Tier3, "rent_variation"),
            Some(-10.0)
        );
        assert_eq!(
            city_tier_adjustment(RestaurantType::Qsr, CityTier::Tier1, "rent"),
            None
        );
    }

    #[test]
    fn signed_percent_rejects_fractions_and_words() {
        assert_eq!(parse_signed_percent("+35"), Some(35.0));
        assert_eq!(parse_signed_percent("7"), Some(7.0));
        assert_eq!(parse_signed_percent("+3.5"), None);
        assert_eq!(parse_signed_percent("High"), None);
    }

    #[test]
    fn adjusted_benchmark_starts_from_midpoint() {
        let none = Adjustments::default();
        assert_eq!(
            calculate_adjusted_benchmark(RestaurantType::Cafe, "food_cost_percent_range", &none),
            Some(35.0)
        );
        assert_eq!(
            calculate_adjusted_benchmark(RestaurantType::Bakery, "marketing_percent_range", &none),
            None
        );
        assert_eq!(
            calculate_adjusted_benchmark(RestaurantType::Cafe, "monthly_revenue_range_inr", &none),
            None
        );
    }

    #[test]
    fn regional_notes_are_qualitative() {
        let notes = regional_notes(RestaurantType::Cafe, Region::South);
        assert_eq!(
            notes,
            vec![
                ("coffee_preference".to_string(), "High".to_string()),
                ("milk_usage".to_string(), "High".to_string()),
            ]
        );
        assert!(regional_notes(RestaurantType::Bakery, Region::North).is_empty());

        let with_region = Adjustments {
            region: Some(Region::South),
            ..Default::default()
        };
        assert_eq!(
            calculate_adjusted_benchmark(
                RestaurantType::Cafe,
                "food_cost_percent_range",
                &with_region
            ),
            Some(35.0)
        );
    }

    #[test]
    fn insights_follow_metric_order_and_skip_unknown_metrics() {
        let actual = BTreeMap::from([
            ("staff_cost".to_string(), 30.0),
            ("food_cost".to_string(), 35.0),
            ("marketing".to_string(), 2.0),
            ("mystery".to_string(), 99.0),
        ]);
        let insights = generate_benchmark_insights(RestaurantType::Cafe, &actual);
        let metrics: Vec<_> = insights.iter().map(|i| i.metric.as_str()).collect();
        assert_eq!(metrics, vec!["food_cost", "marketing", "staff_cost"]);

        assert_eq!(insights[0].recommendation, None);
        assert_eq!(
            insights[1].recommendation.as_deref(),
            Some("Your marketing is lower than expected - this could indicate underinvestment")
        );
        assert_eq!(
            insights[2].recommendation.as_deref(),
            Some("Consider optimizing staff_cost to reduce costs")
        );
    }

    #[test]
    fn lists_types_in_declaration_order() {
        let types = available_types();
        assert_eq!(types.len(), 7);
        assert_eq!(types[0], RestaurantType::Cafe);
        assert_eq!(types[6], RestaurantType::FoodTruck);
        assert_eq!(display_name(RestaurantType::Qsr), "Quick Service Restaurant (QSR)");
        assert_eq!(common_problems(RestaurantType::Bakery).len(), 3);
        assert!(staff_structure(RestaurantType::Bakery).is_empty());
    }
}
