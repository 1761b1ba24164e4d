//! Per-metric comparison rows for the admin dashboard.

use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

use super::analysis::{compare_to_benchmark, display_name, parse_range};
use super::catalog::restaurant_profile;
use super::{BenchmarkComparison, ComparisonStatus, CoreBenchmarks, RestaurantType};

/// Actual operating metrics, as percentages unless the name says otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RestaurantMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_cost_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_cost_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_ratio_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinein_ratio_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_ticket_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_margin_percent: Option<f64>,
}

impl RestaurantMetrics {
    /// Present metrics as `(field name, value)` pairs in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [
            ("food_cost_percent", self.food_cost_percent),
            ("staff_cost_percent", self.staff_cost_percent),
            ("marketing_percent", self.marketing_percent),
            ("rent_percent", self.rent_percent),
            ("electricity_percent", self.electricity_percent),
            ("waste_percent", self.waste_percent),
            ("delivery_ratio_percent", self.delivery_ratio_percent),
            ("dinein_ratio_percent", self.dinein_ratio_percent),
            ("avg_ticket_size", self.avg_ticket_size),
            ("monthly_revenue", self.monthly_revenue),
            ("profit_margin_percent", self.profit_margin_percent),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

/// How a row should read to the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tone {
    OnTarget,
    Favorable,
    Unfavorable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScorecardRow {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub benchmark: String,
    pub comparison: BenchmarkComparison,
    /// Position within the benchmark range, 0 to 100.
    pub progress: f64,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Scorecard {
    pub restaurant_type: RestaurantType,
    pub display_name: String,
    pub rows: Vec<ScorecardRow>,
}

struct RowSpec {
    key: &'static str,
    label: &'static str,
    cost: bool,
    value: fn(&RestaurantMetrics) -> Option<f64>,
    benchmark: BenchmarkSource,
}

enum BenchmarkSource {
    Key(&'static str),
    ProfitMargin,
}

impl BenchmarkSource {
    fn lookup<'a>(&self, core: &'a CoreBenchmarks) -> Option<&'a str> {
        match self {
            BenchmarkSource::Key(key) => core.get(key),
            BenchmarkSource::ProfitMargin => core.profit_margin(),
        }
    }
}

const ROWS: [RowSpec; 6] = [
    RowSpec {
        key: "food_cost_percent",
        label: "Food Cost",
        cost: true,
        value: |m| m.food_cost_percent,
        benchmark: BenchmarkSource::Key("food_cost_percent_range"),
    },
    RowSpec {
        key: "staff_cost_percent",
        label: "Staff Cost",
        cost: true,
        value: |m| m.staff_cost_percent,
        benchmark: BenchmarkSource::Key("staff_cost_percent_range"),
    },
    RowSpec {
        key: "marketing_percent",
        label: "Marketing",
        cost: true,
        value: |m| m.marketing_percent,
        benchmark: BenchmarkSource::Key("marketing_percent_range"),
    },
    RowSpec {
        key: "rent_percent",
        label: "Rent",
        cost: true,
        value: |m| m.rent_percent,
        benchmark: BenchmarkSource::Key("rent_percent_of_revenue"),
    },
    RowSpec {
        key: "delivery_ratio_percent",
        label: "Delivery Ratio",
        cost: false,
        value: |m| m.delivery_ratio_percent,
        benchmark: BenchmarkSource::Key("delivery_ratio_percent"),
    },
    RowSpec {
        key: "profit_margin_percent",
        label: "Profit Margin",
        cost: false,
        value: |m| m.profit_margin_percent,
        benchmark: BenchmarkSource::ProfitMargin,
    },
];

/// 0 below the range, 100 above it, linear in between. Unparseable or
/// zero-width ranges sit at 50.
pub fn progress(comparison: &BenchmarkComparison) -> f64 {
    let Some(benchmark) = comparison.benchmark.as_deref() else {
        return 0.0;
    };
    let Some(range) = parse_range(benchmark) else {
        return 50.0;
    };
    let actual = comparison.actual;
    if actual < range.min {
        0.0
    } else if actual > range.max {
        100.0
    } else if range.max == range.min {
        50.0
    } else {
        (actual - range.min) / (range.max - range.min) * 100.0
    }
}

pub fn tone(status: ComparisonStatus, cost_metric: bool) -> Tone {
    match (status, cost_metric) {
        (ComparisonStatus::Within, _) => Tone::OnTarget,
        (ComparisonStatus::Above, true) | (ComparisonStatus::Below, false) => Tone::Unfavorable,
        (ComparisonStatus::Below, true) | (ComparisonStatus::Above, false) => Tone::Favorable,
    }
}

pub fn benchmark_scorecard(
    restaurant_type: RestaurantType,
    metrics: &RestaurantMetrics,
) -> Scorecard {
    let core = &restaurant_profile(restaurant_type).core_benchmarks;

    let rows = ROWS
        .iter()
        .filter_map(|spec| {
            let value = (spec.value)(metrics)?;
            let benchmark = spec.benchmark.lookup(core).filter(|b| !b.is_empty())?;
            let comparison = compare_to_benchmark(value, Some(benchmark), spec.label);
            Some(ScorecardRow {
                key: spec.key.to_string(),
                label: spec.label.to_string(),
                value,
                benchmark: benchmark.to_string(),
                progress: progress(&comparison),
                tone: tone(comparison.status, spec.cost),
                comparison,
            })
        })
        .collect();

    Scorecard {
        restaurant_type,
        display_name: display_name(restaurant_type).to_string(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row<'a>(card: &'a Scorecard, key: &str) -> Option<&'a ScorecardRow> {
        card.rows.iter().find(|r| r.key == key)
    }

    #[test]
    fn drops_rows_without_value_or_benchmark() {
        let metrics = RestaurantMetrics {
            food_cost_percent: Some(35.0),
            marketing_percent: Some(6.0),
            ..Default::default()
        };
        // Bakery has no marketing benchmark.
        let card = benchmark_scorecard(RestaurantType::Bakery, &metrics);
        assert_eq!(card.display_name, "Bakery");
        assert_eq!(card.rows.len(), 1);
        assert_eq!(card.rows[0].label, "Food Cost");
    }

    #[test]
    fn cost_rows_above_range_are_unfavorable() {
        let metrics = RestaurantMetrics {
            food_cost_percent: Some(45.0),
            staff_cost_percent: Some(10.0),
            delivery_ratio_percent: Some(50.0),
            ..Default::default()
        };
        let card = benchmark_scorecard(RestaurantType::Cafe, &metrics);

        let food = row(&card, "food_cost_percent").expect("food cost row");
        assert_eq!(food.tone, Tone::Unfavorable);
        assert_eq!(food.progress, 100.0);

        let staff = row(&card, "staff_cost_percent").expect("staff row");
        assert_eq!(staff.tone, Tone::Favorable);
        assert_eq!(staff.progress, 0.0);

        let delivery = row(&card, "delivery_ratio_percent").expect("delivery row");
        assert_eq!(delivery.comparison.status, ComparisonStatus::Above);
        assert_eq!(delivery.tone, Tone::Favorable);
    }

    #[test]
    fn profit_margin_uses_first_available_spelling() {
        let metrics = RestaurantMetrics {
            profit_margin_percent: Some(5.0),
            ..Default::default()
        };
        let truck = benchmark_scorecard(RestaurantType::FoodTruck, &metrics);
        let margin = row(&truck, "profit_margin_percent").expect("margin row");
        assert_eq!(margin.benchmark, "12-20");
        assert_eq!(margin.tone, Tone::Unfavorable);

        let pub_card = benchmark_scorecard(RestaurantType::PubRestobar, &metrics);
        assert!(pub_card.rows.is_empty());
    }

    #[test]
    fn progress_is_linear_inside_range() {
        let within = compare_to_benchmark(35.0, Some("30-40"), "Food Cost");
        assert_eq!(progress(&within), 50.0);
        let edge = compare_to_benchmark(30.0, Some("30-40"), "Food Cost");
        assert_eq!(progress(&edge), 0.0);
        let malformed = compare_to_benchmark(30.0, Some("thirty"), "Food Cost");
        assert_eq!(progress(&malformed), 50.0);
        let missing = compare_to_benchmark(30.0, None, "Food Cost");
        assert_eq!(progress(&missing), 0.0);
    }

    #[test]
    fn entries_skip_missing_metrics() {
        let metrics = RestaurantMetrics {
            rent_percent: Some(14.0),
            monthly_revenue: Some(450_000.0),
            ..Default::default()
        };
        assert_eq!(
            metrics.entries(),
            vec![("rent_percent", 14.0), ("monthly_revenue", 450_000.0)]
        );
    }
}
