//! Industry benchmark engine for Indian restaurant formats.
//!
//! A static table of cost and revenue ratios per restaurant type, plus small
//! pure functions that parse the range strings, compare actual metrics against
//! them and apply seasonal or city-tier adjustments. Nothing in here touches
//! the database and nothing returns an error: malformed input degrades to a
//! neutral result.

mod analysis;
mod catalog;
pub mod scorecard;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

pub use analysis::{
    available_types, calculate_adjusted_benchmark, city_tier_adjustment, common_problems,
    compare_to_benchmark, display_name, generate_benchmark_insights, is_within_benchmark,
    parse_inr_range, parse_range, regional_notes, seasonal_adjustment, staff_structure,
    Adjustments, WithinResult,
};
pub use catalog::restaurant_profile;
pub use scorecard::{benchmark_scorecard, RestaurantMetrics, Scorecard, ScorecardRow, Tone};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RestaurantType {
    Cafe,
    Qsr,
    FineDine,
    PubRestobar,
    CloudKitchen,
    Bakery,
    FoodTruck,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
pub enum CityTier {
    #[serde(rename = "metro")]
    #[strum(serialize = "metro")]
    Metro,
    #[serde(rename = "tier_1")]
    #[strum(serialize = "tier_1")]
    Tier1,
    #[serde(rename = "tier_2")]
    #[strum(serialize = "tier_2")]
    Tier2,
    #[serde(rename = "tier_3")]
    #[strum(serialize = "tier_3")]
    Tier3,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Season {
    Summer,
    Monsoon,
    Winter,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Region {
    South,
    North,
    West,
    East,
}

/// Range strings such as `"32-38"` or `"3L-12L"`, keyed by metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoreBenchmarks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_cost_percent_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_cost_percent_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_percent_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_percent_of_revenue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electricity_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_percent_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_ratio_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dinein_ratio_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_ticket_size_range_inr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_revenue_range_inr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_profit_margin_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin_range_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin_percent_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seating_capacity_norm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_investment_range_inr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitchen_size_sqft_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideal_staff_count_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquor_cost_percent_range: Option<String>,
}

impl CoreBenchmarks {
    pub const KEYS: [&'static str; 19] = [
        "food_cost_percent_range",
        "staff_cost_percent_range",
        "marketing_percent_range",
        "rent_percent_of_revenue",
        "electricity_percent",
        "waste_percent_range",
        "delivery_ratio_percent",
        "dinein_ratio_percent",
        "avg_ticket_size_range_inr",
        "monthly_revenue_range_inr",
        "monthly_profit_margin_percent",
        "profit_margin_percent",
        "profit_margin_range_percent",
        "profit_margin_percent_range",
        "seating_capacity_norm",
        "equipment_investment_range_inr",
        "kitchen_size_sqft_range",
        "ideal_staff_count_range",
        "liquor_cost_percent_range",
    ];

    /// The ranges this profile defines, in field order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        Self::KEYS
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    /// Looks a range up by its field name.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "food_cost_percent_range" => &self.food_cost_percent_range,
            "staff_cost_percent_range" => &self.staff_cost_percent_range,
            "marketing_percent_range" => &self.marketing_percent_range,
            "rent_percent_of_revenue" => &self.rent_percent_of_revenue,
            "electricity_percent" => &self.electricity_percent,
            "waste_percent_range" => &self.waste_percent_range,
            "delivery_ratio_percent" => &self.delivery_ratio_percent,
            "dinein_ratio_percent" => &self.dinein_ratio_percent,
            "avg_ticket_size_range_inr" => &self.avg_ticket_size_range_inr,
            "monthly_revenue_range_inr" => &self.monthly_revenue_range_inr,
            "monthly_profit_margin_percent" => &self.monthly_profit_margin_percent,
            "profit_margin_percent" => &self.profit_margin_percent,
            "profit_margin_range_percent" => &self.profit_margin_range_percent,
            "profit_margin_percent_range" => &self.profit_margin_percent_range,
            "seating_capacity_norm" => &self.seating_capacity_norm,
            "equipment_investment_range_inr" => &self.equipment_investment_range_inr,
            "kitchen_size_sqft_range" => &self.kitchen_size_sqft_range,
            "ideal_staff_count_range" => &self.ideal_staff_count_range,
            "liquor_cost_percent_range" => &self.liquor_cost_percent_range,
            _ => return None,
        };
        value.as_deref()
    }

    /// The profit margin benchmark, whichever of the four spellings the
    /// profile uses.
    pub fn profit_margin(&self) -> Option<&str> {
        self.monthly_profit_margin_percent
            .as_deref()
            .or(self.profit_margin_percent.as_deref())
            .or(self.profit_margin_range_percent.as_deref())
            .or(self.profit_margin_percent_range.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CuisineVariation {
    pub food_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_items: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RestaurantTypeProfile {
    pub core_benchmarks: CoreBenchmarks,
    #[serde(default)]
    pub staff_structure: Vec<String>,
    pub common_problems: Vec<String>,
    /// Season to metric to signed percent string, e.g. `"+35"`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub seasonal_effects: BTreeMap<Season, BTreeMap<String, String>>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub city_tier_adjustments: BTreeMap<CityTier, BTreeMap<String, String>>,
    /// Qualitative notes only; they never change a number.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub regional_adjustments: BTreeMap<Region, BTreeMap<String, String>>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub cuisine_variations: BTreeMap<String, CuisineVariation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BenchmarkRange {
    pub min: f64,
    pub max: f64,
}

impl BenchmarkRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComparisonStatus {
    Within,
    Below,
    Above,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BenchmarkComparison {
    pub metric: String,
    pub actual: f64,
    pub benchmark: Option<String>,
    pub status: ComparisonStatus,
    /// Relative distance outside the range, in percent. Zero when within.
    pub deviation: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BenchmarkInsight {
    pub metric: String,
    pub comparison: BenchmarkComparison,
    pub recommendation: Option<String>,
}
