use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::{
    CityTier, CoreBenchmarks, CuisineVariation, Region, RestaurantType, RestaurantTypeProfile,
    Season,
};

static CAFE: Lazy<RestaurantTypeProfile> = Lazy::new(cafe);
static QSR: Lazy<RestaurantTypeProfile> = Lazy::new(qsr);
static FINE_DINE: Lazy<RestaurantTypeProfile> = Lazy::new(fine_dine);
static PUB_RESTOBAR: Lazy<RestaurantTypeProfile> = Lazy::new(pub_restobar);
static CLOUD_KITCHEN: Lazy<RestaurantTypeProfile> = Lazy::new(cloud_kitchen);
static BAKERY: Lazy<RestaurantTypeProfile> = Lazy::new(bakery);
static FOOD_TRUCK: Lazy<RestaurantTypeProfile> = Lazy::new(food_truck);

/// India benchmark profile for a restaurant format.
pub fn restaurant_profile(restaurant_type: RestaurantType) -> &'static RestaurantTypeProfile {
    match restaurant_type {
        RestaurantType::Cafe => &CAFE,
        RestaurantType::Qsr => &QSR,
        RestaurantType::FineDine => &FINE_DINE,
        RestaurantType::PubRestobar => &PUB_RESTOBAR,
        RestaurantType::CloudKitchen => &CLOUD_KITCHEN,
        RestaurantType::Bakery => &BAKERY,
        RestaurantType::FoodTruck => &FOOD_TRUCK,
    }
}

fn s(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn pairs(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn cafe() -> RestaurantTypeProfile {
    RestaurantTypeProfile {
        core_benchmarks: CoreBenchmarks {
            food_cost_percent_range: s("32-38"),
            staff_cost_percent_range: s("18-25"),
            marketing_percent_range: s("5-8"),
            rent_percent_of_revenue: s("12-18"),
            electricity_percent: s("4-7"),
            waste_percent_range: s("3-5"),
            delivery_ratio_percent: s("25-40"),
            dinein_ratio_percent: s("60-75"),
            avg_ticket_size_range_inr: s("250-450"),
            monthly_revenue_range_inr: s("3L-12L"),
            monthly_profit_margin_percent: s("12-18"),
            seating_capacity_norm: s("20-60"),
            equipment_investment_range_inr: s("4L-10L"),
            kitchen_size_sqft_range: s("80-150"),
            ideal_staff_count_range: s("6-14"),
            ..Default::default()
        },
        staff_structure: list(&[
            "1-2 baristas",
            "1-2 kitchen staff",
            "1 cashier",
            "1 floor staff",
            "1 cleaning/helper",
            "Optional pastry chef",
        ]),
        common_problems: list(&[
            "High metro rents",
            "Unstable staff skill",
            "Coffee bean price fluctuations",
            "Season-dependent footfall",
            "Delivery commission issues",
            "High electricity consumption",
        ]),
        seasonal_effects: BTreeMap::from([
            (
                Season::Summer,
                pairs(&[("cold_beverages_sales_boost", "+35"), ("hot_sales_drop", "-12")]),
            ),
            (
                Season::Monsoon,
                pairs(&[("footfall_drop", "-8"), ("snack_demand", "+12")]),
            ),
            (
                Season::Winter,
                pairs(&[("hot_coffee_boost", "+22"), ("desserts_boost", "+18")]),
            ),
        ]),
        city_tier_adjustments: BTreeMap::from([
            (
                CityTier::Metro,
                pairs(&[
                    ("rent_increase_percent", "+30"),
                    ("salary_increase_percent", "+18"),
                    ("ticket_size_variation", "+22"),
                ]),
            ),
            (
                CityTier::Tier1,
                pairs(&[
                    ("rent_increase_percent", "+15"),
                    ("salary_increase_percent", "+10"),
                ]),
            ),
            (
                CityTier::Tier2,
                pairs(&[("rent_variation", "+5"), ("ticket_size_variation", "-5")]),
            ),
            (
                CityTier::Tier3,
                pairs(&[("rent_variation", "-10"), ("ticket_size_variation", "-15")]),
            ),
        ]),
        regional_adjustments: BTreeMap::from([
            (
                Region::South,
                pairs(&[("coffee_preference", "High"), ("milk_usage", "High")]),
            ),
            (Region::North, pairs(&[("milkshake_demand", "High")])),
            (Region::West, pairs(&[("cold_coffee_preference", "Very High")])),
            (Region::East, pairs(&[("tea_preference", "Higher than coffee")])),
        ]),
        cuisine_variations: BTreeMap::new(),
    }
}

fn qsr() -> RestaurantTypeProfile {
    RestaurantTypeProfile {
        core_benchmarks: CoreBenchmarks {
            food_cost_percent_range: s("28-35"),
            staff_cost_percent_range: s("14-20"),
            marketing_percent_range: s("3-7"),
            rent_percent_of_revenue: s("10-14"),
            electricity_percent: s("5-8"),
            waste_percent_range: s("4-7"),
            delivery_ratio_percent: s("60-75"),
            dinein_ratio_percent: s("25-40"),
            avg_ticket_size_range_inr: s("150-300"),
            monthly_revenue_range_inr: s("4L-18L"),
            monthly_profit_margin_percent: s("10-15"),
            ..Default::default()
        },
        staff_structure: Vec::new(),
        common_problems: list(&[
            "Delivery commissions 25-30%",
            "Vegetable and oil price spikes",
            "Peak-hour bottlenecks",
            "Prep inconsistency",
            "High packaging cost",
        ]),
        seasonal_effects: BTreeMap::from([
            (Season::Summer, pairs(&[("beverage_boost", "+20")])),
            (Season::Monsoon, pairs(&[("fried_sales_boost", "+30")])),
            (Season::Winter, pairs(&[("rolls_boost", "+25")])),
        ]),
        city_tier_adjustments: BTreeMap::from([
            (
                CityTier::Metro,
                pairs(&[("rent", "+22"), ("salary", "+15"), ("ticket_size", "+18")]),
            ),
            (
                CityTier::Tier2,
                pairs(&[("ticket_size", "-5"), ("dinein_increase", "+15")]),
            ),
        ]),
        regional_adjustments: BTreeMap::new(),
        cuisine_variations: BTreeMap::from([
            (
                "burger_qsr".to_string(),
                CuisineVariation {
                    food_cost: s("30-35"),
                    top_items: list(&["Chicken Burger", "Veg Burger"]),
                    notes: BTreeMap::new(),
                },
            ),
            (
                "biryani_qsr".to_string(),
                CuisineVariation {
                    food_cost: s("32-40"),
                    top_items: Vec::new(),
                    notes: pairs(&[("oil_usage", "High")]),
                },
            ),
            (
                "roll_qsr".to_string(),
                CuisineVariation {
                    food_cost: s("28-34"),
                    top_items: list(&["Paneer Roll", "Egg Roll"]),
                    notes: BTreeMap::new(),
                },
            ),
        ]),
    }
}

fn fine_dine() -> RestaurantTypeProfile {
    RestaurantTypeProfile {
        core_benchmarks: CoreBenchmarks {
            food_cost_percent_range: s("30-40"),
            staff_cost_percent_range: s("22-30"),
            marketing_percent_range: s("4-7"),
            rent_percent_of_revenue: s("12-20"),
            avg_ticket_size_range_inr: s("600-1500"),
            profit_margin_percent: s("8-12"),
            seating_capacity_norm: s("40-120"),
            ..Default::default()
        },
        staff_structure: list(&[
            "Executive Chef",
            "Sous Chef",
            "Commis",
            "Stewards",
            "Hostess",
            "Biller",
        ]),
        common_problems: list(&[
            "High staff cost",
            "Footfall instability",
            "High expectations",
            "Food wastage from fine plating",
            "Rental burden",
        ]),
        ..Default::default()
    }
}

fn pub_restobar() -> RestaurantTypeProfile {
    RestaurantTypeProfile {
        core_benchmarks: CoreBenchmarks {
            liquor_cost_percent_range: s("18-25"),
            food_cost_percent_range: s("28-35"),
            staff_cost_percent_range: s("20-28"),
            rent_percent_of_revenue: s("15-25"),
            avg_ticket_size_range_inr: s("800-2000"),
            waste_percent_range: s("5-10"),
            ..Default::default()
        },
        common_problems: list(&[
            "Excise issues",
            "Liquor pilferage",
            "Weekend dependency",
            "Police checks",
            "High licensing cost",
        ]),
        ..Default::default()
    }
}

fn cloud_kitchen() -> RestaurantTypeProfile {
    RestaurantTypeProfile {
        core_benchmarks: CoreBenchmarks {
            food_cost_percent_range: s("28-34"),
            staff_cost_percent_range: s("10-16"),
            marketing_percent_range: s("8-15"),
            delivery_ratio_percent: s("85-95"),
            avg_ticket_size_range_inr: s("120-250"),
            profit_margin_range_percent: s("12-20"),
            waste_percent_range: s("3-6"),
            ..Default::default()
        },
        common_problems: list(&[
            "Delivery partner dependency",
            "Refunds/cancellations",
            "Brand discovery issues",
            "Packaging costs",
        ]),
        ..Default::default()
    }
}

fn bakery() -> RestaurantTypeProfile {
    RestaurantTypeProfile {
        core_benchmarks: CoreBenchmarks {
            food_cost_percent_range: s("32-40"),
            staff_cost_percent_range: s("16-22"),
            waste_percent_range: s("7-12"),
            avg_ticket_size_range_inr: s("100-250"),
            ..Default::default()
        },
        common_problems: list(&[
            "Shelf-life issues",
            "Festive season spikes",
            "Unsold inventory wastage",
        ]),
        ..Default::default()
    }
}

fn food_truck() -> RestaurantTypeProfile {
    RestaurantTypeProfile {
        core_benchmarks: CoreBenchmarks {
            food_cost_percent_range: s("28-36"),
            staff_cost_percent_range: s("10-14"),
            waste_percent_range: s("3-6"),
            avg_ticket_size_range_inr: s("80-200"),
            monthly_revenue_range_inr: s("1.5L-6L"),
            profit_margin_percent_range: s("12-20"),
            ..Default::default()
        },
        common_problems: list(&[
            "Location instability",
            "Weather dependency",
            "Parking permissions",
            "Limited storage",
        ]),
        ..Default::default()
    }
}
