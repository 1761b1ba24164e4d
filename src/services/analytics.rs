use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use sea_orm::{ColumnTrait, EntityTrait, Iterable, QueryFilter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    benchmarks::{
        benchmark_scorecard, calculate_adjusted_benchmark, generate_benchmark_insights,
        restaurant_profile, Adjustments, BenchmarkInsight, CityTier, CoreBenchmarks, Region,
        RestaurantMetrics, RestaurantType, Scorecard, Season,
    },
    db::DbPool,
    entities::{
        menu_category::Entity as CategoryEntity,
        menu_item::Entity as MenuItemEntity,
        order::{self, Entity as OrderEntity, OrderStatus},
        order_item::{self, Entity as OrderItemEntity},
        payment::{self, Entity as PaymentEntity},
        PaymentMethod, PaymentStatus,
    },
    errors::ServiceError,
    services::settings::{RestaurantSettings, SettingsService},
};

const TOP_ITEM_LIMIT: usize = 5;
const UNCATEGORIZED: &str = "Uncategorized";
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    pub total_orders: u64,
    pub paid_orders: u64,
    pub tables_served: u64,
    #[schema(value_type = String)]
    pub average_bill: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TopItem {
    pub name: String,
    pub quantity: i64,
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRevenue {
    pub category: String,
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentMethodTotal {
    pub method: PaymentMethod,
    pub count: u64,
    #[schema(value_type = String)]
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub status_breakdown: Vec<StatusCount>,
    pub top_items: Vec<TopItem>,
    pub category_revenue: Vec<CategoryRevenue>,
    pub payment_methods: Vec<PaymentMethodTotal>,
    pub generated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RevenuePeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RevenueQuery {
    /// daily, weekly, monthly or yearly. Defaults to daily.
    pub period: Option<RevenuePeriod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RevenuePoint {
    pub label: String,
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RevenueSeries {
    pub period: RevenuePeriod,
    pub points: Vec<RevenuePoint>,
    #[schema(value_type = String)]
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BenchmarkReport {
    pub settings: RestaurantSettings,
    pub metrics: RestaurantMetrics,
    pub scorecard: Scorecard,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompareRequest {
    pub restaurant_type: RestaurantType,
    #[serde(default)]
    pub metrics: RestaurantMetrics,
    pub city_tier: Option<CityTier>,
    pub season: Option<Season>,
    pub region: Option<Region>,
}

/// The benchmark midpoint after city-tier and seasonal adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdjustedExpectation {
    pub metric: String,
    pub benchmark_key: String,
    pub expected: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComparisonReport {
    pub scorecard: Scorecard,
    pub insights: Vec<BenchmarkInsight>,
    pub adjusted: Vec<AdjustedExpectation>,
}

fn paid(orders: &[order::Model]) -> impl Iterator<Item = &order::Model> {
    orders.iter().filter(|o| o.status == OrderStatus::Paid)
}

pub fn dashboard_stats(orders: &[order::Model]) -> DashboardStats {
    let total_revenue: Decimal = paid(orders).map(|o| o.total).sum();
    let paid_orders = paid(orders).count() as u64;
    let tables_served = orders
        .iter()
        .filter_map(|o| o.table_id)
        .collect::<HashSet<Uuid>>()
        .len() as u64;
    let average_bill = if paid_orders > 0 {
        (total_revenue / Decimal::from(paid_orders)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    DashboardStats {
        total_revenue,
        total_orders: orders.len() as u64,
        paid_orders,
        tables_served,
        average_bill,
    }
}

/// Count per status, in workflow order, including zero counts.
pub fn status_breakdown(orders: &[order::Model]) -> Vec<StatusCount> {
    OrderStatus::iter()
        .map(|status| StatusCount {
            status,
            count: orders.iter().filter(|o| o.status == status).count() as u64,
        })
        .collect()
}

/// Best sellers by quantity. Ties go to the alphabetically first name.
pub fn top_items(items: &[order_item::Model], limit: usize) -> Vec<TopItem> {
    let mut by_name: BTreeMap<&str, (i64, Decimal)> = BTreeMap::new();
    for item in items {
        let entry = by_name.entry(item.name.as_str()).or_default();
        entry.0 += i64::from(item.quantity);
        entry.1 += item.line_total();
    }

    let mut ranked: Vec<TopItem> = by_name
        .into_iter()
        .map(|(name, (quantity, revenue))| TopItem {
            name: name.to_string(),
            quantity,
            revenue,
        })
        .collect();
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}

/// Line revenue grouped by the category of each line's menu item.
/// `category_of` maps menu item id to category name.
pub fn category_revenue(
    items: &[order_item::Model],
    category_of: &HashMap<Uuid, String>,
) -> Vec<CategoryRevenue> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for item in items {
        let category = category_of
            .get(&item.menu_item_id)
            .map(String::as_str)
            .unwrap_or(UNCATEGORIZED);
        *totals.entry(category).or_default() += item.line_total();
    }

    let mut rows: Vec<CategoryRevenue> = totals
        .into_iter()
        .filter(|(_, revenue)| *revenue > Decimal::ZERO)
        .map(|(category, revenue)| CategoryRevenue {
            category: category.to_string(),
            revenue,
        })
        .collect();
    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.category.cmp(&b.category)));
    rows
}

pub fn payment_method_totals(payments: &[payment::Model]) -> Vec<PaymentMethodTotal> {
    PaymentMethod::iter()
        .filter_map(|method| {
            let matching: Vec<&payment::Model> = payments
                .iter()
                .filter(|p| p.status == PaymentStatus::Completed && p.payment_method == method)
                .collect();
            if matching.is_empty() {
                return None;
            }
            Some(PaymentMethodTotal {
                method,
                count: matching.len() as u64,
                total: matching.iter().map(|p| p.amount).sum(),
            })
        })
        .collect()
}

fn paid_revenue_on(orders: &[order::Model], keep: impl Fn(NaiveDate) -> bool) -> Decimal {
    paid(orders)
        .filter(|o| keep(o.created_at.date_naive()))
        .map(|o| o.total)
        .sum()
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Paid-order revenue for the window ending at `now`, oldest bucket first.
pub fn bucket_revenue(
    orders: &[order::Model],
    period: RevenuePeriod,
    now: DateTime<Utc>,
) -> Vec<RevenuePoint> {
    let today = now.date_naive();

    match period {
        RevenuePeriod::Daily => (0..7)
            .rev()
            .map(|back| {
                let day = today - Duration::days(back);
                RevenuePoint {
                    label: day.format("%a").to_string(),
                    revenue: paid_revenue_on(orders, |date| date == day),
                }
            })
            .collect(),
        RevenuePeriod::Weekly => (0..4)
            .map(|week| {
                let end = today - Duration::days((3 - week) * 7);
                let start = end - Duration::days(6);
                RevenuePoint {
                    label: format!("Week {}", week + 1),
                    revenue: paid_revenue_on(orders, |date| date >= start && date <= end),
                }
            })
            .collect(),
        RevenuePeriod::Monthly => {
            let current = month_index(today);
            (0..12)
                .rev()
                .map(|back| {
                    let index = current - back;
                    RevenuePoint {
                        label: MONTH_LABELS[index.rem_euclid(12) as usize].to_string(),
                        revenue: paid_revenue_on(orders, |date| month_index(date) == index),
                    }
                })
                .collect()
        }
        RevenuePeriod::Yearly => (0..5)
            .rev()
            .map(|back| {
                let year = today.year() - back;
                RevenuePoint {
                    label: year.to_string(),
                    revenue: paid_revenue_on(orders, |date| date.year() == year),
                }
            })
            .collect(),
    }
}

/// Operating metrics that can be read off the order and payment ledger.
pub fn derive_metrics(stats: &DashboardStats, payments: &[payment::Model]) -> RestaurantMetrics {
    let mut metrics = RestaurantMetrics::default();
    if stats.total_revenue > Decimal::ZERO {
        let wallet_revenue: Decimal = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed && p.payment_method.is_digital_wallet())
            .map(|p| p.amount)
            .sum();
        metrics.delivery_ratio_percent = (wallet_revenue / stats.total_revenue
            * Decimal::ONE_HUNDRED)
            .round_dp(2)
            .to_f64();
    }
    if stats.paid_orders > 0 {
        metrics.avg_ticket_size = stats.average_bill.to_f64();
    }
    metrics
}

/// Core benchmark key that a metric field is judged against.
fn benchmark_key(metric: &str, core: &CoreBenchmarks) -> Option<&'static str> {
    let key = match metric {
        "food_cost_percent" => "food_cost_percent_range",
        "staff_cost_percent" => "staff_cost_percent_range",
        "marketing_percent" => "marketing_percent_range",
        "rent_percent" => "rent_percent_of_revenue",
        "electricity_percent" => "electricity_percent",
        "waste_percent" => "waste_percent_range",
        "delivery_ratio_percent" => "delivery_ratio_percent",
        "dinein_ratio_percent" => "dinein_ratio_percent",
        "avg_ticket_size" => "avg_ticket_size_range_inr",
        "monthly_revenue" => "monthly_revenue_range_inr",
        "profit_margin_percent" => {
            return [
                "monthly_profit_margin_percent",
                "profit_margin_percent",
                "profit_margin_range_percent",
                "profit_margin_percent_range",
            ]
            .into_iter()
            .find(|key| core.get(key).is_some());
        }
        _ => return None,
    };
    core.get(key).map(|_| key)
}

/// Scorecard, narrative insights and adjusted expectations for ad hoc metrics.
pub fn compare_metrics(request: &CompareRequest) -> ComparisonReport {
    let restaurant_type = request.restaurant_type;
    let entries = request.metrics.entries();

    let insight_inputs: BTreeMap<String, f64> = entries
        .iter()
        .map(|(key, value)| {
            let metric = key.strip_suffix("_percent").unwrap_or(key);
            (metric.to_string(), *value)
        })
        .collect();

    let adjustments = Adjustments {
        city_tier: request.city_tier,
        season: request.season,
        region: request.region,
    };
    let core = &restaurant_profile(restaurant_type).core_benchmarks;
    let adjusted = entries
        .iter()
        .filter_map(|(metric, _)| {
            let key = benchmark_key(metric, core)?;
            let expected = calculate_adjusted_benchmark(restaurant_type, key, &adjustments)?;
            Some(AdjustedExpectation {
                metric: metric.to_string(),
                benchmark_key: key.to_string(),
                expected,
            })
        })
        .collect();

    ComparisonReport {
        scorecard: benchmark_scorecard(restaurant_type, &request.metrics),
        insights: generate_benchmark_insights(restaurant_type, &insight_inputs),
        adjusted,
    }
}

/// Dashboard aggregates over orders, order lines and payments
#[derive(Clone)]
pub struct AnalyticsService {
    db: Arc<DbPool>,
    settings: SettingsService,
}

impl AnalyticsService {
    pub fn new(db: Arc<DbPool>, settings: SettingsService) -> Self {
        Self { db, settings }
    }

    async fn load_orders(&self) -> Result<Vec<order::Model>, ServiceError> {
        OrderEntity::find().all(&*self.db).await.map_err(|e| {
            error!(error = %e, "Failed to load orders for analytics");
            ServiceError::DatabaseError(e)
        })
    }

    async fn load_completed_payments(&self) -> Result<Vec<payment::Model>, ServiceError> {
        PaymentEntity::find()
            .filter(payment::Column::Status.eq(PaymentStatus::Completed))
            .all(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to load payments for analytics");
                ServiceError::DatabaseError(e)
            })
    }

    async fn paid_order_lines(
        &self,
        orders: &[order::Model],
    ) -> Result<Vec<order_item::Model>, ServiceError> {
        let paid_ids: Vec<Uuid> = paid(orders).map(|o| o.id).collect();
        if paid_ids.is_empty() {
            return Ok(Vec::new());
        }
        OrderItemEntity::find()
            .filter(order_item::Column::OrderId.is_in(paid_ids))
            .all(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to load order lines for analytics");
                ServiceError::DatabaseError(e)
            })
    }

    async fn category_names(&self) -> Result<HashMap<Uuid, String>, ServiceError> {
        let db = &*self.db;
        let categories: HashMap<Uuid, String> = CategoryEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        Ok(MenuItemEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .filter_map(|item| {
                let name = categories.get(&item.category_id?)?;
                Some((item.id, name.clone()))
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardData, ServiceError> {
        let orders = self.load_orders().await?;
        let lines = self.paid_order_lines(&orders).await?;
        let payments = self.load_completed_payments().await?;
        let category_of = self.category_names().await?;

        let stats = dashboard_stats(&orders);
        info!(
            total_orders = stats.total_orders,
            paid_orders = stats.paid_orders,
            "Dashboard aggregates computed"
        );

        Ok(DashboardData {
            status_breakdown: status_breakdown(&orders),
            top_items: top_items(&lines, TOP_ITEM_LIMIT),
            category_revenue: category_revenue(&lines, &category_of),
            payment_methods: payment_method_totals(&payments),
            stats,
            generated_at: Utc::now(),
        })
    }

    #[instrument(skip(self, now))]
    pub async fn revenue(
        &self,
        period: RevenuePeriod,
        now: DateTime<Utc>,
    ) -> Result<RevenueSeries, ServiceError> {
        let orders = self.load_orders().await?;
        let points = bucket_revenue(&orders, period, now);
        let total = points.iter().map(|p| p.revenue).sum();
        Ok(RevenueSeries {
            period,
            points,
            total,
        })
    }

    /// Metrics derived from the live ledger.
    pub async fn current_metrics(&self) -> Result<RestaurantMetrics, ServiceError> {
        let orders = self.load_orders().await?;
        let payments = self.load_completed_payments().await?;
        Ok(derive_metrics(&dashboard_stats(&orders), &payments))
    }

    /// Scorecard for the configured restaurant type over the live ledger.
    #[instrument(skip(self))]
    pub async fn benchmark_report(&self) -> Result<BenchmarkReport, ServiceError> {
        let Some(settings) = self.settings.get_settings().await? else {
            warn!("Benchmark report requested before settings were configured");
            return Err(ServiceError::BadRequest(
                "Restaurant settings are not configured".to_string(),
            ));
        };
        let metrics = self.current_metrics().await?;
        let scorecard = benchmark_scorecard(settings.restaurant_type, &metrics);
        Ok(BenchmarkReport {
            settings,
            metrics,
            scorecard,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap()
    }

    fn order_at(status: OrderStatus, total: Decimal, created_at: DateTime<Utc>) -> order::Model {
        order::Model {
            id: Uuid::new_v4(),
            table_id: Some(Uuid::new_v4()),
            status,
            subtotal: total,
            tax_amount: Decimal::ZERO,
            total,
            notes: None,
            created_at,
            updated_at: None,
            version: 1,
        }
    }

    fn line(name: &str, menu_item_id: Uuid, quantity: i32, price: Decimal) -> order_item::Model {
        order_item::Model {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            menu_item_id,
            name: name.to_string(),
            quantity,
            price,
            status: OrderStatus::Paid,
            notes: None,
            created_at: now(),
        }
    }

    fn payment(method: PaymentMethod, amount: Decimal) -> payment::Model {
        payment::Model {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            amount,
            amount_tendered: amount,
            change_due: Decimal::ZERO,
            payment_method: method,
            status: PaymentStatus::Completed,
            created_at: now(),
        }
    }

    #[test]
    fn stats_only_count_paid_revenue() {
        let shared_table = Uuid::new_v4();
        let mut first = order_at(OrderStatus::Paid, dec!(100), now());
        first.table_id = Some(shared_table);
        let mut second = order_at(OrderStatus::Paid, dec!(50), now());
        second.table_id = Some(shared_table);
        let open = order_at(OrderStatus::Preparing, dec!(999), now());

        let stats = dashboard_stats(&[first, second, open]);
        assert_eq!(stats.total_revenue, dec!(150));
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.paid_orders, 2);
        assert_eq!(stats.tables_served, 2);
        assert_eq!(stats.average_bill, dec!(75));
    }

    #[test]
    fn average_bill_is_zero_without_paid_orders() {
        let stats = dashboard_stats(&[order_at(OrderStatus::Pending, dec!(10), now())]);
        assert_eq!(stats.average_bill, Decimal::ZERO);
    }

    #[test]
    fn breakdown_lists_every_status() {
        let breakdown = status_breakdown(&[order_at(OrderStatus::Ready, dec!(1), now())]);
        assert_eq!(breakdown.len(), OrderStatus::iter().count());
        let ready = breakdown.iter().find(|s| s.status == OrderStatus::Ready).unwrap();
        assert_eq!(ready.count, 1);
    }

    #[test]
    fn top_items_break_ties_by_name() {
        let id = Uuid::new_v4();
        let lines = vec![
            line("Masala Dosa", id, 3, dec!(80)),
            line("Filter Coffee", id, 3, dec!(30)),
            line("Idli", id, 1, dec!(40)),
            line("Masala Dosa", id, 1, dec!(80)),
        ];
        let top = top_items(&lines, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Masala Dosa");
        assert_eq!(top[0].quantity, 4);
        assert_eq!(top[0].revenue, dec!(320));
        assert_eq!(top[1].name, "Filter Coffee");
    }

    #[test]
    fn category_revenue_drops_empty_categories() {
        let coffee = Uuid::new_v4();
        let water = Uuid::new_v4();
        let loose = Uuid::new_v4();
        let categories = HashMap::from([
            (coffee, "Beverages".to_string()),
            (water, "Complimentary".to_string()),
        ]);
        let lines = vec![
            line("Cappuccino", coffee, 2, dec!(120)),
            line("Water", water, 4, Decimal::ZERO),
            line("Special", loose, 1, dec!(300)),
        ];
        let rows = category_revenue(&lines, &categories);
        assert_eq!(
            rows,
            vec![
                CategoryRevenue {
                    category: UNCATEGORIZED.to_string(),
                    revenue: dec!(300)
                },
                CategoryRevenue {
                    category: "Beverages".to_string(),
                    revenue: dec!(240)
                },
            ]
        );
    }

    #[test]
    fn payment_totals_skip_refunds_and_unused_methods() {
        let mut refunded = payment(PaymentMethod::Card, dec!(500));
        refunded.status = PaymentStatus::Refunded;
        let totals = payment_method_totals(&[
            payment(PaymentMethod::Cash, dec!(100)),
            payment(PaymentMethod::Cash, dec!(20)),
            refunded,
        ]);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].method, PaymentMethod::Cash);
        assert_eq!(totals[0].count, 2);
        assert_eq!(totals[0].total, dec!(120));
    }

    #[test]
    fn daily_buckets_cover_the_last_week() {
        let orders = vec![
            order_at(OrderStatus::Paid, dec!(40), now()),
            order_at(OrderStatus::Paid, dec!(10), now() - Duration::days(6)),
            order_at(OrderStatus::Paid, dec!(99), now() - Duration::days(7)),
            order_at(OrderStatus::Cancelled, dec!(70), now()),
        ];
        let points = bucket_revenue(&orders, RevenuePeriod::Daily, now());
        assert_eq!(points.len(), 7);
        // 2024-03-15 is a Friday
        assert_eq!(points[6].label, "Fri");
        assert_eq!(points[6].revenue, dec!(40));
        assert_eq!(points[0].label, "Sat");
        assert_eq!(points[0].revenue, dec!(10));
        let total: Decimal = points.iter().map(|p| p.revenue).sum();
        assert_eq!(total, dec!(50));
    }

    #[test]
    fn weekly_buckets_are_labelled_oldest_first() {
        let orders = vec![
            order_at(OrderStatus::Paid, dec!(5), now() - Duration::days(2)),
            order_at(OrderStatus::Paid, dec!(7), now() - Duration::days(27)),
            order_at(OrderStatus::Paid, dec!(9), now() - Duration::days(28)),
        ];
        let points = bucket_revenue(&orders, RevenuePeriod::Weekly, now());
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["Week 1", "Week 2", "Week 3", "Week 4"]);
        assert_eq!(points[3].revenue, dec!(5));
        assert_eq!(points[0].revenue, dec!(7));
    }

    #[test]
    fn monthly_buckets_cross_the_year_boundary() {
        let last_november = Utc.with_ymd_and_hms(2023, 11, 2, 12, 0, 0).unwrap();
        let orders = vec![order_at(OrderStatus::Paid, dec!(25), last_november)];
        let points = bucket_revenue(&orders, RevenuePeriod::Monthly, now());
        assert_eq!(points.len(), 12);
        assert_eq!(points[0].label, "Apr");
        assert_eq!(points[11].label, "Mar");
        assert_eq!(points[7].label, "Nov");
        assert_eq!(points[7].revenue, dec!(25));
    }

    #[test]
    fn yearly_buckets_span_five_years() {
        let points = bucket_revenue(&[], RevenuePeriod::Yearly, now());
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["2020", "2021", "2022", "2023", "2024"]);
        assert!(points.iter().all(|p| p.revenue.is_zero()));
    }

    #[test]
    fn wallet_share_becomes_delivery_ratio() {
        let stats = dashboard_stats(&[
            order_at(OrderStatus::Paid, dec!(300), now()),
            order_at(OrderStatus::Paid, dec!(100), now()),
        ]);
        let metrics = derive_metrics(
            &stats,
            &[
                payment(PaymentMethod::Upi, dec!(300)),
                payment(PaymentMethod::Cash, dec!(100)),
            ],
        );
        assert_eq!(metrics.delivery_ratio_percent, Some(75.0));
        assert_eq!(metrics.avg_ticket_size, Some(200.0));
    }

    #[test]
    fn no_revenue_means_no_derived_ratios() {
        let metrics = derive_metrics(&dashboard_stats(&[]), &[]);
        assert_eq!(metrics, RestaurantMetrics::default());
    }

    #[test]
    fn compare_strips_percent_suffix_for_insights() {
        let report = compare_metrics(&CompareRequest {
            restaurant_type: RestaurantType::Cafe,
            metrics: RestaurantMetrics {
                food_cost_percent: Some(45.0),
                ..Default::default()
            },
            city_tier: None,
            season: None,
            region: None,
        });
        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.insights[0].metric, "food_cost");
        assert!(report.insights[0].recommendation.is_some());
        assert_eq!(report.scorecard.rows.len(), 1);
        assert_eq!(report.adjusted.len(), 1);
        assert_eq!(report.adjusted[0].benchmark_key, "food_cost_percent_range");
    }
}
