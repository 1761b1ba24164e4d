use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

use crate::{
    benchmarks::{
        benchmark_scorecard, common_problems, display_name, restaurant_profile, seasonal_adjustment,
        BenchmarkComparison, CityTier, ComparisonStatus, RestaurantMetrics, RestaurantType, Season,
    },
    errors::ServiceError,
    llm::LlmClient,
    services::{
        analytics::{AnalyticsService, CategoryRevenue, TopItem},
        settings::SettingsService,
    },
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BenchmarkInsightRequest {
    pub restaurant_type: Option<RestaurantType>,
    pub city_tier: Option<CityTier>,
    pub season: Option<Season>,
    #[serde(default)]
    pub metrics: RestaurantMetrics,
    /// Free text such as "last 30 days".
    pub time_range: Option<String>,
    pub additional_context: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GrowthInsightRequest {
    pub restaurant_type: Option<RestaurantType>,
    #[serde(default)]
    pub metrics: RestaurantMetrics,
    pub season: Option<Season>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MenuInsightRequest {
    pub restaurant_type: Option<RestaurantType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InsightKind {
    Benchmark,
    Growth,
    Menu,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsightResponse {
    pub kind: InsightKind,
    pub restaurant_type: RestaurantType,
    pub insight: String,
    pub comparisons: Vec<BenchmarkComparison>,
    pub generated_at: DateTime<Utc>,
}

fn comparisons_for(restaurant_type: RestaurantType, metrics: &RestaurantMetrics) -> Vec<BenchmarkComparison> {
    benchmark_scorecard(restaurant_type, metrics)
        .rows
        .into_iter()
        .map(|row| row.comparison)
        .collect()
}

fn write_comparisons(prompt: &mut String, comparisons: &[BenchmarkComparison]) {
    if comparisons.is_empty() {
        prompt.push_str("No metrics with a matching benchmark were supplied.\n");
        return;
    }
    for comparison in comparisons {
        let _ = writeln!(prompt, "- {}", comparison.message);
    }
}

fn write_problems(prompt: &mut String, restaurant_type: RestaurantType) {
    let problems = common_problems(restaurant_type);
    if problems.is_empty() {
        return;
    }
    prompt.push_str("\nProblems this format commonly faces:\n");
    for problem in problems {
        let _ = writeln!(prompt, "- {problem}");
    }
}

pub fn benchmark_prompt(
    restaurant_type: RestaurantType,
    request: &BenchmarkInsightRequest,
    comparisons: &[BenchmarkComparison],
) -> String {
    let mut prompt = format!(
        "Restaurant format: {}.\n",
        display_name(restaurant_type)
    );
    if let Some(tier) = request.city_tier {
        let _ = writeln!(prompt, "City tier: {tier}.");
    }
    if let Some(season) = request.season {
        let _ = writeln!(prompt, "Season: {season}.");
    }
    if let Some(range) = request.time_range.as_deref() {
        let _ = writeln!(prompt, "Period under review: {range}.");
    }

    prompt.push_str("\nHow the metrics compare with Indian industry benchmarks:\n");
    write_comparisons(&mut prompt, comparisons);
    write_problems(&mut prompt, restaurant_type);

    if let Some(context) = request.additional_context.as_deref() {
        let _ = writeln!(prompt, "\nOwner's notes: {context}");
    }
    prompt.push_str(
        "\nExplain the three most important gaps and give one concrete action for each.",
    );
    prompt
}

pub fn growth_prompt(
    restaurant_type: RestaurantType,
    season: Option<Season>,
    comparisons: &[BenchmarkComparison],
) -> String {
    let mut prompt = format!(
        "Restaurant format: {}.\n\nCurrent position against benchmarks:\n",
        display_name(restaurant_type)
    );
    write_comparisons(&mut prompt, comparisons);

    if let Some(season) = season {
        let effects = restaurant_profile(restaurant_type)
            .seasonal_effects
            .get(&season)
            .map(|effects| {
                effects
                    .keys()
                    .filter_map(|metric| {
                        seasonal_adjustment(restaurant_type, season, metric)
                            .map(|pct| format!("{metric} {pct:+}%"))
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        if effects.is_empty() {
            let _ = writeln!(prompt, "\nUpcoming season: {season}.");
        } else {
            let _ = writeln!(
                prompt,
                "\nUpcoming season: {season}. Typical swings: {}.",
                effects.join(", ")
            );
        }
    }

    write_problems(&mut prompt, restaurant_type);
    prompt.push_str("\nSuggest a growth plan for the next quarter with measurable targets.");
    prompt
}

pub fn menu_prompt(
    restaurant_type: RestaurantType,
    top_items: &[TopItem],
    categories: &[CategoryRevenue],
) -> String {
    let mut prompt = format!(
        "Restaurant format: {}.\n\nBest sellers by quantity:\n",
        display_name(restaurant_type)
    );
    if top_items.is_empty() {
        prompt.push_str("- no paid orders yet\n");
    }
    for item in top_items {
        let _ = writeln!(
            prompt,
            "- {}: {} sold, revenue {}",
            item.name, item.quantity, item.revenue
        );
    }

    if !categories.is_empty() {
        prompt.push_str("\nRevenue by category:\n");
        for category in categories {
            let _ = writeln!(prompt, "- {}: {}", category.category, category.revenue);
        }
    }

    let cuisines = &restaurant_profile(restaurant_type).cuisine_variations;
    if !cuisines.is_empty() {
        prompt.push_str("\nPopular items for this format by cuisine:\n");
        for (cuisine, variation) in cuisines {
            if !variation.top_items.is_empty() {
                let _ = writeln!(prompt, "- {}: {}", cuisine, variation.top_items.join(", "));
            }
        }
    }

    prompt.push_str("\nRecommend menu changes: what to promote, reprice or retire.");
    prompt
}

/// Narrative insights generated by the configured LLM provider
#[derive(Clone)]
pub struct InsightService {
    llm: Option<Arc<dyn LlmClient>>,
    settings: SettingsService,
    analytics: AnalyticsService,
}

impl InsightService {
    pub fn new(
        llm: Option<Arc<dyn LlmClient>>,
        settings: SettingsService,
        analytics: AnalyticsService,
    ) -> Self {
        Self {
            llm,
            settings,
            analytics,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.llm.is_some()
    }

    fn client(&self) -> Result<&Arc<dyn LlmClient>, ServiceError> {
        self.llm.as_ref().ok_or_else(|| {
            ServiceError::ServiceUnavailable("AI insights are not configured".to_string())
        })
    }

    async fn resolve_type(
        &self,
        requested: Option<RestaurantType>,
    ) -> Result<RestaurantType, ServiceError> {
        if let Some(restaurant_type) = requested {
            return Ok(restaurant_type);
        }
        self.settings
            .get_settings()
            .await?
            .map(|settings| settings.restaurant_type)
            .ok_or_else(|| {
                ServiceError::BadRequest(
                    "restaurant_type is required until restaurant settings are configured"
                        .to_string(),
                )
            })
    }

    async fn generate(
        &self,
        kind: InsightKind,
        restaurant_type: RestaurantType,
        prompt: String,
        comparisons: Vec<BenchmarkComparison>,
    ) -> Result<InsightResponse, ServiceError> {
        let client = self.client()?;
        let insight = client.complete(&prompt).await.map_err(|e| {
            error!(error = %e, kind = %kind, "Insight generation failed");
            ServiceError::from(e)
        })?;
        info!(kind = %kind, restaurant_type = %restaurant_type, "Insight generated");
        Ok(InsightResponse {
            kind,
            restaurant_type,
            insight,
            comparisons,
            generated_at: Utc::now(),
        })
    }

    #[instrument(skip(self, request))]
    pub async fn benchmark_insights(
        &self,
        request: BenchmarkInsightRequest,
    ) -> Result<InsightResponse, ServiceError> {
        self.client()?;
        let restaurant_type = self.resolve_type(request.restaurant_type).await?;
        let comparisons = comparisons_for(restaurant_type, &request.metrics);
        let off_target = comparisons
            .iter()
            .filter(|c| c.status != ComparisonStatus::Within)
            .count();
        debug!(off_target, "Benchmark comparisons prepared");
        let prompt = benchmark_prompt(restaurant_type, &request, &comparisons);
        self.generate(InsightKind::Benchmark, restaurant_type, prompt, comparisons)
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn growth_insights(
        &self,
        request: GrowthInsightRequest,
    ) -> Result<InsightResponse, ServiceError> {
        self.client()?;
        let restaurant_type = self.resolve_type(request.restaurant_type).await?;
        let comparisons = comparisons_for(restaurant_type, &request.metrics);
        let prompt = growth_prompt(restaurant_type, request.season, &comparisons);
        self.generate(InsightKind::Growth, restaurant_type, prompt, comparisons)
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn menu_insights(
        &self,
        request: MenuInsightRequest,
    ) -> Result<InsightResponse, ServiceError> {
        self.client()?;
        let restaurant_type = self.resolve_type(request.restaurant_type).await?;
        let dashboard = self.analytics.dashboard().await?;
        let prompt = menu_prompt(
            restaurant_type,
            &dashboard.top_items,
            &dashboard.category_revenue,
        );
        self.generate(InsightKind::Menu, restaurant_type, prompt, Vec::new())
            .await
    }
}
