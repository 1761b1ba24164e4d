pub mod analytics;
pub mod benchmarks;
pub mod health;
pub mod insights;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod settings;
pub mod tables;

use std::sync::Arc;

use rust_decimal::{prelude::FromPrimitive, Decimal};
use tracing::warn;

use crate::{
    config::AppConfig,
    db::DbPool,
    llm::LlmClient,
    services::{
        analytics::AnalyticsService, insights::InsightService, menu::MenuService,
        orders::OrderService, payments::BillingService, settings::SettingsService,
        tables::TableService,
    },
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub tables: Arc<TableService>,
    pub menu: Arc<MenuService>,
    pub orders: Arc<OrderService>,
    pub billing: Arc<BillingService>,
    pub settings: Arc<SettingsService>,
    pub analytics: Arc<AnalyticsService>,
    pub insights: Arc<InsightService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig, llm: Option<Arc<dyn LlmClient>>) -> Self {
        let tax_rate = Decimal::from_f64(config.default_tax_rate)
            .map(|rate| rate.round_dp(4))
            .unwrap_or_else(|| {
                warn!(rate = config.default_tax_rate, "Unrepresentable tax rate, billing without tax");
                Decimal::ZERO
            });

        let settings = SettingsService::new(db_pool.clone());
        let analytics = AnalyticsService::new(db_pool.clone(), settings.clone());
        let insights = InsightService::new(llm, settings.clone(), analytics.clone());
        let orders = OrderService::new(db_pool.clone(), tax_rate)
            .with_page_sizes(config.api_default_page_size, config.api_max_page_size);

        Self {
            tables: Arc::new(TableService::new(db_pool.clone())),
            menu: Arc::new(MenuService::new(db_pool.clone())),
            orders: Arc::new(orders),
            billing: Arc::new(BillingService::new(db_pool, tax_rate, config.currency.clone())),
            settings: Arc::new(settings),
            analytics: Arc::new(analytics),
            insights: Arc::new(insights),
        }
    }
}
