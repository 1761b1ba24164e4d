use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::SESSION_COOKIE;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Restaurant POS API",
        version = "1.0.0",
        description = r#"
# Restaurant POS and Admin API

Back office for a single restaurant: floor plan, menu, order entry, kitchen
queue and billing, plus an admin dashboard that compares the restaurant's
numbers against industry benchmarks for its format.

## Authentication

Sign in with `POST /api/auth/login`. The response sets an `admin_session`
cookie which every `/api/v1` call must carry. Calls without a valid session
get a 401.

## Error Handling

Errors share one JSON shape:

```json
{
  "error": "Bad Request",
  "message": "Transition from ready to cancelled is not allowed",
  "request_id": "8f0c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

Order and payment lists take `page` (default 1) and `limit` query
parameters. `limit` is capped by server configuration.

## Money

Amounts are decimal strings in the configured currency (INR by default).
        "#,
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Auth", description = "Admin sign-in and session"),
        (name = "Tables", description = "Floor plan and table status"),
        (name = "Menu", description = "Menu categories and items"),
        (name = "Orders", description = "Order entry and the kitchen workflow"),
        (name = "Kitchen", description = "Kitchen display queue"),
        (name = "Billing", description = "Bills, payments and receipts"),
        (name = "Settings", description = "Restaurant profile"),
        (name = "Analytics", description = "Dashboard aggregates and benchmark scorecards"),
        (name = "Benchmarks", description = "Industry benchmark catalog"),
        (name = "Insights", description = "AI generated narrative insights"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Auth
        crate::auth::login,
        crate::auth::logout,
        crate::auth::current_session,

        // Floor and menu
        crate::handlers::tables::list_tables,
        crate::handlers::tables::create_table,
        crate::handlers::tables::get_table,
        crate::handlers::tables::update_table_status,
        crate::handlers::menu::list_categories,
        crate::handlers::menu::create_category,
        crate::handlers::menu::list_items,
        crate::handlers::menu::create_item,
        crate::handlers::menu::toggle_availability,

        // POS
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::replace_order_items,
        crate::handlers::orders::update_order_status,
        crate::handlers::kitchen::kitchen_queue,
        crate::handlers::payments::get_bill,
        crate::handlers::payments::record_payment,
        crate::handlers::payments::list_payments,

        // Admin
        crate::handlers::settings::get_settings,
        crate::handlers::settings::update_settings,
        crate::handlers::settings::is_configured,
        crate::handlers::analytics::get_dashboard,
        crate::handlers::analytics::get_revenue,
        crate::handlers::analytics::get_benchmark_report,
        crate::handlers::analytics::compare_benchmarks,
        crate::handlers::benchmarks::list_types,
        crate::handlers::benchmarks::get_profile,
        crate::handlers::insights::benchmark_insights,
        crate::handlers::insights::growth_insights,
        crate::handlers::insights::menu_insights,

        // Health
        crate::handlers::health::health_check,
        crate::handlers::health::api_status,
    ),
    components(
        schemas(
            // Common types
            crate::ListQuery,
            crate::errors::ErrorResponse,

            // Domain enums
            crate::entities::OrderStatus,
            crate::entities::TableStatus,
            crate::entities::PaymentMethod,
            crate::entities::PaymentStatus,
            crate::benchmarks::RestaurantType,
            crate::benchmarks::CityTier,
            crate::benchmarks::Season,
            crate::benchmarks::Region,

            // Benchmark engine
            crate::benchmarks::BenchmarkComparison,
            crate::benchmarks::BenchmarkInsight,
            crate::benchmarks::RestaurantMetrics,
            crate::benchmarks::Scorecard,
        )
    ),
    modifiers(&SessionCookieAddon),
    security(("session_cookie" = []))
)]
pub struct ApiDocV1;

/// Registers the admin session cookie as the API's security scheme.
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
