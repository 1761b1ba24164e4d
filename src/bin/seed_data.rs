//! Seed data script - populates the database with a small demo restaurant
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - 6 dining tables (T1 to T6)
//! - 4 menu categories with a dozen items between them
//! - restaurant settings for a metro cafe
//!
//! Running it twice is harmless: it stops if tables already exist.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use restaurant_pos_api::{
    benchmarks::{CityTier, Region, RestaurantType},
    db,
    services::{
        menu::{CreateCategoryRequest, CreateMenuItemRequest, MenuService},
        settings::{SettingsService, UpdateSettingsRequest},
        tables::{CreateTableRequest, TableService},
    },
};

const TABLES: [(&str, i32); 6] = [
    ("T1", 2),
    ("T2", 2),
    ("T3", 4),
    ("T4", 4),
    ("T5", 6),
    ("T6", 8),
];

const MENU: [(&str, &[(&str, Decimal, &str)]); 4] = [
    (
        "Beverages",
        &[
            ("Filter Coffee", dec!(60.00), "South Indian drip coffee with milk"),
            ("Masala Chai", dec!(40.00), "Spiced milk tea"),
            ("Cold Coffee", dec!(140.00), "Blended with ice cream"),
        ],
    ),
    (
        "Breakfast",
        &[
            ("Masala Dosa", dec!(120.00), "Rice crepe with potato filling"),
            ("Idli Vada", dec!(90.00), "Two idlis and one medu vada"),
            ("Poha", dec!(70.00), "Flattened rice with peanuts"),
        ],
    ),
    (
        "Mains",
        &[
            ("Paneer Butter Masala", dec!(260.00), "With two butter naan"),
            ("Veg Biryani", dec!(220.00), "Served with raita"),
            ("Dal Makhani", dec!(200.00), "Slow cooked black lentils"),
        ],
    ),
    (
        "Desserts",
        &[
            ("Gulab Jamun", dec!(80.00), "Two pieces"),
            ("Rasmalai", dec!(110.00), "Two pieces"),
            ("Brownie Sundae", dec!(180.00), "Warm brownie with vanilla"),
        ],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== Restaurant POS Seed Data ===");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://restaurant_pos.db?mode=rwc".to_string());

    let pool = Arc::new(db::establish_connection(&database_url).await?);
    db::run_migrations(&pool).await?;

    let tables = TableService::new(pool.clone());
    if !tables.list_tables().await?.is_empty() {
        info!("Tables already exist, skipping seed");
        return Ok(());
    }

    info!("Creating tables...");
    for (name, seats) in TABLES {
        tables
            .create_table(CreateTableRequest {
                name: name.to_string(),
                seats,
            })
            .await?;
    }
    info!("  Created {} tables", TABLES.len());

    info!("Creating menu...");
    let menu = MenuService::new(pool.clone());
    let mut item_count = 0;
    for (display_order, (category_name, items)) in MENU.iter().enumerate() {
        let category = menu
            .create_category(CreateCategoryRequest {
                name: category_name.to_string(),
                display_order: Some(display_order as i32),
            })
            .await?;
        for (name, price, description) in items.iter() {
            menu.create_item(CreateMenuItemRequest {
                name: name.to_string(),
                price: *price,
                category_id: Some(category.id),
                description: Some(description.to_string()),
                is_available: Some(true),
            })
            .await?;
            item_count += 1;
        }
    }
    info!("  Created {} categories and {} items", MENU.len(), item_count);

    info!("Saving restaurant settings...");
    SettingsService::new(pool)
        .upsert_settings(UpdateSettingsRequest {
            restaurant_type: RestaurantType::Cafe,
            city_tier: Some(CityTier::Metro),
            region: Some(Region::South),
            restaurant_name: Some("Demo Cafe".to_string()),
        })
        .await?;

    info!("Seed complete");
    Ok(())
}
