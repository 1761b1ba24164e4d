use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        menu_category::{self, ActiveModel as CategoryActiveModel, Entity as CategoryEntity},
        menu_item::{self, ActiveModel as MenuItemActiveModel, Entity as MenuItemEntity},
    },
    errors::ServiceError,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name is required"))]
    pub name: String,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, max = 200, message = "Item name is required"))]
    pub name: String,
    #[schema(value_type = String, example = "3.50")]
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct MenuItemFilter {
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub available_only: bool,
}

/// A menu item together with the name of its category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItemView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub is_available: bool,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MenuItemView {
    fn from_parts(item: menu_item::Model, category: Option<menu_category::Model>) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price,
            is_available: item.is_available,
            category_id: item.category_id,
            category_name: category.map(|c| c.name),
            created_at: item.created_at,
        }
    }
}

#[derive(Clone)]
pub struct MenuService {
    db: Arc<DbPool>,
}

impl MenuService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<menu_category::Model>, ServiceError> {
        CategoryEntity::find()
            .order_by_asc(menu_category::Column::DisplayOrder)
            .order_by_asc(menu_category::Column::Name)
            .all(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list menu categories");
                ServiceError::DatabaseError(e)
            })
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<menu_category::Model, ServiceError> {
        request.validate()?;

        let category = CategoryActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            display_order: Set(request.display_order.unwrap_or(0)),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create menu category");
            ServiceError::DatabaseError(e)
        })?;

        info!(category_id = %category.id, "Menu category created");
        Ok(category)
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self, filter: MenuItemFilter) -> Result<Vec<MenuItemView>, ServiceError> {
        let mut query = MenuItemEntity::find().find_also_related(CategoryEntity);
        if let Some(category_id) = filter.category_id {
            query = query.filter(menu_item::Column::CategoryId.eq(category_id));
        }
        if filter.available_only {
            query = query.filter(menu_item::Column::IsAvailable.eq(true));
        }

        let rows = query
            .order_by_asc(menu_item::Column::Name)
            .all(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list menu items");
                ServiceError::DatabaseError(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(item, category)| MenuItemView::from_parts(item, category))
            .collect())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_item(
        &self,
        request: CreateMenuItemRequest,
    ) -> Result<MenuItemView, ServiceError> {
        request.validate()?;
        if request.price.is_sign_negative() {
            return Err(ServiceError::ValidationError(
                "Price cannot be negative".to_string(),
            ));
        }

        let db = &*self.db;
        let category = match request.category_id {
            Some(category_id) => Some(
                CategoryEntity::find_by_id(category_id)
                    .one(db)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| {
                        ServiceError::BadRequest(format!("Unknown category {}", category_id))
                    })?,
            ),
            None => None,
        };

        let item = MenuItemActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(request.category_id),
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            price: Set(request.price.round_dp(2)),
            is_available: Set(request.is_available.unwrap_or(true)),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create menu item");
            ServiceError::DatabaseError(e)
        })?;

        info!(menu_item_id = %item.id, "Menu item created");
        Ok(MenuItemView::from_parts(item, category))
    }

    /// Flips `is_available` and returns the updated item.
    #[instrument(skip(self), fields(menu_item_id = %item_id))]
    pub async fn toggle_availability(&self, item_id: Uuid) -> Result<MenuItemView, ServiceError> {
        let db = &*self.db;
        let (item, category) = MenuItemEntity::find_by_id(item_id)
            .find_also_related(CategoryEntity)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Menu item {} not found", item_id)))?;

        let available = !item.is_available;
        let mut active: MenuItemActiveModel = item.into();
        active.is_available = Set(available);
        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, "Failed to toggle menu item availability");
            ServiceError::DatabaseError(e)
        })?;

        info!(menu_item_id = %item_id, is_available = available, "Menu item availability toggled");
        Ok(MenuItemView::from_parts(updated, category))
    }
}
