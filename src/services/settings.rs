use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::OnConflict, ConnectionTrait, EntityTrait, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    benchmarks::{display_name, CityTier, Region, RestaurantType},
    db::DbPool,
    entities::restaurant_settings::{self, ActiveModel as SettingsActiveModel, Entity as SettingsEntity},
    errors::ServiceError,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsRequest {
    pub restaurant_type: RestaurantType,
    pub city_tier: Option<CityTier>,
    pub region: Option<Region>,
    #[validate(length(max = 200, message = "Restaurant name is too long"))]
    pub restaurant_name: Option<String>,
}

/// The restaurant profile that drives benchmark comparisons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RestaurantSettings {
    pub id: Uuid,
    pub restaurant_type: RestaurantType,
    pub restaurant_type_name: String,
    pub city_tier: Option<CityTier>,
    pub region: Option<Region>,
    pub restaurant_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RestaurantSettings {
    /// Returns `None` when the stored type is not one we know.
    fn from_model(model: restaurant_settings::Model) -> Option<Self> {
        let restaurant_type = RestaurantType::from_str(&model.restaurant_type).ok()?;
        Some(Self {
            id: model.id,
            restaurant_type,
            restaurant_type_name: display_name(restaurant_type).to_string(),
            city_tier: model
                .city_tier
                .as_deref()
                .and_then(|tier| CityTier::from_str(tier).ok()),
            region: model
                .region
                .as_deref()
                .and_then(|region| Region::from_str(region).ok()),
            restaurant_name: model.restaurant_name,
            updated_at: model.updated_at,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ConfiguredStatus {
    pub configured: bool,
}

/// Id of the settings row written on first save.
const SETTINGS_ROW_ID: Uuid = Uuid::from_u128(1);

async fn current_row<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<restaurant_settings::Model>, ServiceError> {
    SettingsEntity::find()
        .order_by_asc(restaurant_settings::Column::CreatedAt)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load restaurant settings");
            ServiceError::DatabaseError(e)
        })
}

#[derive(Clone)]
pub struct SettingsService {
    db: Arc<DbPool>,
}

impl SettingsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn get_settings(&self) -> Result<Option<RestaurantSettings>, ServiceError> {
        let Some(row) = current_row(&*self.db).await? else {
            return Ok(None);
        };
        let stored_type = row.restaurant_type.clone();
        let settings = RestaurantSettings::from_model(row);
        if settings.is_none() {
            warn!(restaurant_type = %stored_type, "Stored restaurant type is not recognised");
        }
        Ok(settings)
    }

    pub async fn is_configured(&self) -> Result<bool, ServiceError> {
        Ok(self.get_settings().await?.is_some())
    }

    /// Creates the settings row on first use, updates it afterwards.
    #[instrument(skip(self, request), fields(restaurant_type = %request.restaurant_type))]
    pub async fn upsert_settings(
        &self,
        request: UpdateSettingsRequest,
    ) -> Result<RestaurantSettings, ServiceError> {
        request.validate()?;
        let restaurant_name = request
            .restaurant_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start settings transaction");
            ServiceError::DatabaseError(e)
        })?;

        let now = Utc::now();
        let existing = current_row(&txn).await?;
        let row = SettingsActiveModel {
            id: Set(existing.as_ref().map_or(SETTINGS_ROW_ID, |row| row.id)),
            restaurant_type: Set(request.restaurant_type.to_string()),
            city_tier: Set(request.city_tier.map(|t| t.to_string())),
            region: Set(request.region.map(|r| r.to_string())),
            restaurant_name: Set(restaurant_name),
            created_at: Set(existing.as_ref().map_or(now, |row| row.created_at)),
            updated_at: Set(now),
        };

        // A concurrent first save lands on the same id and turns into an update.
        SettingsEntity::insert(row)
            .on_conflict(
                OnConflict::column(restaurant_settings::Column::Id)
                    .update_columns([
                        restaurant_settings::Column::RestaurantType,
                        restaurant_settings::Column::CityTier,
                        restaurant_settings::Column::Region,
                        restaurant_settings::Column::RestaurantName,
                        restaurant_settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to save restaurant settings");
                ServiceError::DatabaseError(e)
            })?;

        let saved = current_row(&txn).await?.ok_or_else(|| {
            ServiceError::InternalError("Restaurant settings vanished after saving".to_string())
        })?;
        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit restaurant settings");
            ServiceError::DatabaseError(e)
        })?;

        info!(settings_id = %saved.id, "Restaurant settings saved");
        RestaurantSettings::from_model(saved).ok_or_else(|| {
            ServiceError::InternalError("Saved restaurant type could not be read back".to_string())
        })
    }
}
