use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        order::Entity as OrderEntity,
        restaurant_table::{self, ActiveModel as TableActiveModel, Entity as TableEntity},
        TableStatus,
    },
    errors::ServiceError,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTableRequest {
    #[validate(length(min = 1, max = 64, message = "Table name is required"))]
    pub name: String,
    #[validate(range(min = 1, max = 50, message = "Seats must be between 1 and 50"))]
    pub seats: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateTableStatusRequest {
    pub status: TableStatus,
}

/// Dining tables on the floor plan
#[derive(Clone)]
pub struct TableService {
    db: Arc<DbPool>,
}

impl TableService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_tables(&self) -> Result<Vec<restaurant_table::Model>, ServiceError> {
        TableEntity::find()
            .order_by_asc(restaurant_table::Column::Name)
            .all(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list tables");
                ServiceError::DatabaseError(e)
            })
    }

    #[instrument(skip(self), fields(table_id = %table_id))]
    pub async fn get_table(&self, table_id: Uuid) -> Result<restaurant_table::Model, ServiceError> {
        TableEntity::find_by_id(table_id)
            .one(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, table_id = %table_id, "Failed to fetch table");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Table {} not found", table_id)))
    }

    #[instrument(skip(self, request), fields(name = %request.name, seats = request.seats))]
    pub async fn create_table(
        &self,
        request: CreateTableRequest,
    ) -> Result<restaurant_table::Model, ServiceError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Table name is required".to_string(),
            ));
        }
        request.validate()?;

        let db = &*self.db;
        let existing = TableEntity::find()
            .filter(restaurant_table::Column::Name.eq(name.as_str()))
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to check for duplicate table name");
                ServiceError::DatabaseError(e)
            })?;
        if existing.is_some() {
            warn!(name = %name, "Duplicate table name");
            return Err(ServiceError::Conflict(format!(
                "A table named '{}' already exists",
                name
            )));
        }

        let table = TableActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            seats: Set(request.seats),
            status: Set(TableStatus::Available),
            current_order_id: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create table");
            ServiceError::DatabaseError(e)
        })?;

        info!(table_id = %table.id, "Table created");
        Ok(table)
    }

    /// Moves a table between available, occupied and reserved. A table
    /// holding an unpaid order cannot be freed by hand.
    #[instrument(skip(self), fields(table_id = %table_id, status = %status))]
    pub async fn update_status(
        &self,
        table_id: Uuid,
        status: TableStatus,
    ) -> Result<restaurant_table::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start table status transaction");
            ServiceError::DatabaseError(e)
        })?;

        let table = TableEntity::find_by_id(table_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Table {} not found", table_id)))?;

        if status == TableStatus::Available {
            if let Some(order_id) = table.current_order_id {
                let linked = OrderEntity::find_by_id(order_id)
                    .one(&txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                if linked.is_some_and(|order| !order.status.is_terminal()) {
                    warn!(table_id = %table_id, order_id = %order_id, "Table still has an open order");
                    return Err(ServiceError::InvalidOperation(format!(
                        "Table {} has an unpaid order",
                        table.name
                    )));
                }
            }
        }

        let mut active: TableActiveModel = table.into();
        active.status = Set(status);
        if status == TableStatus::Available {
            active.current_order_id = Set(None);
        }
        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, "Failed to update table status");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit table status update");
            ServiceError::DatabaseError(e)
        })?;

        info!(table_id = %table_id, "Table status updated");
        Ok(updated)
    }
}
