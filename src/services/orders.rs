use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        menu_item::{self, Entity as MenuItemEntity},
        order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity, OrderStatus},
        order_item::{self, ActiveModel as OrderItemActiveModel, Entity as OrderItemEntity},
        restaurant_table::{self, Entity as TableEntity},
        TableStatus,
    },
    errors::ServiceError,
    page_index,
    services::order_status::is_valid_transition,
    PaginatedResponse,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineInput {
    pub menu_item_id: Uuid,
    #[validate(range(min = 1, max = 999, message = "Quantity must be between 1 and 999"))]
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub table_id: Uuid,
    #[validate(length(min = 1, message = "An order needs at least one item"))]
    pub items: Vec<OrderLineInput>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReplaceOrderItemsRequest {
    #[validate(length(min = 1, message = "An order needs at least one item"))]
    pub items: Vec<OrderLineInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    /// When set, the update is rejected if the order has moved on since.
    pub expected_version: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct OrderFilter {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<OrderStatus>,
    pub table_id: Option<Uuid>,
}

/// An order with its lines and the name of its table
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub id: Uuid,
    pub table_id: Option<Uuid>,
    pub table_name: Option<String>,
    pub status: OrderStatus,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub tax_amount: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub notes: Option<String>,
    pub items: Vec<order_item::Model>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

impl OrderDetail {
    pub fn from_parts(
        order: order::Model,
        items: Vec<order_item::Model>,
        table_name: Option<String>,
    ) -> Self {
        Self {
            id: order.id,
            table_id: order.table_id,
            table_name,
            status: order.status,
            subtotal: order.subtotal,
            tax_amount: order.tax_amount,
            total: order.total,
            notes: order.notes,
            items,
            created_at: order.created_at,
            updated_at: order.updated_at,
            version: order.version,
        }
    }
}

/// A kitchen display ticket
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KitchenTicket {
    #[serde(flatten)]
    pub order: OrderDetail,
    pub elapsed_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderTotals {
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub tax_amount: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
}

/// Subtotal of `(unit price, quantity)` lines, tax rounded to 2 dp.
pub fn compute_totals<I>(lines: I, tax_rate: Decimal) -> OrderTotals
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    let subtotal: Decimal = lines
        .into_iter()
        .map(|(price, quantity)| price * Decimal::from(quantity))
        .sum();
    let tax_amount = (subtotal * tax_rate).round_dp(2);
    OrderTotals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    }
}

/// POS order entry and the kitchen workflow
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    tax_rate: Decimal,
    default_page_size: u64,
    max_page_size: u64,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, tax_rate: Decimal) -> Self {
        Self {
            db,
            tax_rate,
            default_page_size: 20,
            max_page_size: 100,
        }
    }

    pub fn with_page_sizes(mut self, default_page_size: u64, max_page_size: u64) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    #[instrument(skip(self, request), fields(table_id = %request.table_id, lines = request.items.len()))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<OrderDetail, ServiceError> {
        request.validate()?;
        for line in &request.items {
            line.validate()?;
        }

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        let table = TableEntity::find_by_id(request.table_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Table {} not found", request.table_id))
            })?;

        if let Some(open_order_id) = table.current_order_id {
            let open = OrderEntity::find_by_id(open_order_id)
                .one(&txn)
                .await
                .map_err(ServiceError::DatabaseError)?;
            if open.is_some_and(|o| !o.status.is_terminal()) {
                warn!(table_id = %table.id, order_id = %open_order_id, "Table already has an open order");
                return Err(ServiceError::Conflict(format!(
                    "Table {} already has an unpaid order",
                    table.name
                )));
            }
        }

        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let lines = self.snapshot_lines(&txn, order_id, &request.items, now).await?;
        let totals = compute_totals(
            lines.iter().map(|line| (line.price, line.quantity)),
            self.tax_rate,
        );

        let order = OrderActiveModel {
            id: Set(order_id),
            table_id: Set(Some(table.id)),
            status: Set(OrderStatus::Pending),
            subtotal: Set(totals.subtotal),
            tax_amount: Set(totals.tax_amount),
            total: Set(totals.total),
            notes: Set(request.notes),
            created_at: Set(now),
            updated_at: Set(None),
            version: Set(1),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to insert order");
            ServiceError::DatabaseError(e)
        })?;

        let items = insert_lines(&txn, lines).await?;

        // Claim the table only if nobody relinked it since it was read.
        let linked = match table.current_order_id {
            Some(previous) => restaurant_table::Column::CurrentOrderId.eq(previous),
            None => restaurant_table::Column::CurrentOrderId.is_null(),
        };
        let claimed = TableEntity::update_many()
            .col_expr(restaurant_table::Column::Status, Expr::value(TableStatus::Occupied))
            .col_expr(restaurant_table::Column::CurrentOrderId, Expr::value(Some(order_id)))
            .col_expr(restaurant_table::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(restaurant_table::Column::Id.eq(table.id))
            .filter(linked)
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to seat order at table");
                ServiceError::DatabaseError(e)
            })?;
        if claimed.rows_affected != 1 {
            warn!(table_id = %table.id, "Table was claimed by another order");
            return Err(ServiceError::Conflict(format!(
                "Table {} already has an unpaid order",
                table.name
            )));
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation");
            ServiceError::DatabaseError(e)
        })?;

        counter!("restaurant_pos.orders.created", 1);
        histogram!(
            "restaurant_pos.orders.total",
            totals.total.to_f64().unwrap_or(0.0)
        );
        info!(order_id = %order_id, total = %totals.total, "Order created");
        Ok(OrderDetail::from_parts(order, items, Some(table.name)))
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderDetail, ServiceError> {
        load_detail(&*self.db, order_id).await
    }

    #[instrument(skip(self, filter))]
    pub async fn list_orders(
        &self,
        filter: OrderFilter,
    ) -> Result<PaginatedResponse<order::Model>, ServiceError> {
        let page = filter.page.unwrap_or(1).max(1);
        let limit = match filter.limit.unwrap_or(0) {
            0 => self.default_page_size,
            requested => requested.min(self.max_page_size),
        };

        let mut query = OrderEntity::find();
        if let Some(status) = filter.status {
            query = query.filter(order::Column::Status.eq(status));
        }
        if let Some(table_id) = filter.table_id {
            query = query.filter(order::Column::TableId.eq(table_id));
        }

        let paginator = query
            .order_by_desc(order::Column::CreatedAt)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count orders");
            ServiceError::DatabaseError(e)
        })?;
        let items = match page_index(page, limit, total) {
            Some(index) => paginator.fetch_page(index).await.map_err(|e| {
                error!(error = %e, page, limit, "Failed to fetch orders page");
                ServiceError::DatabaseError(e)
            })?,
            None => Vec::new(),
        };

        Ok(PaginatedResponse::new(items, total, page, limit))
    }

    /// Replaces every line of an order still in the kitchen and recomputes
    /// its totals.
    #[instrument(skip(self, request), fields(order_id = %order_id, lines = request.items.len()))]
    pub async fn replace_items(
        &self,
        order_id: Uuid,
        request: ReplaceOrderItemsRequest,
    ) -> Result<OrderDetail, ServiceError> {
        request.validate()?;
        for line in &request.items {
            line.validate()?;
        }

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for item replacement");
            ServiceError::DatabaseError(e)
        })?;

        let order = find_order(&txn, order_id).await?;
        if !order.status.is_editable() {
            return Err(ServiceError::InvalidStatus(format!(
                "Items cannot be changed while the order is {}",
                order.status
            )));
        }

        OrderItemEntity::delete_many()
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to clear order items");
                ServiceError::DatabaseError(e)
            })?;

        let now = Utc::now();
        let mut lines = self.snapshot_lines(&txn, order_id, &request.items, now).await?;
        for line in &mut lines {
            line.status = order.status;
        }
        let totals = compute_totals(
            lines.iter().map(|line| (line.price, line.quantity)),
            self.tax_rate,
        );
        insert_lines(&txn, lines).await?;

        let version = order.version;
        let mut active: OrderActiveModel = order.into();
        active.subtotal = Set(totals.subtotal);
        active.tax_amount = Set(totals.tax_amount);
        active.total = Set(totals.total);
        active.version = Set(version + 1);
        active.update(&txn).await.map_err(|e| {
            error!(error = %e, "Failed to update order totals");
            ServiceError::DatabaseError(e)
        })?;

        let detail = load_detail(&txn, order_id).await?;
        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit item replacement");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, total = %totals.total, "Order items replaced");
        Ok(detail)
    }

    /// Advances an order through the kitchen workflow. The new status is
    /// copied onto every line, and cancelling frees the table.
    #[instrument(skip(self, request), fields(order_id = %order_id, new_status = %request.status))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<OrderDetail, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for status update");
            ServiceError::DatabaseError(e)
        })?;

        let order = find_order(&txn, order_id).await?;
        if let Some(expected) = request.expected_version {
            if expected != order.version {
                warn!(expected, actual = order.version, "Stale order version");
                return Err(ServiceError::ConcurrentModification(order_id));
            }
        }

        let old_status = order.status;
        let new_status = request.status;
        if !is_valid_transition(old_status, new_status) {
            warn!(from = %old_status, to = %new_status, "Rejected status transition");
            return Err(ServiceError::InvalidStatus(format!(
                "Cannot move order from {} to {}",
                old_status, new_status
            )));
        }

        let table_id = order.table_id;
        let version = order.version;
        let mut active: OrderActiveModel = order.into();
        active.status = Set(new_status);
        active.version = Set(version + 1);
        active.update(&txn).await.map_err(|e| {
            error!(error = %e, "Failed to update order status");
            ServiceError::DatabaseError(e)
        })?;

        OrderItemEntity::update_many()
            .col_expr(order_item::Column::Status, Expr::value(new_status))
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to cascade status to order items");
                ServiceError::DatabaseError(e)
            })?;

        if new_status == OrderStatus::Cancelled {
            if let Some(table_id) = table_id {
                release_table(&txn, table_id, order_id).await?;
            }
        }

        let detail = load_detail(&txn, order_id).await?;
        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit status update");
            ServiceError::DatabaseError(e)
        })?;

        if new_status == OrderStatus::Cancelled {
            counter!("restaurant_pos.orders.cancelled", 1);
        }
        info!(order_id = %order_id, old_status = %old_status, new_status = %new_status, "Order status updated");
        Ok(detail)
    }

    /// Orders the kitchen still has to deal with, oldest first.
    #[instrument(skip(self))]
    pub async fn kitchen_queue(&self, now: DateTime<Utc>) -> Result<Vec<KitchenTicket>, ServiceError> {
        let db = &*self.db;
        let orders = OrderEntity::find()
            .filter(order::Column::Status.is_in(OrderStatus::KITCHEN_QUEUE))
            .order_by_asc(order::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to load kitchen queue");
                ServiceError::DatabaseError(e)
            })?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut items_by_order: HashMap<Uuid, Vec<order_item::Model>> = HashMap::new();
        for item in OrderItemEntity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids))
            .order_by_asc(order_item::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
        {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let table_names: HashMap<Uuid, String> = TableEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| {
                let elapsed_minutes = (now - order.created_at).num_minutes().max(0);
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                let table_name = order.table_id.and_then(|id| table_names.get(&id).cloned());
                KitchenTicket {
                    order: OrderDetail::from_parts(order, items, table_name),
                    elapsed_minutes,
                }
            })
            .collect())
    }

    /// Looks up each menu item and freezes its name and price onto a new
    /// order line.
    async fn snapshot_lines<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: Uuid,
        inputs: &[OrderLineInput],
        now: DateTime<Utc>,
    ) -> Result<Vec<order_item::Model>, ServiceError> {
        let ids: Vec<Uuid> = inputs.iter().map(|line| line.menu_item_id).collect();
        let menu: HashMap<Uuid, menu_item::Model> = MenuItemEntity::find()
            .filter(menu_item::Column::Id.is_in(ids))
            .all(conn)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to load menu items for order");
                ServiceError::DatabaseError(e)
            })?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        inputs
            .iter()
            .map(|line| {
                let item = menu.get(&line.menu_item_id).ok_or_else(|| {
                    ServiceError::BadRequest(format!("Menu item {} not found", line.menu_item_id))
                })?;
                if !item.is_available {
                    return Err(ServiceError::BadRequest(format!(
                        "{} is not available",
                        item.name
                    )));
                }
                Ok(order_item::Model {
                    id: Uuid::new_v4(),
                    order_id,
                    menu_item_id: item.id,
                    name: item.name.clone(),
                    quantity: line.quantity,
                    price: item.price,
                    status: OrderStatus::Pending,
                    notes: line.notes.clone(),
                    created_at: now,
                })
            })
            .collect()
    }
}

async fn insert_lines<C: ConnectionTrait>(
    conn: &C,
    lines: Vec<order_item::Model>,
) -> Result<Vec<order_item::Model>, ServiceError> {
    let mut inserted = Vec::with_capacity(lines.len());
    for line in lines {
        let active = OrderItemActiveModel {
            id: Set(line.id),
            order_id: Set(line.order_id),
            menu_item_id: Set(line.menu_item_id),
            name: Set(line.name),
            quantity: Set(line.quantity),
            price: Set(line.price),
            status: Set(line.status),
            notes: Set(line.notes),
            created_at: Set(line.created_at),
        };
        let model = active.insert(conn).await.map_err(|e| {
            error!(error = %e, "Failed to insert order item");
            ServiceError::DatabaseError(e)
        })?;
        inserted.push(model);
    }
    Ok(inserted)
}

pub(crate) async fn find_order<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> Result<order::Model, ServiceError> {
    OrderEntity::find_by_id(order_id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to fetch order");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
}

pub(crate) async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> Result<OrderDetail, ServiceError> {
    let order = find_order(conn, order_id).await?;
    let items = OrderItemEntity::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::CreatedAt)
        .all(conn)
        .await
        .map_err(ServiceError::DatabaseError)?;
    let table_name = match order.table_id {
        Some(table_id) => TableEntity::find_by_id(table_id)
            .one(conn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .map(|t| t.name),
        None => None,
    };
    Ok(OrderDetail::from_parts(order, items, table_name))
}

/// Frees a table if it is still linked to `order_id`.
pub(crate) async fn release_table<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
    order_id: Uuid,
) -> Result<(), ServiceError> {
    let Some(table) = TableEntity::find_by_id(table_id)
        .one(conn)
        .await
        .map_err(ServiceError::DatabaseError)?
    else {
        return Ok(());
    };
    if table.current_order_id.is_some_and(|linked| linked != order_id) {
        return Ok(());
    }

    let mut active: restaurant_table::ActiveModel = table.into();
    active.status = Set(TableStatus::Available);
    active.current_order_id = Set(None);
    active.update(conn).await.map_err(|e| {
        error!(error = %e, table_id = %table_id, "Failed to release table");
        ServiceError::DatabaseError(e)
    })?;
    Ok(())
}
