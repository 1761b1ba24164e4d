use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        order::{self, Entity as OrderEntity, OrderStatus},
        order_item::{self, Entity as OrderItemEntity},
        payment::{self, ActiveModel as PaymentActiveModel, Entity as PaymentEntity},
        PaymentMethod, PaymentStatus,
    },
    errors::ServiceError,
    page_index,
    services::orders::{load_detail, release_table, OrderDetail},
    PaginatedResponse,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub payment_method: PaymentMethod,
    /// Cash handed over by the guest. Ignored for card and wallet payments.
    #[schema(value_type = Option<String>, example = "500.00")]
    pub amount_tendered: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BillLine {
    pub name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    #[schema(value_type = String)]
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Bill {
    pub order_id: Uuid,
    pub table_name: Option<String>,
    pub status: OrderStatus,
    pub lines: Vec<BillLine>,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub tax_amount: Decimal,
    #[schema(value_type = String)]
    pub tax_rate: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Receipt {
    pub order_id: Uuid,
    pub table_name: Option<String>,
    pub lines: Vec<BillLine>,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub tax_amount: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    #[schema(value_type = String)]
    pub amount_tendered: Decimal,
    #[schema(value_type = String)]
    pub change_due: Decimal,
    pub currency: String,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResult {
    pub payment: payment::Model,
    pub receipt: Receipt,
}

/// Cash owed back to the guest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub amount_tendered: Decimal,
    pub change_due: Decimal,
}

/// Works out tendered amount and change. Cash defaults to the exact total
/// and must cover it; every other method settles the exact total.
pub fn settle(
    method: PaymentMethod,
    total: Decimal,
    tendered: Option<Decimal>,
) -> Result<Settlement, ServiceError> {
    match method {
        PaymentMethod::Cash => {
            let amount_tendered = tendered.unwrap_or(total);
            if amount_tendered < total {
                return Err(ServiceError::PaymentFailed("Insufficient amount".to_string()));
            }
            Ok(Settlement {
                amount_tendered,
                change_due: amount_tendered - total,
            })
        }
        PaymentMethod::Card | PaymentMethod::Upi | PaymentMethod::Qr => Ok(Settlement {
            amount_tendered: total,
            change_due: Decimal::ZERO,
        }),
    }
}

fn bill_lines(detail: &OrderDetail) -> Vec<BillLine> {
    detail
        .items
        .iter()
        .map(|item| BillLine {
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.price,
            line_total: item.line_total(),
        })
        .collect()
}

/// Bills, settlement and the payment ledger
#[derive(Clone)]
pub struct BillingService {
    db: Arc<DbPool>,
    tax_rate: Decimal,
    currency: String,
}

impl BillingService {
    pub fn new(db: Arc<DbPool>, tax_rate: Decimal, currency: impl Into<String>) -> Self {
        Self {
            db,
            tax_rate,
            currency: currency.into(),
        }
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_bill(&self, order_id: Uuid) -> Result<Bill, ServiceError> {
        let detail = load_detail(&*self.db, order_id).await?;
        Ok(Bill {
            order_id: detail.id,
            table_name: detail.table_name.clone(),
            status: detail.status,
            lines: bill_lines(&detail),
            subtotal: detail.subtotal,
            tax_amount: detail.tax_amount,
            tax_rate: self.tax_rate,
            total: detail.total,
            currency: self.currency.clone(),
        })
    }

    /// Settles an order in one transaction: the payment is recorded, the
    /// order becomes paid and its table is released.
    #[instrument(skip(self, request), fields(order_id = %order_id, method = %request.payment_method))]
    pub async fn record_payment(
        &self,
        order_id: Uuid,
        request: RecordPaymentRequest,
    ) -> Result<PaymentResult, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start payment transaction");
            ServiceError::DatabaseError(e)
        })?;

        let detail = load_detail(&txn, order_id).await?;
        if detail.status.is_terminal() {
            warn!(status = %detail.status, "Payment attempted on a closed order");
            return Err(ServiceError::Conflict(format!(
                "Order {} is already {}",
                order_id, detail.status
            )));
        }

        let settlement = settle(request.payment_method, detail.total, request.amount_tendered)
            .map_err(|e| {
                counter!("restaurant_pos.payments.declined", 1);
                e
            })?;
        let now = Utc::now();

        let payment = PaymentActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            amount: Set(detail.total),
            amount_tendered: Set(settlement.amount_tendered),
            change_due: Set(settlement.change_due),
            payment_method: Set(request.payment_method),
            status: Set(PaymentStatus::Completed),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to record payment");
            ServiceError::DatabaseError(e)
        })?;

        // Only the request that still sees the version it loaded may settle.
        let settled = OrderEntity::update_many()
            .col_expr(order::Column::Status, Expr::value(OrderStatus::Paid))
            .col_expr(order::Column::Version, Expr::value(detail.version + 1))
            .col_expr(order::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Version.eq(detail.version))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to mark order paid");
                ServiceError::DatabaseError(e)
            })?;
        if settled.rows_affected != 1 {
            warn!(version = detail.version, "Order changed while the payment was recorded");
            return Err(ServiceError::Conflict(format!(
                "Order {} was modified by another request",
                order_id
            )));
        }

        OrderItemEntity::update_many()
            .col_expr(order_item::Column::Status, Expr::value(OrderStatus::Paid))
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to mark order items paid");
                ServiceError::DatabaseError(e)
            })?;

        if let Some(table_id) = detail.table_id {
            release_table(&txn, table_id, order_id).await?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit payment");
            ServiceError::DatabaseError(e)
        })?;

        counter!(
            "restaurant_pos.payments.recorded",
            1,
            "method" => payment.payment_method.to_string()
        );
        histogram!(
            "restaurant_pos.payments.amount",
            detail.total.to_f64().unwrap_or(0.0)
        );
        info!(payment_id = %payment.id, total = %detail.total, change = %settlement.change_due, "Payment recorded");

        let receipt = Receipt {
            order_id,
            table_name: detail.table_name.clone(),
            lines: bill_lines(&detail),
            subtotal: detail.subtotal,
            tax_amount: detail.tax_amount,
            total: detail.total,
            payment_method: payment.payment_method,
            amount_tendered: settlement.amount_tendered,
            change_due: settlement.change_due,
            currency: self.currency.clone(),
            paid_at: now,
        };
        Ok(PaymentResult { payment, receipt })
    }

    #[instrument(skip(self))]
    pub async fn list_payments(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<PaginatedResponse<payment::Model>, ServiceError> {
        let page = page.max(1);
        let paginator = PaymentEntity::find()
            .order_by_desc(payment::Column::CreatedAt)
            .paginate(&*self.db, limit);
        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count payments");
            ServiceError::DatabaseError(e)
        })?;
        let items = match page_index(page, limit, total) {
            Some(index) => paginator.fetch_page(index).await.map_err(|e| {
                error!(error = %e, page, limit, "Failed to fetch payments page");
                ServiceError::DatabaseError(e)
            })?,
            None => Vec::new(),
        };
        Ok(PaginatedResponse::new(items, total, page, limit))
    }
}
