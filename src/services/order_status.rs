//! Kitchen workflow rules for order status changes.
//!
//! `paid` never appears as a target. An order becomes paid only when a
//! payment is recorded against it.

use crate::entities::order::OrderStatus;

/// Statuses reachable from `from` through a manual status update.
pub fn allowed_transitions(from: OrderStatus) -> &'static [OrderStatus] {
    match from {
        OrderStatus::Pending => &[OrderStatus::Preparing, OrderStatus::Cancelled],
        OrderStatus::Preparing => &[OrderStatus::Ready, OrderStatus::Cancelled],
        OrderStatus::Ready => &[OrderStatus::Served],
        OrderStatus::Served | OrderStatus::Paid | OrderStatus::Cancelled => &[],
    }
}

pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_transitions(from).contains(&to)
}
