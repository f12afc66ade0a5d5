use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::errors::OrderError;
use super::pricing::{order_total, PricedLine};
use super::value_objects::OrderStatus;
use crate::models::{NewOrder, NewOrderLine, Order};
use crate::store::OrderStore;

// ============================================================================
// Order Assembler
// ============================================================================

/// Build the aggregate to persist. A missing status falls back to `pending`.
pub fn assemble(
    customer_id: i64,
    lines: Vec<PricedLine>,
    status: Option<OrderStatus>,
    now: DateTime<Utc>,
) -> Result<NewOrder, OrderError> {
    if lines.is_empty() {
        return Err(OrderError::EmptyItems);
    }

    let total_value = order_total(&lines)?;
    let lines = lines
        .into_iter()
        .map(|line| NewOrderLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal,
        })
        .collect();

    Ok(NewOrder {
        customer_id,
        lines,
        total_value,
        status: status.unwrap_or_default(),
        ordered_at: now,
    })
}

pub struct OrderAssembler {
    orders: Arc<dyn OrderStore>,
}

impl OrderAssembler {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    /// Write the aggregate atomically, then read it back with its relations.
    pub async fn persist(&self, order: NewOrder) -> Result<Order, OrderError> {
        let id = self.orders.create_order(order).await?;
        self.orders
            .find_order(id)
            .await?
            .ok_or(OrderError::NotFound(id))
    }
}
